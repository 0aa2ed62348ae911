//! Client core for the to-do list service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of the client sits
//! [`App`], the state controller that turns user actions into tagged
//! requests and reconciles responses into the session, the task list and
//! the toast.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and hosts choose their own HTTP stack.
//! - Validators, the toast notifier and the task-list presentation model are
//!   pure and usable without `App`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod task_list;
pub mod toast;
pub mod types;
pub mod validate;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use controller::{App, Completion, Dispatch, RequestId};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use task_list::{render, EditBuffers, SaveOutcome, TaskListView};
pub use toast::{Toast, ToastKind, ToastNotifier};
pub use types::{AuthReply, CreateTask, Credentials, Task, UpdateTask};
pub use validate::{validate_credentials, validate_title, Field, FieldErrors};
