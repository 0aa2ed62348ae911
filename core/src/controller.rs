//! Application state and the operations that change it.
//!
//! # Design
//! `App` owns the session, the task list, the loading flag and the toast.
//! Every user operation either resolves locally (validation, missing session)
//! or returns a [`Dispatch`]: an `HttpRequest` tagged with a [`RequestId`].
//! The host executes it and passes the outcome to [`App::complete`], which
//! reconciles state. Nothing changes before the server confirms.
//!
//! Completions are applied in arrival order. Each dispatch also records the
//! session epoch it was issued under; once the session changes, responses
//! from the old epoch are dropped so a late reply can never repopulate a
//! logged-out list.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::toast::{Toast, ToastKind, ToastNotifier};
use crate::types::{CreateTask, Task, UpdateTask};
use crate::validate::{validate_credentials, FieldErrors, TITLE_REQUIRED};

pub const REGISTERED: &str = "Account created";
pub const SIGNED_IN: &str = "Signed in";
pub const SIGNED_OUT: &str = "Signed out";
pub const SIGN_IN_REQUIRED: &str = "Sign in to create tasks";
pub const TASK_CREATED: &str = "Task created";
pub const TASK_UPDATED: &str = "Task updated";
pub const TASK_DELETED: &str = "Task deleted";

/// Tag of an in-flight request. Monotonic per `App`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request the host must execute, then report via [`App::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub id: RequestId,
    pub request: HttpRequest,
}

/// What [`App::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// State was reconciled from a successful response.
    Applied,
    /// Register/login succeeded and the session is set. The list fetch that
    /// follows must be executed by the host.
    Authenticated(Dispatch),
    /// Register/login failed. The error toast is already shown; the error is
    /// returned so the form can react.
    AuthRejected(ApiError),
    /// A task operation failed; an error toast is shown and state is
    /// unchanged.
    Failed(ApiError),
    /// The response belonged to an old session or an unknown request.
    Discarded,
}

#[derive(Debug, Clone)]
enum Operation {
    Register { email: String },
    Login { email: String },
    LoadTasks,
    CreateTask,
    ToggleTask { id: String },
    RenameTask { id: String },
    DeleteTask { id: String },
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Register { .. } => "register",
            Operation::Login { .. } => "login",
            Operation::LoadTasks => "load_tasks",
            Operation::CreateTask => "create_task",
            Operation::ToggleTask { .. } => "toggle_task",
            Operation::RenameTask { .. } => "rename_task",
            Operation::DeleteTask { .. } => "delete_task",
        }
    }

    fn is_auth(&self) -> bool {
        matches!(self, Operation::Register { .. } | Operation::Login { .. })
    }
}

#[derive(Debug)]
struct InFlight {
    operation: Operation,
    epoch: u64,
}

#[derive(Debug)]
pub struct App {
    client: TodoClient,
    session: Option<String>,
    tasks: Vec<Task>,
    loading: bool,
    toast: ToastNotifier,
    in_flight: HashMap<RequestId, InFlight>,
    next_request: u64,
    epoch: u64,
}

impl App {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            session: None,
            tasks: Vec::new(),
            loading: false,
            toast: ToastNotifier::new(),
            in_flight: HashMap::new(),
            next_request: 0,
            epoch: 0,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Email of the signed-in user.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.current()
    }

    pub fn toast_deadline(&self) -> Option<Instant> {
        self.toast.expires_at()
    }

    pub fn dismiss_toast(&mut self) -> bool {
        self.toast.dismiss()
    }

    /// Advance the toast timer. Returns `true` when the toast just expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toast.tick(now)
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast.show(message, kind);
    }

    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    pub fn register(&mut self, email: &str, password: &str) -> Result<Option<Dispatch>, FieldErrors> {
        let credentials = validate_credentials(email, password)?;
        let request = self.client.build_register(&credentials);
        Ok(self.dispatch(
            Operation::Register {
                email: credentials.email,
            },
            request,
        ))
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Option<Dispatch>, FieldErrors> {
        let credentials = validate_credentials(email, password)?;
        let request = self.client.build_login(&credentials);
        Ok(self.dispatch(
            Operation::Login {
                email: credentials.email,
            },
            request,
        ))
    }

    /// Local only: no request is issued.
    pub fn logout(&mut self) {
        self.session = None;
        self.tasks.clear();
        self.loading = false;
        self.epoch += 1;
        self.toast.show(SIGNED_OUT, ToastKind::Info);
    }

    /// Fetch the current user's tasks. Without a session the list is cleared
    /// and nothing is requested.
    pub fn load_tasks(&mut self) -> Option<Dispatch> {
        let Some(email) = self.session.clone() else {
            self.tasks.clear();
            return None;
        };
        self.loading = true;
        let request = self.client.build_list_tasks(&email);
        Some(self.track(Operation::LoadTasks, request))
    }

    /// `title` is expected to be validated already by the task form.
    pub fn create_task(&mut self, title: &str) -> Option<Dispatch> {
        let Some(email) = self.session.clone() else {
            self.toast.show(SIGN_IN_REQUIRED, ToastKind::Warning);
            return None;
        };
        let request = self.client.build_create_task(&CreateTask {
            email,
            title: title.to_string(),
        });
        self.dispatch(Operation::CreateTask, request)
    }

    /// Flip the completion flag of a listed task.
    pub fn toggle_task(&mut self, id: &str) -> Option<Dispatch> {
        let Some(current) = self.tasks.iter().find(|task| task.id == id) else {
            debug!(id, "toggle ignored: task not listed");
            return None;
        };
        let request = self
            .client
            .build_update_task(id, &UpdateTask::completed(!current.completed));
        self.dispatch(Operation::ToggleTask { id: id.to_string() }, request)
    }

    /// An unchanged title is still sent; a blank one never is.
    pub fn rename_task(&mut self, id: &str, title: &str) -> Option<Dispatch> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            self.toast.show(TITLE_REQUIRED, ToastKind::Warning);
            return None;
        }
        let request = self.client.build_update_task(id, &UpdateTask::title(trimmed));
        self.dispatch(Operation::RenameTask { id: id.to_string() }, request)
    }

    pub fn delete_task(&mut self, id: &str) -> Option<Dispatch> {
        let request = self.client.build_delete_task(id);
        Some(self.track(Operation::DeleteTask { id: id.to_string() }, request))
    }

    /// Reconcile the outcome of a dispatched request.
    ///
    /// `outcome` is the HTTP response, or the transport error the host hit
    /// while executing the request.
    pub fn complete(&mut self, id: RequestId, outcome: Result<HttpResponse, ApiError>) -> Completion {
        let Some(in_flight) = self.in_flight.remove(&id) else {
            warn!(%id, "completion for unknown request");
            return Completion::Discarded;
        };
        let InFlight { operation, epoch } = in_flight;

        if !operation.is_auth() && epoch != self.epoch {
            debug!(%id, operation = operation.name(), "discarding response from previous session");
            return Completion::Discarded;
        }
        debug!(%id, operation = operation.name(), "reconciling response");

        match operation {
            Operation::Register { email } => {
                let reply = outcome.and_then(|response| self.client.parse_register(response));
                self.finish_auth(email, reply.map(|r| r.message), REGISTERED)
            }
            Operation::Login { email } => {
                let reply = outcome.and_then(|response| self.client.parse_login(response));
                self.finish_auth(email, reply.map(|r| r.message), SIGNED_IN)
            }
            Operation::LoadTasks => {
                self.loading = false;
                match outcome.and_then(|response| self.client.parse_list_tasks(response)) {
                    Ok(tasks) => {
                        self.tasks = tasks;
                        Completion::Applied
                    }
                    Err(err) => self.fail(err),
                }
            }
            Operation::CreateTask => {
                match outcome.and_then(|response| self.client.parse_create_task(response)) {
                    Ok(task) => {
                        self.tasks.push(task);
                        self.toast.show(TASK_CREATED, ToastKind::Success);
                        Completion::Applied
                    }
                    Err(err) => self.fail(err),
                }
            }
            Operation::ToggleTask { id } => {
                match outcome.and_then(|response| self.client.parse_update_task(response)) {
                    Ok(task) => {
                        self.replace(&id, task);
                        Completion::Applied
                    }
                    Err(err) => self.fail(err),
                }
            }
            Operation::RenameTask { id } => {
                match outcome.and_then(|response| self.client.parse_update_task(response)) {
                    Ok(task) => {
                        self.replace(&id, task);
                        self.toast.show(TASK_UPDATED, ToastKind::Success);
                        Completion::Applied
                    }
                    Err(err) => self.fail(err),
                }
            }
            Operation::DeleteTask { id } => {
                match outcome.and_then(|response| self.client.parse_delete_task(response)) {
                    Ok(_) => {
                        self.tasks.retain(|task| task.id != id);
                        self.toast.show(TASK_DELETED, ToastKind::Info);
                        Completion::Applied
                    }
                    Err(err) => self.fail(err),
                }
            }
        }
    }

    fn dispatch(&mut self, operation: Operation, request: Result<HttpRequest, ApiError>) -> Option<Dispatch> {
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                self.fail(err);
                return None;
            }
        };
        Some(self.track(operation, request))
    }

    fn track(&mut self, operation: Operation, request: HttpRequest) -> Dispatch {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        debug!(%id, operation = operation.name(), path = %request.path, "dispatching");
        self.in_flight.insert(
            id,
            InFlight {
                operation,
                epoch: self.epoch,
            },
        );
        Dispatch { id, request }
    }

    fn finish_auth(
        &mut self,
        email: String,
        reply: Result<Option<String>, ApiError>,
        default_message: &str,
    ) -> Completion {
        match reply {
            Ok(message) => {
                self.session = Some(email.clone());
                self.epoch += 1;
                self.toast
                    .show(message.unwrap_or_else(|| default_message.to_string()), ToastKind::Success);
                self.loading = true;
                let request = self.client.build_list_tasks(&email);
                Completion::Authenticated(self.track(Operation::LoadTasks, request))
            }
            Err(err) => {
                self.toast.show(err.message(), ToastKind::Error);
                Completion::AuthRejected(err)
            }
        }
    }

    fn fail(&mut self, err: ApiError) -> Completion {
        warn!(error = %err, "request failed");
        self.toast.show(err.message(), ToastKind::Error);
        Completion::Failed(err)
    }

    fn replace(&mut self, id: &str, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
            *slot = updated;
        }
    }
}
