//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. All `parse_*` methods share one
//! classification rule: any 2xx is success, anything else becomes
//! `ApiError::Server` with the body's `error` field (JSON bodies only) or the
//! fallback message.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{ApiError, FALLBACK_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthReply, CreateTask, Credentials, ErrorEnvelope, MessageEnvelope, Task, TaskEnvelope,
    TaskListEnvelope, UpdateTask,
};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/register", credentials)
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", credentials)
    }

    /// An empty `email` omits the query string entirely.
    pub fn build_list_tasks(&self, email: &str) -> HttpRequest {
        let path = if email.is_empty() {
            format!("{}/todos", self.base_url)
        } else {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .append_pair("email", email)
                .finish();
            format!("{}/todos?{query}", self.base_url)
        };
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_task(&self, input: &CreateTask) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", input)
    }

    pub fn build_update_task(&self, id: &str, input: &UpdateTask) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/todos/{}", encode_segment(id)), input)
    }

    pub fn build_delete_task(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{}", self.base_url, encode_segment(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Any 2xx signs in; the body only supplies the optional message.
    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthReply, ApiError> {
        check_status(&response)?;
        let envelope: MessageEnvelope = decode_lenient(&response);
        Ok(AuthReply {
            message: envelope.message,
        })
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthReply, ApiError> {
        self.parse_register(response)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response)?;
        let envelope: TaskListEnvelope = decode_lenient(&response);
        Ok(envelope.todos.unwrap_or_default())
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        decode::<TaskEnvelope>(&response).map(TaskEnvelope::into_task)
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        self.parse_create_task(response)
    }

    /// Delete replies with `{message}` or nothing at all.
    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<Option<String>, ApiError> {
        check_status(&response)?;
        let envelope: MessageEnvelope = decode_lenient(&response);
        Ok(envelope.message)
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        route: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let path = format!("{}{route}", self.base_url);
        debug!(method = method.as_str(), %path, "built request");
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map a non-2xx response to `ApiError::Server` with a normalized message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = if response.is_json() {
        serde_json::from_str::<ErrorEnvelope>(&response.body)
            .ok()
            .map(|envelope| envelope.error)
            .filter(|error| !error.is_empty())
    } else {
        None
    };
    Err(ApiError::Server {
        status: response.status,
        message: message.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Decode a success body that carries nothing the caller requires.
/// Non-JSON, blank or unparsable bodies yield `T::default()`.
fn decode_lenient<T: DeserializeOwned + Default>(response: &HttpResponse) -> T {
    if !response.is_json() || response.body.trim().is_empty() {
        return T::default();
    }
    serde_json::from_str(&response.body).unwrap_or_else(|err| {
        debug!(status = response.status, error = %err, "ignoring unparsable success body");
        T::default()
    })
}

fn encode_segment(id: &str) -> String {
    form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
