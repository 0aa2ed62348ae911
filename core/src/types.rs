//! Wire DTOs for the todo API.
//!
//! # Design
//! Request payloads mirror the server schema exactly. Success envelopes are
//! decoded leniently: a task may arrive wrapped in `{"todo": ..}` or bare, a
//! list response without `todos` is an empty list, and auth replies may omit
//! `message`. Error bodies are `{"error": ".."}`.

use serde::{Deserialize, Serialize};

/// A single task as returned by the API. `id` is opaque and server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body for `POST /register` and `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body for `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTask {
    pub email: String,
    pub title: String,
}

/// Body for `PUT /todos/:id`. Omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTask {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Reply to register/login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthReply {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TaskListEnvelope {
    #[serde(default)]
    pub todos: Option<Vec<Task>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TaskEnvelope {
    Wrapped { todo: Task },
    Bare(Task),
}

impl TaskEnvelope {
    pub fn into_task(self) -> Task {
        match self {
            TaskEnvelope::Wrapped { todo } => todo,
            TaskEnvelope::Bare(task) => task,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_skips_absent_fields() {
        let json = serde_json::to_value(UpdateTask::completed(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));
    }

    #[test]
    fn task_envelope_accepts_wrapped_and_bare() {
        let wrapped: TaskEnvelope =
            serde_json::from_str(r#"{"todo":{"id":"1","title":"A","completed":true}}"#).unwrap();
        let bare: TaskEnvelope = serde_json::from_str(r#"{"id":"1","title":"A","completed":true}"#).unwrap();
        assert_eq!(wrapped.into_task(), bare.into_task());
    }

    #[test]
    fn list_envelope_defaults_to_none() {
        let env: TaskListEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.todos.is_none());
    }

    #[test]
    fn task_completed_defaults_to_false() {
        let task: Task = serde_json::from_str(r#"{"id":"x","title":"No flag"}"#).unwrap();
        assert!(!task.completed);
    }
}
