//! Error types for the todo API client.
//!
//! # Design
//! Every failure collapses to one human-readable message via
//! [`ApiError::message`], which is what the UI shows. `Server` keeps the
//! status code for logs and tests; its message is the server's `error`
//! field verbatim, or [`FALLBACK_MESSAGE`] when the body carried none.

use thiserror::Error;

/// Shown when a non-2xx response has no usable `error` field.
pub const FALLBACK_MESSAGE: &str = "unexpected server error";

/// Errors produced by `TodoClient` parse methods and by hosts executing
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// The text surfaced to the user.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Server { message, .. } => message,
            ApiError::Deserialization(_) | ApiError::Serialization(_) => FALLBACK_MESSAGE,
            ApiError::Transport(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_verbatim() {
        let err = ApiError::Server {
            status: 409,
            message: "user already exists".to_string(),
        };
        assert_eq!(err.message(), "user already exists");
        assert_eq!(err.to_string(), "HTTP 409: user already exists");
    }

    #[test]
    fn codec_failures_use_fallback() {
        assert_eq!(ApiError::Deserialization("eof".into()).message(), FALLBACK_MESSAGE);
    }
}
