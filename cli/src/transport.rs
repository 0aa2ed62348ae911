//! Executes core `HttpRequest`s with ureq.
//!
//! Status codes are returned as data (`http_status_as_error(false)`) so the
//! core client decides what counts as failure. Only connection-level
//! problems become `ApiError::Transport`.

use tokio::sync::mpsc::UnboundedSender;
use todo_core::{ApiError, Dispatch, HttpMethod, HttpRequest, HttpResponse, RequestId};
use tracing::debug;

pub type Outcome = (RequestId, Result<HttpResponse, ApiError>);

#[derive(Debug, Clone)]
pub struct Transport {
    agent: ureq::Agent,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Blocking round-trip.
    pub fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = &self.agent;
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => agent.get(&req.path).call(),
            (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
            (HttpMethod::Post, Some(body)) => {
                agent.post(&req.path).content_type("application/json").send(body.as_bytes())
            }
            (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                agent.put(&req.path).content_type("application/json").send(body.as_bytes())
            }
            (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, headers, body })
    }

    /// Run `dispatch` on the blocking pool and report the outcome on `done`.
    /// Requests are never cancelled once spawned.
    pub fn spawn(&self, dispatch: Dispatch, done: UnboundedSender<Outcome>) {
        let transport = self.clone();
        tokio::task::spawn_blocking(move || {
            let Dispatch { id, request } = dispatch;
            debug!(%id, method = request.method.as_str(), path = %request.path, "sending");
            let outcome = transport.execute(request);
            // The receiver only goes away at shutdown.
            let _ = done.send((id, outcome));
        });
    }
}
