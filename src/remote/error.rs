use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error payload both services attach to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Failure talking to a remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-2xx status.
    #[error("Service returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Service {
        status: StatusCode,
        /// The `detail` field of the response body, when present
        detail: Option<String>,
    },

    /// The request never completed (connect, timeout, or body decode).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    /// Build a `Service` error from a non-2xx response, extracting the JSON
    /// `detail` field if the body carries one.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();

        let detail = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail),
            Err(_) => None,
        };

        RemoteError::Service { status, detail }
    }

    /// The message shown to the user.
    ///
    /// Service errors surface the server's `detail` verbatim, falling back to
    /// `fallback` when the body carried none. Transport failures render a
    /// generic connection-error message with the underlying error appended.
    pub fn user_message(&self, service_label: &str, fallback: &str) -> String {
        match self {
            RemoteError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            RemoteError::Service { .. } => fallback.to_string(),
            RemoteError::Transport(e) => {
                format!("Could not reach the {}: {}", service_label, e)
            }
        }
    }
}
