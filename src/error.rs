use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP transport failed (connect, DNS, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with `{"status":"error", ...}`.
    #[error("{0}")]
    Api(ApiError),

    /// Non-200 response without a body. Carries no detail.
    #[error("request failed without a response body")]
    Unspecified,

    /// The response body was present but was not JSON.
    ///
    /// Deliberately strict: the raw text is not handed back as a success
    /// value, even though the service's other clients accept it.
    #[error("failed to parse API JSON (status={status})")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },

    /// A local file could not be opened, read or written.
    #[error("file error for {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The download helper received a non-success status.
    #[error("download failed: HTTP {0}")]
    Status(StatusCode),

    /// Configuration could not be resolved or the transport could not be built.
    #[error("configuration error: {0:#}")]
    Config(#[from] anyhow::Error),
}

/// Result type alias for premiumize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Service-level rejection.
///
/// Only the `message` of the error envelope survives; `status` and any other
/// field the service sent are dropped. Serializes to `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(m) => write!(f, "API error: {}", m),
            None => f.write_str("API error"),
        }
    }
}

/// Returns the [`ApiError`] for an error envelope, or `None` for anything else.
pub(crate) fn api_error_from_envelope(body: &Value) -> Option<ApiError> {
    if body.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }

    // Some endpoints send non-string messages; keep their JSON text.
    let message = match body.get("message") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Some(ApiError { message })
}
