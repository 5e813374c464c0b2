//! Error types for the ScrapeGraph SDK.
//!
//! Every failure is normalized into one of three kinds so callers can match
//! exhaustively: the API rejected the request, the API could not be reached,
//! or something went wrong locally.

use serde_json::Value;
use thiserror::Error;

/// Result type for ScrapeGraph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Message used for every [`Error::Network`] raised by the transport.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Impossible to contact the server. Check your internet connection.";

/// Error types for the ScrapeGraph SDK.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[error("HTTP error {status} {title}: {detail}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status line text
        title: String,
        /// Detail extracted from the response body
        detail: String,
    },

    /// The request was sent but no response came back.
    #[error("Network error: {message}")]
    Network {
        /// Human readable message
        message: String,
    },

    /// Local failure: invalid input, unbuildable request, undecodable body.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Human readable message
        message: String,
    },
}

impl Error {
    /// Build a local error naming the violated constraint.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::Unexpected {
            message: message.into(),
        }
    }

    /// HTTP status code, if the API answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an HTTP error from a non-2xx response.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let title = status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string();

        // Body may be empty or not JSON at all
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| extract_detail(&v))
            .unwrap_or_else(|| "unknown".into());

        Error::Http {
            status: status.as_u16(),
            title,
            detail,
        }
    }

    /// Classify a transport failure.
    ///
    /// Requests that could not be built are local errors; everything that
    /// failed after the request left the client counts as a network error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Error::Unexpected {
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Error::Unexpected {
                message: format!("could not decode response body: {err}"),
            };
        }
        Error::Network {
            message: NETWORK_ERROR_MESSAGE.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected {
            message: format!("JSON error: {err}"),
        }
    }
}

/// Pull a human readable detail out of an error body.
///
/// Validation failures come back as `{"detail": [{"loc": [...], "msg": "..."}]}`.
fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::Array(entries)) if !entries.is_empty() => {
            let first = &entries[0];
            let msg = first
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or("validation error");
            let loc = first
                .get("loc")
                .and_then(Value::as_array)
                .map(|parts| {
                    parts
                        .iter()
                        .map(|p| match p {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(".")
                })
                .filter(|loc| !loc.is_empty());
            Some(match loc {
                Some(loc) => format!("{}: {}", loc, msg),
                None => msg.to_string(),
            })
        }
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
