//! Error types for the pure domain layer.
//!
//! [`ApiError`] is the structured failure every Resource Client implementation
//! returns; its message formatting lives here so that every transport produces
//! the same user-facing text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bodies shorter than this are appended verbatim to non-JSON error messages.
pub const MAX_INLINE_BODY_LEN: usize = 500;

/// Structured failure from the remote API or the transport beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status, absent for transport failures (timeout, DNS, refused)
    pub status: Option<u16>,
    /// Human-readable message derived from the response body
    pub message: String,
}

impl ApiError {
    /// A failure that never produced an HTTP response.
    pub fn transport(reason: impl AsRef<str>) -> Self {
        Self {
            status: None,
            message: format!("Error: {}", reason.as_ref()),
        }
    }

    /// Build the error for a non-success response.
    ///
    /// Message precedence: the body's `detail` field; otherwise every field's
    /// messages as `"field: m1, m2"` joined by `"; "`; a bare JSON string body is
    /// used as-is. Bodies that are not JSON fall back to the status line.
    pub fn from_response(status: u16, status_text: &str, body: &str) -> Self {
        let fallback = format!("Error {status}: {status_text}");
        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => match map.get("detail") {
                Some(detail) if !detail.is_null() => value_text(detail),
                _ => map
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", joined_messages(messages)))
                    .collect::<Vec<_>>()
                    .join("; "),
            },
            Ok(Value::String(text)) => text,
            Ok(_) => fallback,
            Err(_) if !body.is_empty() && body.len() < MAX_INLINE_BODY_LEN => {
                format!("{fallback} | Server Response: {body}")
            }
            Err(_) => fallback,
        };
        Self {
            status: Some(status),
            message,
        }
    }

    /// Whether the failure happened below HTTP.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.status.is_none()
    }

    /// 401/403.
    #[must_use]
    pub fn is_permission(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn joined_messages(messages: &Value) -> String {
    match messages {
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => value_text(other),
    }
}

/// Failure building a comment tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentTreeError {
    /// A record in the batch has no `id`; the caller must guarantee ids.
    #[error("comment record at position {position} has no id")]
    MissingId {
        /// Zero-based position of the offending record in the input batch
        position: usize,
    },
}
