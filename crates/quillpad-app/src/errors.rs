//! Categorized application errors
//!
//! Every failure the engine can surface is mapped to an [`ErrorCategory`], and
//! each category decides how the user hears about it: an alert of a given
//! level, or nothing at all when the router redirects instead.

use std::fmt;

use quillpad_core::{ApiError, CommentTreeError};

use crate::intent::IntentKind;

// ============================================================================
// Alert Levels
// ============================================================================

/// Severity of a user-facing alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AlertLevel {
    /// Completed action
    Success,
    /// Neutral notice
    Info,
    /// Action refused before any request was issued
    Warning,
    /// Request failed
    Danger,
}

impl AlertLevel {
    /// Short label for logs and plain-text surfaces.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request never got an HTTP response
    Transport,
    /// The API answered with a non-success status
    Api,
    /// Local input check failed; nothing was sent
    Precondition,
    /// Router guard refused the view
    Permission,
    /// The rich-text editor could not be built or torn down
    Editor,
    /// Persisted session storage failed
    Storage,
    /// A response body did not have the expected shape
    Decode,
}

impl ErrorCategory {
    /// How the failure is shown. `None` means no alert: guard failures redirect.
    #[must_use]
    pub fn alert_level(&self) -> Option<AlertLevel> {
        match self {
            Self::Transport | Self::Api | Self::Decode | Self::Editor => Some(AlertLevel::Danger),
            Self::Precondition | Self::Storage => Some(AlertLevel::Warning),
            Self::Permission => None,
        }
    }

    /// Whether the user can fix the problem by changing their input.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Precondition)
    }

    /// Short label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Api => "API",
            Self::Precondition => "Input",
            Self::Permission => "Permission",
            Self::Editor => "Editor",
            Self::Storage => "Storage",
            Self::Decode => "Decode",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failures of the rich-text editor widget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// The widget could not be constructed
    #[error("Error loading text editor: {0}")]
    Construction(String),
    /// The widget failed while being released
    #[error("Error destroying text editor: {0}")]
    Teardown(String),
    /// An operation needed a live editor and there is none
    #[error("Error: Content editor not ready.")]
    NotReady,
}

/// Failures of the persisted key-value store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Backing file or device could not be read
    #[error("failed to read session storage: {0}")]
    Read(String),
    /// Backing file or device could not be written
    #[error("failed to write session storage: {0}")]
    Write(String),
    /// Stored data is not valid
    #[error("corrupt session storage: {0}")]
    Corrupt(String),
}

/// Configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file {path}: {reason}")]
    Read {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        reason: String,
    },
    /// File is not valid TOML for this shape
    #[error("invalid config: {0}")]
    Parse(String),
    /// A value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field or variable
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Intents rejected before their workflow ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// The current view did not bind a handler for this intent
    #[error("no handler bound for {0} on the current view")]
    NotBound(IntentKind),
}

/// Any failure inside an engine workflow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Request-level failure
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Response body had an unexpected shape
    #[error("Unexpected response from {path}: {reason}")]
    Decode {
        /// Request path
        path: String,
        /// Deserialization error
        reason: String,
    },
    /// Local check failed before any request; the message is user-facing
    #[error("{0}")]
    Precondition(String),
    /// Guard refused the current user
    #[error("permission denied: {0}")]
    Permission(String),
    /// Editor failure
    #[error(transparent)]
    Editor(#[from] EditorError),
    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Comment batch violated the builder's precondition
    #[error("Error loading comments: {0}")]
    CommentTree(#[from] CommentTreeError),
    /// Intent not accepted by the current view
    #[error(transparent)]
    Intent(#[from] IntentError),
}

impl AppError {
    /// A user-facing precondition failure.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Category used for alert routing.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Api(err) if err.is_transport() => ErrorCategory::Transport,
            Self::Api(_) => ErrorCategory::Api,
            Self::Decode { .. } | Self::CommentTree(_) => ErrorCategory::Decode,
            Self::Precondition(_) => ErrorCategory::Precondition,
            Self::Permission(_) | Self::Intent(_) => ErrorCategory::Permission,
            Self::Editor(_) => ErrorCategory::Editor,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Alert level for this error, if it is shown at all.
    #[must_use]
    pub fn alert_level(&self) -> Option<AlertLevel> {
        self.category().alert_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_and_api_are_danger() {
        let transport = AppError::from(ApiError::transport("timeout"));
        assert_eq!(transport.category(), ErrorCategory::Transport);
        assert_eq!(transport.alert_level(), Some(AlertLevel::Danger));

        let api = AppError::from(ApiError::from_response(400, "Bad Request", r#"{"detail":"no"}"#));
        assert_eq!(api.category(), ErrorCategory::Api);
        assert_eq!(api.to_string(), "no");
    }

    #[test]
    fn test_precondition_is_warning_with_verbatim_message() {
        let err = AppError::precondition("Comment cannot be empty.");
        assert_eq!(err.alert_level(), Some(AlertLevel::Warning));
        assert_eq!(err.to_string(), "Comment cannot be empty.");
        assert!(err.category().is_user_correctable());
    }

    #[test]
    fn test_permission_redirects_silently() {
        let err = AppError::Permission("admin only".into());
        assert_eq!(err.alert_level(), None);

        let unbound = AppError::from(IntentError::NotBound(IntentKind::DeleteComment));
        assert_eq!(unbound.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_editor_not_ready_message() {
        let err = AppError::from(EditorError::NotReady);
        assert_eq!(err.to_string(), "Error: Content editor not ready.");
        assert_eq!(err.alert_level(), Some(AlertLevel::Danger));
    }
}
