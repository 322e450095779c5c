//! Adapter construction errors.

/// Failures setting up a native adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}
