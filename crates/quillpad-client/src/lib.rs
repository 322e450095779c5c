//! Quillpad Client - Native Port Adapters
//!
//! - [`HttpResourceClient`]: the resource client over `reqwest`, sending the
//!   stored token as `Authorization: Token <token>`
//! - [`FileStore`]: the persisted session as a small JSON file

#![forbid(unsafe_code)]

/// Adapter errors
pub mod error;

/// JSON-file key-value store
pub mod file_store;

/// HTTP resource client
pub mod http;

pub use error::ClientError;
pub use file_store::FileStore;
pub use http::HttpResourceClient;
