//! # Ports
//!
//! Traits at every I/O seam of the engine. Native adapters live in
//! `quillpad-client`, test doubles in `quillpad-testkit`, and the terminal
//! surface in the CLI.
//!
//! All ports are `Send + Sync` so engine futures stay `Send`.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use quillpad_core::ApiError;

use crate::errors::{EditorError, StorageError};
use crate::views::{ActiveNav, Alert, AlertId, FooterView, NavBar, RegionPatch, ViewContent};

// ============================================================================
// Resource Client
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file attached to a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Original file name
    pub file_name: String,
    /// MIME type, if known
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Value of one multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Text field
    Text(String),
    /// File field
    File(FilePart),
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`, fields in order
    Multipart(Vec<(String, FormValue)>),
}

/// One API request. `path` is relative to the configured API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Verb
    pub method: Method,
    /// Path and query, starting with `/`
    pub path: String,
    /// Optional body
    pub body: Option<RequestBody>,
    /// Whether the stored token is attached
    pub authenticated: bool,
}

impl ApiRequest {
    /// Authenticated request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            authenticated: true,
        }
    }

    /// `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// `PUT path`
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// `PATCH path`
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// `DELETE path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, fields: Vec<(String, FormValue)>) -> Self {
        self.body = Some(RequestBody::Multipart(fields));
        self
    }

    /// Send without the auth token.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Issues API requests.
///
/// Implementations resolve to the decoded JSON body (`Value::Null` for empty
/// bodies) or an [`ApiError`] whose message is already user-facing.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Perform one request. Never retried by the engine.
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

// ============================================================================
// Persisted Session Storage
// ============================================================================

/// Storage key of the auth token.
pub const KEY_TOKEN: &str = "authToken";
/// Storage key of the username.
pub const KEY_USERNAME: &str = "authUsername";
/// Storage key of the numeric user id.
pub const KEY_USER_ID: &str = "authUserId";
/// Storage key of the role.
pub const KEY_ROLE: &str = "authUserRole";
/// Every session key, cleared together on logout.
pub const SESSION_KEYS: [&str; 4] = [KEY_TOKEN, KEY_USERNAME, KEY_USER_ID, KEY_ROLE];

/// String key-value store for the persisted session.
pub trait KeyValueStore: Send + Sync {
    /// Value for `key`, if set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Set `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// Location
// ============================================================================

/// The host's current hash location.
///
/// `assign` only records the new location. The engine schedules the dispatch
/// cycle itself, so hosts must not re-dispatch on their own `assign` calls.
pub trait HashLocation: Send + Sync {
    /// Current hash, `""` when none.
    fn current(&self) -> String;
    /// Replace the current hash.
    fn assign(&self, hash: &str);
}

// ============================================================================
// Surface
// ============================================================================

/// Where view models end up. Calls are synchronous and must not block.
pub trait Surface: Send + Sync {
    /// Replace the main region.
    fn render(&self, content: ViewContent);
    /// Update part of the main region.
    fn patch(&self, patch: RegionPatch);
    /// Show an alert.
    fn show_alert(&self, alert: &Alert);
    /// Remove one alert.
    fn dismiss_alert(&self, id: AlertId);
    /// Remove every alert.
    fn clear_alerts(&self);
    /// Replace the navigation bar.
    fn render_nav(&self, nav: &NavBar);
    /// Highlight a navigation link, or none.
    fn set_active_nav(&self, active: Option<&ActiveNav>);
    /// Replace the footer.
    fn render_footer(&self, footer: &FooterView);
    /// Move focus to the main content region.
    fn focus_main_content(&self);
    /// Ask the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
    /// Collapse an expanded mobile navigation menu.
    fn collapse_navigation(&self) {}
}

// ============================================================================
// Rich-Text Editor
// ============================================================================

/// A live markdown editor widget.
pub trait RichEditor: Send {
    /// Current markdown.
    fn markdown(&self) -> String;
    /// Release the widget and its host resources.
    fn destroy(&mut self) -> Result<(), EditorError>;
}

/// Builds editor widgets in the post form's editor mount.
pub trait EditorFactory: Send + Sync {
    /// Construct an editor holding `initial_content`.
    fn create(&self, initial_content: &str) -> Result<Box<dyn RichEditor>, EditorError>;
}
