//! Quillpad App - Headless Client Engine
//!
//! Drives the blog client against injected ports: a resource client for the
//! API, a key-value store for the session, a hash location, a rendering
//! surface, and an editor factory. Hosts call [`App::initialize`], forward
//! location changes, and dispatch [`Intent`]s; everything else happens here.
//!
//! # Modules
//!
//! ## Foundation
//! - `config`: `AppConfig` loading, env overrides, validation
//! - `errors`: `AppError`, `ErrorCategory` and the alert-level mapping
//! - `ports`: traits at every I/O seam
//!
//! ## State
//! - `context`: `AppContext`, render tokens, alerts, navigation queue, view state
//! - `session`: injectable session snapshot over persisted storage
//! - `editor`: single-instance editor lifecycle
//! - `handlers`: per-cycle handler sets
//!
//! ## Dispatch
//! - `router`: teardown, guards, placeholders, binding, nav highlight
//! - `loaders`: one loader per view
//! - `intent` / `workflows`: user actions and their handling
//! - `app`: the facade hosts drive
//!
//! ## Presentation
//! - `views`: view models, markdown rendering, navigation bar, footer

#![forbid(unsafe_code)]

// === Foundation ===

/// Engine configuration
pub mod config;

/// Error types and alert routing
pub mod errors;

/// Port traits
pub mod ports;

// === State ===

/// Shared engine context
pub mod context;

/// Editor lifecycle manager
pub mod editor;

/// Region-scoped handler sets
pub mod handlers;

/// Session context
pub mod session;

// === Dispatch ===

/// Application facade
pub mod app;

/// User actions
pub mod intent;

/// View loaders
pub mod loaders;

/// Router / dispatcher
pub mod router;

/// Intent workflows
pub mod workflows;

// === Presentation ===

/// View models
pub mod views;

pub use app::App;
pub use config::AppConfig;
pub use context::{AppContext, NavRequest, Ports, RenderToken};
pub use editor::EditorLifecycle;
pub use errors::{AlertLevel, AppError, ConfigError, EditorError, ErrorCategory, IntentError, StorageError};
pub use handlers::{HandlerRegistry, HandlerScope, HandlerSet};
pub use intent::{Intent, IntentKind, PasswordChange, PostDraft, Registration};
pub use ports::{
    ApiRequest, EditorFactory, FilePart, FormValue, HashLocation, KeyValueStore, Method,
    RequestBody, ResourceClient, RichEditor, Surface,
};
pub use router::{Cycle, Router};
pub use session::SessionStore;
pub use views::{Alert, AlertId, Control, RegionPatch, ViewContent};
