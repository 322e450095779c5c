//! Quillpad Testing Infrastructure
//!
//! In-memory doubles for every engine port plus record fixtures, so engine
//! tests can script the API, drive navigation, and assert on what was
//! rendered without a network or a UI.

//!
//! # Usage
//!
//! ```rust,no_run
//! use quillpad_testkit::*;
//!
//! # async fn demo() {
//! let harness = TestApp::anonymous();
//! harness.client.respond_json(Method::Get, "/posts/?limit=10&offset=0", paged(0, vec![]));
//! harness.visit("#/").await;
//! assert_eq!(harness.surface.last_render().unwrap().kind(), "post_list");
//! # }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod client;
pub mod editor;
pub mod fixtures;
pub mod harness;
pub mod memory;
pub mod surface;

pub use client::{Gate, ScriptedClient};
pub use editor::{EditorCounts, FakeEditorFactory};
pub use fixtures::*;
pub use harness::TestApp;
pub use memory::{MemoryLocation, MemoryStore};
pub use surface::{RecordingSurface, SurfaceEvent};

pub use quillpad_app::Method;
