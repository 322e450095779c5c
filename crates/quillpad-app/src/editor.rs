//! # Editor Lifecycle
//!
//! Owns the single rich-text editor instance.
//!
//! ```text
//! Idle --initialize--> Active --destroy--> Idle
//!  ^                     |
//!  +----initialize-------+  (destroys the old instance first)
//! ```
//!
//! At most one instance is live at any time. Teardown is idempotent and never
//! fails outward: widget errors during release are logged and the manager still
//! returns to `Idle`.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::EditorError;
use crate::ports::{EditorFactory, RichEditor};

enum EditorState {
    Idle,
    Active(Box<dyn RichEditor>),
}

/// Single-instance editor manager.
pub struct EditorLifecycle {
    factory: Arc<dyn EditorFactory>,
    state: Mutex<EditorState>,
}

impl EditorLifecycle {
    /// Manager in `Idle` over `factory`.
    pub fn new(factory: Arc<dyn EditorFactory>) -> Self {
        Self {
            factory,
            state: Mutex::new(EditorState::Idle),
        }
    }

    /// Replace any live instance with a new one holding `initial_content`.
    ///
    /// On construction failure the manager stays `Idle` and the error is
    /// returned for the caller to render as a fallback.
    pub fn initialize(&self, initial_content: &str) -> Result<(), EditorError> {
        let mut state = self.state.lock();
        Self::release(&mut state);
        match self.factory.create(initial_content) {
            Ok(editor) => {
                *state = EditorState::Active(editor);
                tracing::debug!("Editor initialized");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to initialize editor");
                Err(err)
            }
        }
    }

    /// Release the live instance, if any. Safe to call from `Idle`.
    pub fn destroy(&self) {
        let mut state = self.state.lock();
        Self::release(&mut state);
    }

    fn release(state: &mut EditorState) {
        if let EditorState::Active(mut editor) = std::mem::replace(state, EditorState::Idle) {
            match editor.destroy() {
                Ok(()) => tracing::debug!("Editor instance destroyed"),
                Err(err) => tracing::error!(error = %err, "Error destroying editor instance"),
            }
        }
    }

    /// Whether an instance is live.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(*self.state.lock(), EditorState::Active(_))
    }

    /// Markdown of the live instance.
    pub fn markdown(&self) -> Result<String, EditorError> {
        match &*self.state.lock() {
            EditorState::Active(editor) => Ok(editor.markdown()),
            EditorState::Idle => Err(EditorError::NotReady),
        }
    }
}
