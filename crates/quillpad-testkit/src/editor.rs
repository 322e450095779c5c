//! Fake editor widgets that count their lifecycle.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use quillpad_app::{EditorError, EditorFactory, RichEditor};

/// Lifecycle counters shared by a factory and its editors.
#[derive(Debug, Default)]
pub struct EditorCounts {
    created: AtomicUsize,
    destroyed: AtomicUsize,
}

impl EditorCounts {
    /// Editors constructed.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Editors destroyed, successfully or not.
    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Editors constructed and not yet destroyed.
    pub fn live(&self) -> usize {
        self.created() - self.destroyed()
    }
}

/// [`EditorFactory`] producing in-memory editors.
#[derive(Default)]
pub struct FakeEditorFactory {
    counts: Arc<EditorCounts>,
    fail_create: AtomicBool,
    fail_destroy: Arc<AtomicBool>,
    typed: Mutex<Option<String>>,
    initial: Mutex<Vec<String>>,
}

impl FakeEditorFactory {
    /// Factory whose editors always succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counters.
    pub fn counts(&self) -> Arc<EditorCounts> {
        self.counts.clone()
    }

    /// Make construction fail.
    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make teardown report an error.
    pub fn fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    /// Content the next editors report instead of their initial content, as if
    /// the user had typed it.
    pub fn type_content(&self, markdown: &str) {
        *self.typed.lock() = Some(markdown.to_string());
    }

    /// Initial content each editor was created with.
    pub fn initial_contents(&self) -> Vec<String> {
        self.initial.lock().clone()
    }
}

struct FakeEditor {
    content: String,
    counts: Arc<EditorCounts>,
    fail_destroy: Arc<AtomicBool>,
}

impl RichEditor for FakeEditor {
    fn markdown(&self) -> String {
        self.content.clone()
    }

    fn destroy(&mut self) -> Result<(), EditorError> {
        self.counts.destroyed.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(EditorError::Teardown("widget already detached".into()));
        }
        Ok(())
    }
}

impl EditorFactory for FakeEditorFactory {
    fn create(&self, initial_content: &str) -> Result<Box<dyn RichEditor>, EditorError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(EditorError::Construction("editor script missing".into()));
        }
        self.initial.lock().push(initial_content.to_string());
        self.counts.created.fetch_add(1, Ordering::SeqCst);
        let content = self
            .typed
            .lock()
            .clone()
            .unwrap_or_else(|| initial_content.to_string());
        Ok(Box::new(FakeEditor {
            content,
            counts: self.counts.clone(),
            fail_destroy: self.fail_destroy.clone(),
        }))
    }
}
