//! Engine wired to in-memory doubles.

use std::sync::Arc;

use quillpad_app::{App, AppConfig, AppContext, AppError, Intent, Ports};
use quillpad_core::session::Role;

use crate::client::ScriptedClient;
use crate::editor::FakeEditorFactory;
use crate::fixtures::{TEST_TOKEN, TEST_USERNAME, TEST_USER_ID};
use crate::memory::{MemoryLocation, MemoryStore};
use crate::surface::RecordingSurface;

/// An [`App`] plus handles to every double behind it.
pub struct TestApp {
    /// The engine
    pub app: App,
    /// API double
    pub client: Arc<ScriptedClient>,
    /// Rendering double
    pub surface: Arc<RecordingSurface>,
    /// Session storage
    pub store: Arc<MemoryStore>,
    /// Host location
    pub location: Arc<MemoryLocation>,
    /// Editor double
    pub editors: Arc<FakeEditorFactory>,
}

impl TestApp {
    /// Signed-out engine at `#/`.
    pub fn anonymous() -> Self {
        Self::build(AppConfig::default(), MemoryStore::new())
    }

    /// Engine with a stored session for the fixture user.
    pub fn signed_in(role: Role) -> Self {
        Self::build(
            AppConfig::default(),
            MemoryStore::signed_in(TEST_TOKEN, TEST_USERNAME, TEST_USER_ID, Some(role)),
        )
    }

    /// Engine over `config` and `store`. The session is loaded from `store`
    /// immediately; nothing is dispatched.
    pub fn build(config: AppConfig, store: MemoryStore) -> Self {
        let client = Arc::new(ScriptedClient::new());
        let surface = Arc::new(RecordingSurface::new());
        let store = Arc::new(store);
        let location = Arc::new(MemoryLocation::at("#/"));
        let editors = Arc::new(FakeEditorFactory::new());
        let ports = Ports {
            client: client.clone(),
            store: store.clone(),
            surface: surface.clone(),
            location: location.clone(),
            editors: editors.clone(),
        };
        let app = App::new(config, ports);
        app.context().session.refresh_from_storage();
        Self {
            app,
            client,
            surface,
            store,
            location,
            editors,
        }
    }

    /// Shared engine context.
    pub fn ctx(&self) -> &Arc<AppContext> {
        self.app.context()
    }

    /// Move the host to `hash` and let the engine dispatch it.
    pub async fn visit(&self, hash: &str) {
        self.location.set(hash);
        self.app.handle_location_change().await;
    }

    /// Dispatch a user action.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), AppError> {
        self.app.dispatch(intent).await
    }
}
