//! # Application Context
//!
//! The explicit context passed to the router, loaders, and workflows in place
//! of process-wide globals: configuration, ports, the session, the editor, the
//! bound handler set, and the per-cycle view state.
//!
//! ## Render tokens
//!
//! Every dispatch cycle takes the next [`RenderToken`]. Async work captures
//! the token it started under and checks [`AppContext::is_current`] before
//! touching the surface, so a response arriving after the user navigated away
//! is dropped instead of overwriting the new view.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use quillpad_core::location::normalize_hash;
use quillpad_core::{CategoryRecord, ListSource};

use crate::config::AppConfig;
use crate::editor::EditorLifecycle;
use crate::errors::{AlertLevel, AppError};
use crate::handlers::HandlerRegistry;
use crate::ports::{
    ApiRequest, EditorFactory, HashLocation, KeyValueStore, ResourceClient, Surface,
};
use crate::session::SessionStore;
use crate::views::{Alert, AlertId, CategoryForm, NavBar};

// ============================================================================
// Render Token
// ============================================================================

/// Monotonic identifier of a dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderToken(pub u64);

impl fmt::Display for RenderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Ports Bundle
// ============================================================================

/// Every port the engine needs.
#[derive(Clone)]
pub struct Ports {
    /// API access
    pub client: Arc<dyn ResourceClient>,
    /// Persisted session storage
    pub store: Arc<dyn KeyValueStore>,
    /// Rendering target
    pub surface: Arc<dyn Surface>,
    /// Host location
    pub location: Arc<dyn HashLocation>,
    /// Editor widget factory
    pub editors: Arc<dyn EditorFactory>,
}

// ============================================================================
// View State
// ============================================================================

/// The post shown by the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailModel {
    /// Post slug
    pub slug: String,
    /// Post id, needed to load and submit comments
    pub post_id: Option<i64>,
}

/// Named view-model fields of the current cycle. Reset on every dispatch.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// List shown, if the view is a post list
    pub list_source: Option<ListSource>,
    /// Slugs of the cards shown, in order
    pub listed: Vec<String>,
    /// Post shown by the detail view
    pub detail: Option<DetailModel>,
    /// Comment whose reply form is open
    pub reply_open: Option<i64>,
    /// Categories shown on the admin page
    pub categories: Vec<CategoryRecord>,
    /// Category form state
    pub category_form: CategoryForm,
}

/// A scheduled dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    /// The location changed to this hash
    Changed(String),
    /// Same location, re-run the cycle
    Reload,
}

// ============================================================================
// Context
// ============================================================================

/// Shared engine state.
pub struct AppContext {
    /// Configuration
    pub config: AppConfig,
    /// Session snapshot and persistence
    pub session: SessionStore,
    /// Single editor instance
    pub editor: EditorLifecycle,
    /// Bound handler set
    pub handlers: HandlerRegistry,
    client: Arc<dyn ResourceClient>,
    surface: Arc<dyn Surface>,
    location: Arc<dyn HashLocation>,
    render_token: AtomicU64,
    next_alert: AtomicU64,
    alerts: Mutex<Vec<Alert>>,
    pending: Mutex<VecDeque<NavRequest>>,
    state: Mutex<ViewState>,
}

impl AppContext {
    /// Build a context. The session starts empty until refreshed.
    pub fn new(config: AppConfig, ports: Ports) -> Self {
        Self {
            session: SessionStore::new(ports.store),
            editor: EditorLifecycle::new(ports.editors),
            handlers: HandlerRegistry::new(),
            client: ports.client,
            surface: ports.surface,
            location: ports.location,
            config,
            render_token: AtomicU64::new(0),
            next_alert: AtomicU64::new(0),
            alerts: Mutex::new(Vec::new()),
            pending: Mutex::new(VecDeque::new()),
            state: Mutex::new(ViewState::default()),
        }
    }

    /// Rendering target.
    #[must_use]
    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    // ------------------------------------------------------------------------
    // Render tokens
    // ------------------------------------------------------------------------

    /// Start a new cycle and return its token.
    pub fn next_token(&self) -> RenderToken {
        RenderToken(self.render_token.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Token of the latest cycle.
    #[must_use]
    pub fn current_token(&self) -> RenderToken {
        RenderToken(self.render_token.load(Ordering::SeqCst))
    }

    /// Whether `token` belongs to the latest cycle.
    #[must_use]
    pub fn is_current(&self, token: RenderToken) -> bool {
        self.current_token() == token
    }

    /// Render `content` only if `token` is still current.
    pub fn render_if_current(&self, token: RenderToken, content: crate::views::ViewContent) -> bool {
        if self.is_current(token) {
            self.surface.render(content);
            true
        } else {
            tracing::warn!(%token, current = %self.current_token(), kind = content.kind(), "Discarding stale render");
            false
        }
    }

    /// Apply `patch` only if `token` is still current.
    pub fn patch_if_current(&self, token: RenderToken, patch: crate::views::RegionPatch) -> bool {
        if self.is_current(token) {
            self.surface.patch(patch);
            true
        } else {
            tracing::warn!(%token, current = %self.current_token(), "Discarding stale patch");
            false
        }
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    async fn issue(&self, request: ApiRequest) -> Result<Value, AppError> {
        tracing::debug!(method = %request.method, path = %request.path, "API request");
        let described = request.to_string();
        self.client.request(request).await.map_err(|err| {
            tracing::warn!(request = %described, status = ?err.status, error = %err, "API request failed");
            AppError::from(err)
        })
    }

    fn decode<T: DeserializeOwned>(path: String, value: Value) -> Result<T, AppError> {
        serde_json::from_value(value).map_err(|e| {
            let err = AppError::Decode {
                path,
                reason: e.to_string(),
            };
            tracing::warn!(error = %err, "Failed to decode response");
            err
        })
    }

    /// Issue `request`. Failures are logged and, while `token` is current (or
    /// when there is no token), shown as a danger alert.
    pub async fn send(
        &self,
        token: Option<RenderToken>,
        request: ApiRequest,
    ) -> Result<Value, AppError> {
        let result = self.issue(request).await;
        if let Err(err) = &result {
            self.report(token, err);
        }
        result
    }

    /// [`Self::send`] and decode the body as `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        token: Option<RenderToken>,
        request: ApiRequest,
    ) -> Result<T, AppError> {
        let path = request.path.clone();
        let value = self.send(token, request).await?;
        Self::decode(path, value).map_err(|err| {
            self.report(token, &err);
            err
        })
    }

    /// Like [`Self::fetch`] but failures are only logged. Used for auxiliary
    /// data that degrades to nothing.
    pub async fn fetch_quiet<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, AppError> {
        let path = request.path.clone();
        let value = self.issue(request).await?;
        Self::decode(path, value)
    }

    /// Show `err` as an alert if its category calls for one and `token` is
    /// still current.
    pub fn report(&self, token: Option<RenderToken>, err: &AppError) {
        let Some(level) = err.alert_level() else {
            return;
        };
        if token.map_or(true, |t| self.is_current(t)) {
            self.show_alert(level, err.to_string());
        }
    }

    // ------------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------------

    /// Show an alert and return its id.
    pub fn show_alert(&self, level: AlertLevel, message: impl Into<String>) -> AlertId {
        let alert = Alert {
            id: AlertId(self.next_alert.fetch_add(1, Ordering::SeqCst) + 1),
            level,
            message: message.into(),
        };
        tracing::debug!(id = alert.id.0, %level, message = %alert.message, "Alert");
        self.surface.show_alert(&alert);
        let id = alert.id;
        self.alerts.lock().push(alert);
        id
    }

    /// Dismiss one alert. Unknown ids are ignored.
    pub fn dismiss_alert(&self, id: AlertId) {
        let mut alerts = self.alerts.lock();
        let before = alerts.len();
        alerts.retain(|alert| alert.id != id);
        if alerts.len() != before {
            self.surface.dismiss_alert(id);
        }
    }

    /// Dismiss every alert.
    pub fn clear_alerts(&self) {
        self.alerts.lock().clear();
        self.surface.clear_alerts();
    }

    /// Alerts currently shown, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Current hash, with the empty hash normalized to `#/`.
    #[must_use]
    pub fn current_hash(&self) -> String {
        normalize_hash(&self.location.current()).to_string()
    }

    /// Go to `hash`. A different hash is assigned and dispatched; the current
    /// hash is dispatched again.
    pub fn navigate_to(&self, hash: &str) {
        let mut pending = self.pending.lock();
        if self.location.current() != hash {
            tracing::info!(hash, "Navigating");
            self.location.assign(hash);
            pending.push_back(NavRequest::Changed(hash.to_string()));
        } else {
            tracing::info!(hash, "Already at location, reloading");
            pending.push_back(NavRequest::Reload);
        }
    }

    /// Re-run the current cycle.
    pub fn reload(&self) {
        tracing::info!("Reloading current view");
        self.pending.lock().push_back(NavRequest::Reload);
    }

    /// Next scheduled cycle, if any.
    pub fn take_pending(&self) -> Option<NavRequest> {
        self.pending.lock().pop_front()
    }

    /// Drop every scheduled cycle. Returns how many were dropped.
    pub fn clear_pending(&self) -> usize {
        let mut pending = self.pending.lock();
        let dropped = pending.len();
        pending.clear();
        dropped
    }

    /// Re-render the navigation bar and its highlight for the current hash.
    pub fn render_nav(&self) {
        let nav = NavBar::for_session(&self.session.current_user());
        self.surface.render_nav(&nav);
        self.surface
            .set_active_nav(nav.active_for(&self.current_hash()).as_ref());
    }

    // ------------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------------

    /// Run `f` with the view state locked.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Drop every view-model field of the previous cycle.
    pub fn reset_state(&self) {
        *self.state.lock() = ViewState::default();
    }
}
