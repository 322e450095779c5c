//! Recording surface.

use parking_lot::Mutex;
use std::collections::VecDeque;

use quillpad_app::views::{ActiveNav, FooterView, NavBar};
use quillpad_app::{Alert, AlertId, RegionPatch, Surface, ViewContent};

/// One call made on the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// `render`
    Render(ViewContent),
    /// `patch`
    Patch(RegionPatch),
    /// `show_alert`
    Alert(Alert),
    /// `dismiss_alert`
    Dismiss(AlertId),
    /// `clear_alerts`
    ClearAlerts,
    /// `render_nav`
    Nav(NavBar),
    /// `set_active_nav`
    Active(Option<ActiveNav>),
    /// `render_footer`
    Footer(FooterView),
    /// `focus_main_content`
    Focus,
    /// `collapse_navigation`
    Collapse,
    /// `confirm`, with the prompt
    Confirm(String),
}

/// [`Surface`] that records every call. Confirmations answer `true` unless
/// scripted otherwise.
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    answers: Mutex<VecDeque<bool>>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next confirmation with `answer`.
    pub fn answer_confirm(&self, answer: bool) {
        self.answers.lock().push_back(answer);
    }

    /// Every call, in order.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Rendered main-region contents, in order.
    pub fn renders(&self) -> Vec<ViewContent> {
        self.collect(|e| match e {
            SurfaceEvent::Render(content) => Some(content.clone()),
            _ => None,
        })
    }

    /// Most recent render.
    pub fn last_render(&self) -> Option<ViewContent> {
        self.renders().pop()
    }

    /// Applied patches, in order.
    pub fn patches(&self) -> Vec<RegionPatch> {
        self.collect(|e| match e {
            SurfaceEvent::Patch(patch) => Some(patch.clone()),
            _ => None,
        })
    }

    /// Every alert ever shown, including ones since cleared.
    pub fn alert_history(&self) -> Vec<Alert> {
        self.collect(|e| match e {
            SurfaceEvent::Alert(alert) => Some(alert.clone()),
            _ => None,
        })
    }

    /// Messages of every alert ever shown.
    pub fn alert_messages(&self) -> Vec<String> {
        self.alert_history().into_iter().map(|a| a.message).collect()
    }

    /// Alerts still on screen.
    pub fn visible_alerts(&self) -> Vec<Alert> {
        let mut visible: Vec<Alert> = Vec::new();
        for event in self.events.lock().iter() {
            match event {
                SurfaceEvent::Alert(alert) => visible.push(alert.clone()),
                SurfaceEvent::Dismiss(id) => visible.retain(|a| a.id != *id),
                SurfaceEvent::ClearAlerts => visible.clear(),
                _ => {}
            }
        }
        visible
    }

    /// Most recent navigation bar.
    pub fn last_nav(&self) -> Option<NavBar> {
        self.collect(|e| match e {
            SurfaceEvent::Nav(nav) => Some(nav.clone()),
            _ => None,
        })
        .pop()
    }

    /// Most recent highlight.
    pub fn last_active(&self) -> Option<Option<ActiveNav>> {
        self.collect(|e| match e {
            SurfaceEvent::Active(active) => Some(active.clone()),
            _ => None,
        })
        .pop()
    }

    /// Rendered footers.
    pub fn footers(&self) -> Vec<FooterView> {
        self.collect(|e| match e {
            SurfaceEvent::Footer(footer) => Some(footer.clone()),
            _ => None,
        })
    }

    /// Confirmation prompts shown.
    pub fn confirm_prompts(&self) -> Vec<String> {
        self.collect(|e| match e {
            SurfaceEvent::Confirm(prompt) => Some(prompt.clone()),
            _ => None,
        })
    }

    /// Number of `focus_main_content` calls.
    pub fn focus_count(&self) -> usize {
        self.collect(|e| matches!(e, SurfaceEvent::Focus).then_some(())).len()
    }

    fn collect<T>(&self, f: impl FnMut(&SurfaceEvent) -> Option<T>) -> Vec<T> {
        self.events.lock().iter().filter_map(f).collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl Surface for RecordingSurface {
    fn render(&self, content: ViewContent) {
        self.push(SurfaceEvent::Render(content));
    }

    fn patch(&self, patch: RegionPatch) {
        self.push(SurfaceEvent::Patch(patch));
    }

    fn show_alert(&self, alert: &Alert) {
        self.push(SurfaceEvent::Alert(alert.clone()));
    }

    fn dismiss_alert(&self, id: AlertId) {
        self.push(SurfaceEvent::Dismiss(id));
    }

    fn clear_alerts(&self) {
        self.push(SurfaceEvent::ClearAlerts);
    }

    fn render_nav(&self, nav: &NavBar) {
        self.push(SurfaceEvent::Nav(nav.clone()));
    }

    fn set_active_nav(&self, active: Option<&ActiveNav>) {
        self.push(SurfaceEvent::Active(active.cloned()));
    }

    fn render_footer(&self, footer: &FooterView) {
        self.push(SurfaceEvent::Footer(footer.clone()));
    }

    fn focus_main_content(&self) {
        self.push(SurfaceEvent::Focus);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.push(SurfaceEvent::Confirm(prompt.to_string()));
        self.answers.lock().pop_front().unwrap_or(true)
    }

    fn collapse_navigation(&self) {
        self.push(SurfaceEvent::Collapse);
    }
}
