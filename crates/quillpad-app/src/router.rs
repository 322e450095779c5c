//! # Router / Dispatcher
//!
//! Runs one dispatch cycle per navigation event:
//!
//! ```text
//! Teardown → Resolve → Guard → Placeholder + Bind → Highlight → [Load]
//! ```
//!
//! Everything before `Load` happens synchronously in [`Router::begin`], so the
//! previous cycle's editor, alerts and handlers are gone before any new render
//! work starts. `Load` is returned as a `'static` future for the host to await.
//! Guards redirect through [`AppContext::navigate_to`] and never load.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;

use quillpad_core::{Access, ListParams, Location, Route, View, HOME_HASH};

use crate::context::{AppContext, RenderToken};
use crate::errors::AlertLevel;
use crate::handlers::{HandlerScope, HandlerSet};
use crate::loaders;
use crate::views::{NavBar, ViewContent};
use crate::workflows::{auth, LOGIN_HASH};

/// Generic placeholder shown while a view loads.
pub const LOADING: &str = "Loading...";
/// Shown when create-post is refused.
pub const DENIED_CREATE_POST: &str = "You do not have permission to create posts.";

/// One started cycle.
pub struct Cycle {
    /// Token of the cycle
    pub token: RenderToken,
    /// Resolved view, `None` for the skip link
    pub view: Option<View>,
    /// Remaining load work, `None` when the cycle finished synchronously
    pub load: Option<BoxFuture<'static, ()>>,
}

impl Cycle {
    /// Await the load work, if any.
    pub async fn complete(self) {
        if let Some(load) = self.load {
            load.await;
        }
    }
}

/// Use the configured page size where the location does not name a limit.
fn apply_page_size(view: View, route: &Route, page_size: u64) -> View {
    if route.query_value("limit").is_some() {
        return view;
    }
    let sized = |params: ListParams| ListParams {
        limit: page_size,
        ..params
    };
    match view {
        View::PostList { source, params } => View::PostList {
            source,
            params: sized(params),
        },
        View::AdminUsers(params) => View::AdminUsers(sized(params)),
        View::AdminTags(params) => View::AdminTags(sized(params)),
        other => other,
    }
}

/// How a guard settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardOutcome {
    Pass,
    Redirect(&'static str),
}

/// The dispatcher.
#[derive(Clone)]
pub struct Router {
    ctx: Arc<AppContext>,
}

impl Router {
    /// Router over `ctx`.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Run a full cycle for `hash`.
    pub async fn run(&self, hash: &str) {
        self.begin(hash).complete().await;
    }

    /// Start a cycle for `hash` and return its pending load.
    pub fn begin(&self, hash: &str) -> Cycle {
        let ctx = &self.ctx;
        let token = ctx.next_token();
        self.teardown(token);

        let route = match Location::parse(hash) {
            Location::SkipLink => {
                tracing::debug!(%token, "Skip link, focusing main content");
                ctx.surface().render(ViewContent::Empty);
                ctx.surface().focus_main_content();
                return Cycle {
                    token,
                    view: None,
                    load: None,
                };
            }
            Location::Route(route) => route,
        };
        let view = apply_page_size(View::resolve(&route), &route, self.ctx.config.page_size);
        tracing::debug!(%token, route = ?route, view = %view, "Dispatching");

        if let GuardOutcome::Redirect(target) = self.guard(&view) {
            tracing::info!(%token, view = %view, target, "Guard redirect");
            return Cycle {
                token,
                view: Some(view),
                load: None,
            };
        }

        let load = self.start(token, &view);
        ctx.handlers.bind(HandlerSet {
            token,
            scope: HandlerScope::for_view(&view),
        });
        self.highlight(hash);
        Cycle {
            token,
            view: Some(view),
            load,
        }
    }

    fn teardown(&self, token: RenderToken) {
        tracing::debug!(%token, "Tearing down previous view");
        self.ctx.editor.destroy();
        self.ctx.clear_alerts();
        self.ctx.handlers.unbind_all();
        self.ctx.reset_state();
        self.ctx
            .surface()
            .render(ViewContent::Loading(LOADING.to_string()));
    }

    fn guard(&self, view: &View) -> GuardOutcome {
        let session = &self.ctx.session;
        let outcome = match view.access() {
            Access::GuestOnly if session.is_authenticated() => GuardOutcome::Redirect(HOME_HASH),
            Access::Authenticated if !session.is_authenticated() => {
                GuardOutcome::Redirect(LOGIN_HASH)
            }
            Access::Admin if !session.is_admin() => GuardOutcome::Redirect(HOME_HASH),
            _ => GuardOutcome::Pass,
        };
        let outcome = match (outcome, view) {
            (GuardOutcome::Pass, View::PostForm { slug: None }) if !session.can_create_post() => {
                self.ctx.show_alert(AlertLevel::Warning, DENIED_CREATE_POST);
                GuardOutcome::Redirect(HOME_HASH)
            }
            (GuardOutcome::Pass, View::RedirectHome { .. }) => GuardOutcome::Redirect(HOME_HASH),
            (outcome, _) => outcome,
        };
        if let GuardOutcome::Redirect(target) = outcome {
            self.ctx.navigate_to(target);
        }
        outcome
    }

    /// Render the view's placeholder and build its load future.
    fn start(&self, token: RenderToken, view: &View) -> Option<BoxFuture<'static, ()>> {
        let ctx = self.ctx.clone();
        let placeholder = |label: &str| {
            self.ctx
                .surface()
                .render(ViewContent::Loading(label.to_string()));
        };
        match view.clone() {
            View::PostList { source, params } => {
                Some(async move { loaders::load_post_list(&ctx, token, source, params).await }.boxed())
            }
            View::PostDetail { slug } => {
                placeholder("Loading post...");
                Some(async move { loaders::load_post_detail(&ctx, token, slug).await }.boxed())
            }
            View::Login => {
                ctx.surface().render(ViewContent::LoginForm);
                None
            }
            View::Register => {
                ctx.surface().render(ViewContent::RegisterForm);
                None
            }
            View::Logout => Some(async move { auth::logout(&ctx, Some(token)).await }.boxed()),
            View::Profile => {
                placeholder("Loading profile...");
                Some(async move { loaders::load_profile(&ctx, token).await }.boxed())
            }
            View::PostForm { slug } => {
                Some(async move { loaders::load_post_form(&ctx, token, slug).await }.boxed())
            }
            View::AdminCategories => {
                placeholder("Loading categories...");
                Some(async move { loaders::load_admin_categories(&ctx, token).await }.boxed())
            }
            View::AdminUsers(params) => {
                placeholder("Loading users...");
                Some(async move { loaders::load_admin_users(&ctx, token, params).await }.boxed())
            }
            View::AdminTags(params) => {
                placeholder("Loading tags...");
                Some(async move { loaders::load_admin_tags(&ctx, token, params).await }.boxed())
            }
            View::NotFound => {
                ctx.surface().render(ViewContent::NotFound);
                None
            }
            View::RedirectHome { .. } => None,
        }
    }

    fn highlight(&self, hash: &str) {
        let nav = NavBar::for_session(&self.ctx.session.current_user());
        let active = nav.active_for(hash);
        tracing::debug!(hash, active = ?active, "Active navigation");
        self.ctx.surface().set_active_nav(active.as_ref());
        self.ctx.surface().collapse_navigation();
    }
}
