//! # Application Facade
//!
//! [`App`] is what a host drives: it initializes the session, feeds location
//! changes to the router, and runs intents against the bound handler set.
//!
//! Navigation requested during a cycle or an intent (redirects, reloads,
//! post-submit navigation) is queued on the context and drained here, one full
//! cycle at a time, so a cycle never re-enters the router from inside itself.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::context::{AppContext, NavRequest, Ports, RenderToken};
use crate::errors::AppError;
use crate::intent::Intent;
use crate::loaders;
use crate::router::Router;
use crate::workflows::{admin, auth, comments, posts, profile};

/// Upper bound on queued cycles drained after one event.
pub const MAX_CHAINED_CYCLES: usize = 16;

/// The client engine.
pub struct App {
    ctx: Arc<AppContext>,
    router: Router,
}

impl App {
    /// Build the engine over `ports`. Nothing runs until [`Self::initialize`].
    pub fn new(config: AppConfig, ports: Ports) -> Self {
        let ctx = Arc::new(AppContext::new(config, ports));
        let router = Router::new(ctx.clone());
        Self { ctx, router }
    }

    /// Shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Router over the shared context.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Load the session, resolve a missing role, dispatch the current
    /// location, and load the footer.
    ///
    /// A stored token whose profile cannot be fetched is signed out; the
    /// sign-out navigation then replaces the initial dispatch.
    pub async fn initialize(&self) {
        let signed_in = self.ctx.session.refresh_from_storage();
        tracing::info!(signed_in, "Initializing client");
        self.ctx.render_nav();

        if self.ctx.session.needs_profile() {
            match auth::fetch_profile(&self.ctx, None).await {
                Ok(_) => self.ctx.render_nav(),
                Err(err) => {
                    tracing::warn!(error = %err, "Stored session is no longer valid");
                    auth::logout(&self.ctx, None).await;
                }
            }
        }

        if self.ctx.clear_pending() > 0 {
            tracing::debug!("Sign-out navigation replaces the initial dispatch");
        }
        self.router.run(&self.ctx.current_hash()).await;
        self.drain().await;
        loaders::load_footer(&self.ctx).await;
    }

    /// The host's location changed outside the engine.
    pub async fn handle_location_change(&self) {
        self.router.run(&self.ctx.current_hash()).await;
        self.drain().await;
    }

    /// Follow an in-app link. The current hash is re-dispatched once; any
    /// other hash is assigned and dispatched once.
    pub async fn navigate(&self, hash: &str) {
        self.ctx.navigate_to(hash);
        self.drain().await;
    }

    /// Run `intent` if the current view bound a handler for it, then any
    /// navigation it queued.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), AppError> {
        let kind = intent.kind();
        let token = match self.ctx.handlers.resolve(&intent) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(intent = %kind, error = %err, "Rejected intent");
                return Err(err.into());
            }
        };
        tracing::debug!(intent = %kind, token = ?token, "Dispatching intent");
        let result = self.run_intent(token, intent).await;
        if let Err(err) = &result {
            tracing::debug!(intent = %kind, error = %err, category = %err.category(), "Intent failed");
        }
        self.drain().await;
        result
    }

    async fn run_intent(
        &self,
        token: Option<RenderToken>,
        intent: Intent,
    ) -> Result<(), AppError> {
        let ctx = &self.ctx;
        // Scoped intents always resolve to the bound token.
        let scoped = || token.unwrap_or_else(|| ctx.current_token());
        match intent {
            Intent::ToggleLike { slug } => posts::toggle_like(ctx, scoped(), slug).await,
            Intent::ToggleSave { slug } => posts::toggle_save(ctx, scoped(), slug).await,
            Intent::DeletePost { slug } => posts::delete_post(ctx, scoped(), slug).await,
            Intent::SubmitPost(draft) => posts::submit_post(ctx, scoped(), draft).await,
            Intent::SubmitComment { parent, content } => {
                comments::submit_comment(ctx, scoped(), parent, content).await
            }
            Intent::OpenReply { comment_id } => {
                comments::open_reply(ctx, scoped(), comment_id);
                Ok(())
            }
            Intent::CancelReply => {
                comments::close_reply(ctx, scoped());
                Ok(())
            }
            Intent::DeleteComment { comment_id } => {
                comments::delete_comment(ctx, scoped(), comment_id).await
            }
            Intent::UpdateProfile { bio } => profile::update_profile(ctx, scoped(), bio).await,
            Intent::ChangePassword(change) => {
                profile::change_password(ctx, scoped(), change).await
            }
            Intent::UploadAvatar { file } => profile::upload_avatar(ctx, scoped(), file).await,
            Intent::ShowCategoryForm => {
                admin::show_form(ctx, scoped());
                Ok(())
            }
            Intent::CancelCategoryForm => {
                admin::cancel_form(ctx, scoped());
                Ok(())
            }
            Intent::EditCategory { id } => {
                admin::edit_category(ctx, scoped(), id);
                Ok(())
            }
            Intent::SubmitCategory { id, name } => {
                admin::submit_category(ctx, scoped(), id, name).await
            }
            Intent::DeleteCategory { id } => admin::delete_category(ctx, scoped(), id).await,
            Intent::Login { username, password } => {
                auth::login(ctx, scoped(), username, password).await
            }
            Intent::Register(registration) => auth::register(ctx, scoped(), registration).await,
            Intent::Logout => {
                auth::logout(ctx, token).await;
                Ok(())
            }
            Intent::DismissAlert(id) => {
                ctx.dismiss_alert(id);
                Ok(())
            }
        }
    }

    /// Run queued cycles until the queue is empty.
    async fn drain(&self) {
        for _ in 0..MAX_CHAINED_CYCLES {
            let Some(request) = self.ctx.take_pending() else {
                return;
            };
            let hash = self.ctx.current_hash();
            match &request {
                NavRequest::Changed(target) => tracing::debug!(target = %target, "Running queued navigation"),
                NavRequest::Reload => tracing::debug!(hash = %hash, "Running queued reload"),
            }
            self.router.run(&hash).await;
        }
        let dropped = self.ctx.clear_pending();
        if dropped > 0 {
            tracing::warn!(limit = MAX_CHAINED_CYCLES, dropped, "Navigation queue did not settle, dropping");
        }
    }
}
