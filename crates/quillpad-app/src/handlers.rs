//! # Region-Scoped Handler Sets
//!
//! Each dispatch cycle binds exactly one handler set: the intents the rendered
//! view accepts, stamped with the cycle's render token. Teardown releases the
//! whole set at once, so a handler from a replaced view can never fire.

use parking_lot::Mutex;

use quillpad_core::View;

use crate::context::RenderToken;
use crate::errors::IntentError;
use crate::intent::{Intent, IntentKind};

/// Group of intents a view binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerScope {
    /// Like, save, delete on post cards
    PostList,
    /// Post actions plus comment submit/reply/cancel/delete
    PostDetail,
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Bio, password, avatar forms
    Profile,
    /// Create/edit post form
    PostForm,
    /// Category CRUD
    CategoryAdmin,
}

impl HandlerScope {
    /// Scope bound for `view`; `None` for views without interactive regions.
    #[must_use]
    pub fn for_view(view: &View) -> Option<Self> {
        match view {
            View::PostList { .. } => Some(Self::PostList),
            View::PostDetail { .. } => Some(Self::PostDetail),
            View::Login => Some(Self::Login),
            View::Register => Some(Self::Register),
            View::Profile => Some(Self::Profile),
            View::PostForm { .. } => Some(Self::PostForm),
            View::AdminCategories => Some(Self::CategoryAdmin),
            View::AdminUsers(_)
            | View::AdminTags(_)
            | View::Logout
            | View::RedirectHome { .. }
            | View::NotFound => None,
        }
    }

    /// Whether this scope handles `kind`.
    #[must_use]
    pub fn accepts(&self, kind: IntentKind) -> bool {
        use IntentKind as K;
        match self {
            Self::PostList => matches!(kind, K::ToggleLike | K::ToggleSave | K::DeletePost),
            Self::PostDetail => matches!(
                kind,
                K::ToggleLike
                    | K::ToggleSave
                    | K::DeletePost
                    | K::SubmitComment
                    | K::OpenReply
                    | K::CancelReply
                    | K::DeleteComment
            ),
            Self::Login => kind == K::Login,
            Self::Register => kind == K::Register,
            Self::Profile => matches!(
                kind,
                K::UpdateProfile | K::ChangePassword | K::UploadAvatar
            ),
            Self::PostForm => kind == K::SubmitPost,
            Self::CategoryAdmin => matches!(
                kind,
                K::ShowCategoryForm
                    | K::CancelCategoryForm
                    | K::EditCategory
                    | K::SubmitCategory
                    | K::DeleteCategory
            ),
        }
    }
}

/// The handlers bound for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerSet {
    /// Cycle that bound the set
    pub token: RenderToken,
    /// Intents accepted, `None` when only global intents are
    pub scope: Option<HandlerScope>,
}

/// Holder of the single live handler set.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    bound: Mutex<Option<HandlerSet>>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `set`, replacing whatever was bound.
    pub fn bind(&self, set: HandlerSet) {
        tracing::debug!(token = %set.token, scope = ?set.scope, "Binding handlers");
        *self.bound.lock() = Some(set);
    }

    /// Release the bound set.
    pub fn unbind_all(&self) {
        if let Some(set) = self.bound.lock().take() {
            tracing::debug!(token = %set.token, "Unbinding handlers");
        }
    }

    /// The bound set, if any.
    #[must_use]
    pub fn current(&self) -> Option<HandlerSet> {
        *self.bound.lock()
    }

    /// Token of the cycle whose handler accepts `intent`.
    ///
    /// Global intents resolve against the bound set's token, or `None` when
    /// nothing is bound.
    pub fn resolve(&self, intent: &Intent) -> Result<Option<RenderToken>, IntentError> {
        let kind = intent.kind();
        let bound = *self.bound.lock();
        if kind.is_global() {
            return Ok(bound.map(|set| set.token));
        }
        match bound {
            Some(HandlerSet {
                token,
                scope: Some(scope),
            }) if scope.accepts(kind) => Ok(Some(token)),
            _ => Err(IntentError::NotBound(kind)),
        }
    }
}
