//! # View Models
//!
//! Named data the engine hands to a [`Surface`](crate::ports::Surface). Loaders
//! and workflows build these; renderers consume them. Nothing here is read back
//! from what was rendered.

pub mod footer;
pub mod markdown;
pub mod nav;
pub mod posts;

use serde::{Deserialize, Serialize};

use quillpad_core::{CategoryRecord, PageWindow, TagRecord, UserRecord};

use crate::errors::AlertLevel;

pub use footer::FooterView;
pub use nav::{ActiveNav, NavBar, NavItem, NavLink};
pub use posts::{CommentView, CommentsView, PostDetailView, PostListView, PostSummary};

// ============================================================================
// Alerts
// ============================================================================

/// Identifier of a shown alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertId(pub u64);

/// A transient, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Identifier used for dismissal
    pub id: AlertId,
    /// Severity
    pub level: AlertLevel,
    /// User-facing text
    pub message: String,
}

// ============================================================================
// Controls
// ============================================================================

/// An interactive control whose busy state the engine toggles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Like button of a post
    Like(String),
    /// Save button of a post
    Save(String),
    /// Delete button of a post
    DeletePost(String),
    /// Delete button of a comment
    DeleteComment(i64),
    /// Delete button of a category row
    DeleteCategory(i64),
    /// Main comment form (`None`) or a reply form
    CommentForm(Option<i64>),
    /// Create/edit post form
    PostForm,
    /// Category create/edit form
    CategoryForm,
    /// Bio form
    ProfileForm,
    /// Password change form
    PasswordForm,
    /// Avatar upload form
    AvatarForm,
    /// Login form
    LoginForm,
    /// Registration form
    RegisterForm,
}

// ============================================================================
// Content Region
// ============================================================================

/// Full contents of the main region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewContent {
    /// Nothing (skip-link focus)
    Empty,
    /// Loading placeholder with its label
    Loading(String),
    /// Post list
    PostList(PostListView),
    /// Post detail with comments
    PostDetail(PostDetailView),
    /// Login form
    LoginForm,
    /// Registration form
    RegisterForm,
    /// Profile page
    Profile(ProfileView),
    /// Create/edit post form
    PostForm(PostFormView),
    /// Category administration
    CategoryAdmin(CategoryAdminView),
    /// User list
    UserAdmin(UserAdminView),
    /// Tag list
    TagAdmin(TagAdminView),
    /// Inline error message
    Error(String),
    /// Static not-found page
    NotFound,
}

impl ViewContent {
    /// Short name for logs and assertions.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading(_) => "loading",
            Self::PostList(_) => "post_list",
            Self::PostDetail(_) => "post_detail",
            Self::LoginForm => "login_form",
            Self::RegisterForm => "register_form",
            Self::Profile(_) => "profile",
            Self::PostForm(_) => "post_form",
            Self::CategoryAdmin(_) => "category_admin",
            Self::UserAdmin(_) => "user_admin",
            Self::TagAdmin(_) => "tag_admin",
            Self::Error(_) => "error",
            Self::NotFound => "not_found",
        }
    }
}

/// Partial update of the main region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionPatch {
    /// Replace the comments section
    Comments(CommentsView),
    /// Open the reply form under one comment, closing any other (`None` closes all)
    ReplyForm {
        /// Comment whose reply form is open
        open: Option<i64>,
    },
    /// Empty a comment textarea
    ClearCommentInput {
        /// Reply form parent, `None` for the main form
        parent: Option<i64>,
    },
    /// Like button state and count
    Like {
        /// Post slug
        slug: String,
        /// Whether the user likes the post
        liked: bool,
        /// Updated like count
        like_count: u64,
    },
    /// Save button state
    Saved {
        /// Post slug
        slug: String,
        /// Whether the post is saved
        saved: bool,
    },
    /// Remove a post card from a list
    RemovePost {
        /// Post slug
        slug: String,
    },
    /// Disable or re-enable a control
    Busy {
        /// The control
        control: Control,
        /// Whether it is disabled while work is in flight
        busy: bool,
    },
    /// Replace the post form container
    PostForm(PostFormView),
    /// Replace the editor mount with a fallback message
    EditorUnavailable(String),
    /// Show, prefill, or hide the category form
    CategoryForm(CategoryForm),
    /// Replace the profile card
    Profile(ProfileView),
}

// ============================================================================
// Forms and Admin
// ============================================================================

/// Loading state of the post form's lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStatus {
    /// Categories/tags (and the post, when editing) are in flight
    Loading,
    /// Ready for input
    Ready,
    /// Lookups failed; the message replaces the form
    Failed(String),
}

/// Create/edit post form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostFormView {
    /// "Create New Post" or "Edit Post"
    pub heading: String,
    /// Slug when editing
    pub slug: Option<String>,
    /// Category choices
    pub categories: Vec<CategoryRecord>,
    /// Tag suggestions
    pub tags: Vec<TagRecord>,
    /// Post being edited, used to prefill fields
    pub post: Option<quillpad_core::PostRecord>,
    /// Lookup state
    pub status: FormStatus,
}

impl PostFormView {
    /// Empty form while lookups run.
    #[must_use]
    pub fn loading(slug: Option<String>) -> Self {
        let heading = if slug.is_some() { "Edit Post" } else { "Create New Post" };
        Self {
            heading: heading.to_string(),
            slug,
            categories: Vec::new(),
            tags: Vec::new(),
            post: None,
            status: FormStatus::Loading,
        }
    }
}

/// Category form visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryForm {
    /// Collapsed
    #[default]
    Hidden,
    /// Visible, blank (`None`) or prefilled for editing
    Open {
        /// Category being edited
        editing: Option<CategoryRecord>,
    },
}

/// Category administration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAdminView {
    /// All categories
    pub categories: Vec<CategoryRecord>,
    /// Form state
    pub form: CategoryForm,
}

/// User administration page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAdminView {
    /// Users on this page
    pub users: Vec<UserRecord>,
    /// Pagination widget
    pub pagination: Option<PageWindow>,
}

/// Tag administration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAdminView {
    /// Tags on this page
    pub tags: Vec<TagRecord>,
    /// Pagination widget
    pub pagination: Option<PageWindow>,
}

/// Profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    /// Profile record as returned by the API
    pub user: UserRecord,
}
