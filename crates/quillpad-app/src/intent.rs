//! # Intents: User Actions as Messages
//!
//! Every interaction a rendered view offers is an [`Intent`]. The router binds
//! the set of intents a view accepts at the start of each cycle (see
//! [`crate::handlers`]); anything outside that set is rejected before its
//! workflow runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ports::FilePart;
use crate::views::AlertId;

/// Post form contents at submit time. The body comes from the live editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    /// Slug when editing
    pub slug: Option<String>,
    /// Title
    pub title: String,
    /// Selected category id or name, empty for none
    pub category: String,
    /// Comma-separated tag names, empty for none
    pub tags: String,
    /// Published flag
    pub is_published: bool,
    /// Featured flag
    pub featured: bool,
    /// New featured image
    pub featured_image: Option<FilePart>,
    /// Remove the current image (edit only)
    pub remove_image: bool,
}

/// Password change form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    /// Current password
    pub current: String,
    /// New password
    pub new: String,
    /// Confirmation of the new password
    pub confirm: String,
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    // =========================================================================
    // Post Actions
    // =========================================================================
    /// Like or unlike a post
    ToggleLike {
        /// Post slug
        slug: String,
    },
    /// Save or unsave a post
    ToggleSave {
        /// Post slug
        slug: String,
    },
    /// Delete a post after confirmation
    DeletePost {
        /// Post slug
        slug: String,
    },
    /// Submit the create/edit form
    SubmitPost(PostDraft),

    // =========================================================================
    // Comment Actions
    // =========================================================================
    /// Post a comment or a reply
    SubmitComment {
        /// Comment being replied to
        parent: Option<i64>,
        /// Markdown body
        content: String,
    },
    /// Toggle the reply form under a comment
    OpenReply {
        /// Comment to reply to
        comment_id: i64,
    },
    /// Close the open reply form
    CancelReply,
    /// Delete a comment after confirmation
    DeleteComment {
        /// Comment id
        comment_id: i64,
    },

    // =========================================================================
    // Profile Actions
    // =========================================================================
    /// Update the biography
    UpdateProfile {
        /// New biography
        bio: String,
    },
    /// Change the password, then sign out
    ChangePassword(PasswordChange),
    /// Upload a new avatar
    UploadAvatar {
        /// Selected file, `None` when nothing was chosen
        file: Option<FilePart>,
    },

    // =========================================================================
    // Category Administration
    // =========================================================================
    /// Open a blank category form
    ShowCategoryForm,
    /// Hide the category form
    CancelCategoryForm,
    /// Open the category form prefilled for editing
    EditCategory {
        /// Category id
        id: i64,
    },
    /// Create (`id = None`) or rename a category
    SubmitCategory {
        /// Category being edited
        id: Option<i64>,
        /// Name
        name: String,
    },
    /// Delete a category after confirmation
    DeleteCategory {
        /// Category id
        id: i64,
    },

    // =========================================================================
    // Auth
    // =========================================================================
    /// Sign in
    Login {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Create an account
    Register(Registration),
    /// Sign out (navigation bar, available everywhere)
    Logout,

    // =========================================================================
    // Chrome
    // =========================================================================
    /// Dismiss one alert (available everywhere)
    DismissAlert(AlertId),
}

/// Field-less discriminant of [`Intent`], used for binding and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    /// [`Intent::ToggleLike`]
    ToggleLike,
    /// [`Intent::ToggleSave`]
    ToggleSave,
    /// [`Intent::DeletePost`]
    DeletePost,
    /// [`Intent::SubmitPost`]
    SubmitPost,
    /// [`Intent::SubmitComment`]
    SubmitComment,
    /// [`Intent::OpenReply`]
    OpenReply,
    /// [`Intent::CancelReply`]
    CancelReply,
    /// [`Intent::DeleteComment`]
    DeleteComment,
    /// [`Intent::UpdateProfile`]
    UpdateProfile,
    /// [`Intent::ChangePassword`]
    ChangePassword,
    /// [`Intent::UploadAvatar`]
    UploadAvatar,
    /// [`Intent::ShowCategoryForm`]
    ShowCategoryForm,
    /// [`Intent::CancelCategoryForm`]
    CancelCategoryForm,
    /// [`Intent::EditCategory`]
    EditCategory,
    /// [`Intent::SubmitCategory`]
    SubmitCategory,
    /// [`Intent::DeleteCategory`]
    DeleteCategory,
    /// [`Intent::Login`]
    Login,
    /// [`Intent::Register`]
    Register,
    /// [`Intent::Logout`]
    Logout,
    /// [`Intent::DismissAlert`]
    DismissAlert,
}

impl IntentKind {
    /// Whether the intent is accepted on every view.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Logout | Self::DismissAlert)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Intent {
    /// Discriminant.
    #[must_use]
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::ToggleLike { .. } => IntentKind::ToggleLike,
            Self::ToggleSave { .. } => IntentKind::ToggleSave,
            Self::DeletePost { .. } => IntentKind::DeletePost,
            Self::SubmitPost(_) => IntentKind::SubmitPost,
            Self::SubmitComment { .. } => IntentKind::SubmitComment,
            Self::OpenReply { .. } => IntentKind::OpenReply,
            Self::CancelReply => IntentKind::CancelReply,
            Self::DeleteComment { .. } => IntentKind::DeleteComment,
            Self::UpdateProfile { .. } => IntentKind::UpdateProfile,
            Self::ChangePassword(_) => IntentKind::ChangePassword,
            Self::UploadAvatar { .. } => IntentKind::UploadAvatar,
            Self::ShowCategoryForm => IntentKind::ShowCategoryForm,
            Self::CancelCategoryForm => IntentKind::CancelCategoryForm,
            Self::EditCategory { .. } => IntentKind::EditCategory,
            Self::SubmitCategory { .. } => IntentKind::SubmitCategory,
            Self::DeleteCategory { .. } => IntentKind::DeleteCategory,
            Self::Login { .. } => IntentKind::Login,
            Self::Register(_) => IntentKind::Register,
            Self::Logout => IntentKind::Logout,
            Self::DismissAlert(_) => IntentKind::DismissAlert,
        }
    }
}
