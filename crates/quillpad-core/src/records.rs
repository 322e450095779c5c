//! # Wire Records
//!
//! Shapes of the JSON records the remote API returns. Every field the client can
//! live without is defaulted, so partial serializers and older servers still
//! deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AuthorRef, Authored, Role};

// ============================================================================
// Listings
// ============================================================================

/// A list endpoint response: either a limit/offset page or a bare array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// `{count, results}` page
    Paged {
        /// Total number of items across all pages
        #[serde(default)]
        count: u64,
        /// Items on this page
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
    /// Unpaged array
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    /// Items on this page and the total count. A bare array counts itself.
    pub fn into_parts(self) -> (Vec<T>, u64) {
        match self {
            Self::Paged { count, results } => (results, count),
            Self::Bare(items) => {
                let count = items.len() as u64;
                (items, count)
            }
        }
    }

    /// Items only.
    pub fn into_items(self) -> Vec<T> {
        self.into_parts().0
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::Bare(Vec::new())
    }
}

// ============================================================================
// Posts
// ============================================================================

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Numeric id
    #[serde(default)]
    pub id: Option<i64>,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Markdown body
    #[serde(default)]
    pub content: Option<String>,
    /// Author (the post serializer sends a username)
    #[serde(default)]
    pub author: Option<AuthorRef>,
    /// Category name
    #[serde(default)]
    pub category: Option<String>,
    /// Tag names
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of comments
    #[serde(default)]
    pub comment_count: Option<u64>,
    /// Number of views
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Users who liked the post
    #[serde(default)]
    pub likes: Vec<serde_json::Value>,
    /// Absolute URL of the featured image
    #[serde(default)]
    pub featured_image_url: Option<String>,
    /// Published flag
    #[serde(default)]
    pub is_published: bool,
    /// Featured flag
    #[serde(default)]
    pub featured: bool,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostRecord {
    /// Like count as displayed.
    #[must_use]
    pub fn like_count(&self) -> u64 {
        self.likes.len() as u64
    }

    /// Author name as displayed on a post.
    #[must_use]
    pub fn author_name(&self) -> Option<String> {
        match &self.author {
            Some(AuthorRef::ByName(name)) => Some(name.clone()),
            Some(AuthorRef::ById(id)) => Some(id.to_string()),
            Some(AuthorRef::Embedded { username, .. }) => username.clone(),
            None => None,
        }
    }
}

impl Authored for PostRecord {
    fn author_ref(&self) -> Option<AuthorRef> {
        self.author.clone()
    }
}

/// `POST /posts/<slug>/like/` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LikeResponse {
    /// Whether the current user now likes the post
    #[serde(default)]
    pub liked: bool,
    /// Updated like count
    #[serde(default)]
    pub like_count: u64,
}

/// `POST /posts/<slug>/save/` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    /// Whether the post is now saved
    #[serde(default)]
    pub saved: bool,
}

// ============================================================================
// Comments
// ============================================================================

/// A comment as sent by the API, before tree building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Numeric id; required by the tree builder
    #[serde(default)]
    pub id: Option<i64>,
    /// Post the comment belongs to
    #[serde(default)]
    pub post: Option<i64>,
    /// Parent comment id
    #[serde(default)]
    pub parent: Option<i64>,
    /// Author reference
    #[serde(default)]
    pub author: Option<AuthorRef>,
    /// Author avatar URL, sent next to a bare author name
    #[serde(default)]
    pub author_avatar: Option<String>,
    /// Markdown body
    #[serde(default)]
    pub content: String,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Authored for CommentRecord {
    fn author_ref(&self) -> Option<AuthorRef> {
        self.author.clone()
    }
}

// ============================================================================
// Taxonomy
// ============================================================================

/// A post category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Numeric id
    pub id: i64,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
}

/// A tag with its usage count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Numeric id
    #[serde(default)]
    pub id: Option<i64>,
    /// Tag name
    #[serde(default)]
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: String,
    /// Number of posts using the tag
    #[serde(default)]
    pub post_count: Option<u64>,
}

/// `GET /posts/stats/` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    /// All posts
    #[serde(default)]
    pub total_posts: Option<u64>,
    /// Published posts
    #[serde(default)]
    pub published_posts: Option<u64>,
    /// Categories
    #[serde(default)]
    pub total_categories: Option<u64>,
    /// Comments
    #[serde(default)]
    pub total_comments: Option<u64>,
    /// Tags
    #[serde(default)]
    pub total_tags: Option<u64>,
}

// ============================================================================
// Users
// ============================================================================

/// A user profile or admin user-list entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Numeric id
    #[serde(default)]
    pub id: Option<i64>,
    /// Username
    #[serde(default)]
    pub username: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form biography
    #[serde(default)]
    pub bio: Option<String>,
    /// Absolute avatar URL
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Role string as sent by the server
    #[serde(default)]
    pub role: Option<String>,
    /// Staff flag (admin list)
    #[serde(default)]
    pub is_staff: bool,
    /// Join time
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Parsed role; unknown strings yield `None`.
    #[must_use]
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

impl Authored for UserRecord {
    fn author_ref(&self) -> Option<AuthorRef> {
        None
    }

    fn user_record_id(&self) -> Option<i64> {
        match (self.id, &self.username) {
            (Some(id), Some(_)) => Some(id),
            _ => None,
        }
    }
}

/// `POST /login/` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Auth token
    pub token: String,
    /// Username
    #[serde(default)]
    pub username: Option<String>,
    /// Numeric user id
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_accepts_paged_and_bare() {
        let paged: Listing<CategoryRecord> =
            serde_json::from_str(r#"{"count":12,"results":[{"id":1,"name":"Rust","slug":"rust"}]}"#)
                .unwrap();
        let (items, count) = paged.into_parts();
        assert_eq!(count, 12);
        assert_eq!(items[0].name, "Rust");

        let bare: Listing<CategoryRecord> =
            serde_json::from_str(r#"[{"id":1,"name":"A"},{"id":2,"name":"B"}]"#).unwrap();
        assert_eq!(bare.into_parts().1, 2);
    }

    #[test]
    fn test_post_tolerates_partial_records() {
        let post: PostRecord = serde_json::from_str(
            r#"{"slug":"hello","author":"ada","likes":[1,2,3],"created_at":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(post.like_count(), 3);
        assert_eq!(post.author_name().as_deref(), Some("ada"));
        assert!(post.created_at.is_some());
    }

    #[test]
    fn test_user_record_identity() {
        let user = UserRecord {
            id: Some(4),
            username: Some("ada".into()),
            role: Some("author".into()),
            ..UserRecord::default()
        };
        assert_eq!(user.user_record_id(), Some(4));
        assert_eq!(user.parsed_role(), Some(Role::Author));

        let nameless = UserRecord {
            id: Some(4),
            ..UserRecord::default()
        };
        assert_eq!(nameless.user_record_id(), None);
    }
}
