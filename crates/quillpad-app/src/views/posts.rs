//! Post cards, post detail, and the comments section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quillpad_core::{Comment, PageWindow, PostRecord, Session};

use super::markdown::{excerpt, render_markdown_to_html};

/// Title shown for posts without one.
pub const UNTITLED_POST: &str = "Untitled Post";
/// Author shown for posts without one.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Card text for posts without content.
pub const NO_PREVIEW: &str = "No content preview available.";

/// One post card in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post slug
    pub slug: String,
    /// Post id
    pub id: Option<i64>,
    /// Title, defaulted
    pub title: String,
    /// Author name, defaulted
    pub author: String,
    /// Category name
    pub category: Option<String>,
    /// Tag names
    pub tags: Vec<String>,
    /// Plain-text excerpt
    pub excerpt: String,
    /// Featured image
    pub featured_image_url: Option<String>,
    /// Comment count
    pub comment_count: Option<u64>,
    /// View count
    pub view_count: Option<u64>,
    /// Like count
    pub like_count: u64,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Like/save buttons are shown (signed in)
    pub show_actions: bool,
    /// Edit/delete buttons are shown
    pub can_modify: bool,
    /// Liked by the current user, as far as the client knows
    pub liked: bool,
    /// Saved by the current user, as far as the client knows
    pub saved: bool,
}

impl PostSummary {
    /// Card for `post` as seen by `session`.
    #[must_use]
    pub fn from_record(post: &PostRecord, session: &Session, excerpt_chars: usize) -> Self {
        let excerpt = post
            .content
            .as_deref()
            .map(|content| excerpt(content, excerpt_chars))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_PREVIEW.to_string());
        Self {
            slug: post.slug.clone(),
            id: post.id,
            title: post
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_POST.to_string()),
            author: post
                .author_name()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            category: post.category.clone(),
            tags: post.tags.clone(),
            excerpt,
            featured_image_url: post.featured_image_url.clone(),
            comment_count: post.comment_count,
            view_count: post.view_count,
            like_count: post.like_count(),
            created_at: post.created_at,
            show_actions: session.is_authenticated(),
            can_modify: session.can_edit_or_delete(post),
            liked: liked_by(post, session),
            saved: false,
        }
    }
}

/// Whether the post's like list names the signed-in user, by id or username.
fn liked_by(post: &PostRecord, session: &Session) -> bool {
    post.likes.iter().any(|like| match like {
        Value::Number(id) => id.as_i64().is_some() && id.as_i64() == session.user_id,
        Value::String(name) => session.username.as_deref() == Some(name.as_str()),
        _ => false,
    })
}

/// A post list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListView {
    /// Heading
    pub title: String,
    /// Cards, in server order
    pub posts: Vec<PostSummary>,
    /// Pagination widget, absent for single-page lists
    pub pagination: Option<PageWindow>,
}

/// A post with its rendered body and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetailView {
    /// Metadata and action state
    pub summary: PostSummary,
    /// Sanitized HTML body
    pub content_html: String,
    /// Comments section
    pub comments: CommentsView,
}

impl PostDetailView {
    /// Detail view with comments still loading.
    #[must_use]
    pub fn from_record(post: &PostRecord, session: &Session, excerpt_chars: usize) -> Self {
        Self {
            summary: PostSummary::from_record(post, session, excerpt_chars),
            content_html: render_markdown_to_html(post.content.as_deref().unwrap_or_default()),
            comments: CommentsView::Loading,
        }
    }
}

/// State of the comments section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentsView {
    /// Request in flight
    Loading,
    /// Comments loaded
    Loaded {
        /// Post the comments belong to
        post_id: i64,
        /// Root comments, newest first
        comments: Vec<CommentView>,
        /// Count reported by the API
        count: u64,
        /// Whether the main comment form is shown
        can_comment: bool,
    },
    /// Inline error message
    Failed(String),
}

/// One rendered comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    /// Comment id
    pub id: i64,
    /// Author display name
    pub author: String,
    /// Avatar URL, if any
    pub avatar_url: Option<String>,
    /// Sanitized HTML body
    pub content_html: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Reply button shown
    pub can_reply: bool,
    /// Delete button shown
    pub can_delete: bool,
    /// Replies, newest first
    pub children: Vec<CommentView>,
}

impl CommentView {
    /// Render a built comment tree for `session`.
    ///
    /// Walks the tree with an explicit stack and builds views bottom-up, so
    /// reply depth is bounded by memory rather than the call stack.
    #[must_use]
    pub fn from_tree(comment: &Comment, session: &Session) -> Self {
        // Pre-order with each node's parent index; siblings keep their order.
        let mut order: Vec<(&Comment, usize)> = Vec::new();
        let mut stack: Vec<(&Comment, usize)> =
            comment.children.iter().rev().map(|child| (child, 0)).collect();
        while let Some((node, parent)) = stack.pop() {
            let index = order.len() + 1;
            order.push((node, parent));
            stack.extend(node.children.iter().rev().map(|child| (child, index)));
        }

        // Index 0 is `comment` itself; replies collect in reverse sibling order.
        let mut replies: Vec<Vec<CommentView>> = (0..=order.len()).map(|_| Vec::new()).collect();
        for (offset, (node, parent)) in order.iter().enumerate().rev() {
            let children = std::mem::take(&mut replies[offset + 1]);
            replies[*parent].push(Self::node(node, session, children));
        }
        let children = std::mem::take(&mut replies[0]);
        Self::node(comment, session, children)
    }

    fn node(comment: &Comment, session: &Session, mut children: Vec<CommentView>) -> Self {
        children.reverse();
        Self {
            id: comment.id,
            author: comment.author.username.clone(),
            avatar_url: comment.author.avatar_url.clone(),
            content_html: render_markdown_to_html(&comment.content),
            created_at: comment.created_at,
            can_reply: session.is_authenticated(),
            can_delete: session.can_edit_or_delete(comment),
            children,
        }
    }

    /// Depth-first lookup by id.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&CommentView> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

impl Drop for CommentView {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::{build_comment_tree, AuthorRef, CommentRecord, Role};

    fn reader() -> Session {
        Session {
            token: Some("t".into()),
            username: Some("ada".into()),
            user_id: Some(1),
            role: Some(Role::Reader),
        }
    }

    #[test]
    fn test_summary_defaults() {
        let post = PostRecord {
            slug: "s".into(),
            ..PostRecord::default()
        };
        let card = PostSummary::from_record(&post, &Session::default(), 200);
        assert_eq!(card.title, UNTITLED_POST);
        assert_eq!(card.author, UNKNOWN_AUTHOR);
        assert_eq!(card.excerpt, NO_PREVIEW);
        assert!(!card.show_actions);
        assert!(!card.can_modify);
    }

    #[test]
    fn test_summary_permissions_follow_session() {
        let post = PostRecord {
            slug: "s".into(),
            author: Some(AuthorRef::ByName("ada".into())),
            content: Some("Hello **there**".into()),
            ..PostRecord::default()
        };
        let card = PostSummary::from_record(&post, &reader(), 200);
        assert!(card.show_actions);
        assert!(card.can_modify);
        assert_eq!(card.excerpt, "Hello there");
        assert!(!card.liked);
    }

    #[test]
    fn test_liked_matches_id_or_username() {
        let mut post = PostRecord {
            slug: "s".into(),
            likes: vec![serde_json::json!(9), serde_json::json!(1)],
            ..PostRecord::default()
        };
        assert!(PostSummary::from_record(&post, &reader(), 200).liked);
        post.likes = vec![serde_json::json!("ada")];
        assert!(PostSummary::from_record(&post, &reader(), 200).liked);
        assert!(!PostSummary::from_record(&post, &Session::default(), 200).liked);
    }

    #[test]
    fn test_comment_views_keep_order_and_permissions() {
        let comment = |id: i64, parent: Option<i64>, author: &str| CommentRecord {
            id: Some(id),
            parent,
            author: Some(AuthorRef::ByName(author.into())),
            content: format!("c{id}"),
            ..CommentRecord::default()
        };
        let tree = build_comment_tree(vec![
            comment(1, None, "bob"),
            comment(2, Some(1), "ada"),
            comment(3, Some(1), "bob"),
            comment(4, Some(2), "bob"),
        ])
        .unwrap();
        let view = CommentView::from_tree(&tree[0], &reader());
        let child_ids: Vec<i64> = view.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 3]);
        assert_eq!(view.children[0].children[0].id, 4);
        assert!(!view.can_delete);
        assert!(view.find(2).unwrap().can_delete);
        assert!(view.find(4).unwrap().can_reply);
        assert!(view.find(9).is_none());
    }

    #[test]
    fn test_deep_reply_chain_converts() {
        const DEPTH: i64 = 12_000;
        let batch = (0..DEPTH)
            .map(|id| CommentRecord {
                id: Some(id),
                parent: (id > 0).then(|| id - 1),
                ..CommentRecord::default()
            })
            .collect();
        let tree = build_comment_tree(batch).unwrap();
        let view = CommentView::from_tree(&tree[0], &reader());
        let deepest = view.find(DEPTH - 1).unwrap();
        assert!(deepest.children.is_empty());
        assert_eq!(deepest.author, quillpad_core::ANONYMOUS_AUTHOR);
    }
}
