//! # Comment Tree Builder
//!
//! Turns one batch of flat [`CommentRecord`]s into an ordered forest.
//!
//! ## Placement
//!
//! A record becomes a child of the record its `parent` names when that id is
//! present in the same batch; otherwise it is a root. Replies whose parent was
//! deleted or fell outside the batch are therefore demoted, never dropped.
//!
//! Duplicate ids keep the first record as the parent target (later duplicates
//! are still placed). Parent chains that loop back on themselves, including a
//! record naming itself as parent, are broken by demoting the cycle member that
//! appears first in the input.
//!
//! ## Ordering
//!
//! Roots and every children list are sorted newest first by `created_at`.
//! The sort is stable and records without a timestamp sort after timestamped
//! siblings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::errors::CommentTreeError;
use crate::records::CommentRecord;
use crate::session::{AuthorRef, Authored};

/// Username shown for comments without author data.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Author display data after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    /// Numeric id, when the wire record carried one
    pub id: Option<i64>,
    /// Display name; [`ANONYMOUS_AUTHOR`] when unknown
    pub username: String,
    /// Avatar URL, if any
    pub avatar_url: Option<String>,
}

impl CommentAuthor {
    fn normalize(author: Option<&AuthorRef>, avatar_url: Option<String>) -> Self {
        match author {
            Some(AuthorRef::ByName(name)) => Self {
                id: None,
                username: name.clone(),
                avatar_url,
            },
            Some(AuthorRef::ById(id)) => Self {
                id: Some(*id),
                username: id.to_string(),
                avatar_url,
            },
            Some(AuthorRef::Embedded { id, username }) => Self {
                id: id.flatten(),
                username: username
                    .clone()
                    .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
                avatar_url,
            },
            None => Self {
                id: None,
                username: ANONYMOUS_AUTHOR.to_string(),
                avatar_url: None,
            },
        }
    }
}

/// One node of the comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: i64,
    /// Parent id as sent by the server (may not resolve within the batch)
    pub parent_id: Option<i64>,
    /// Post id
    pub post_id: Option<i64>,
    /// Normalized author for display
    pub author: CommentAuthor,
    /// Raw author reference, kept for permission checks
    pub author_ref: Option<AuthorRef>,
    /// Markdown body
    pub content: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Replies, newest first
    pub children: Vec<Comment>,
}

impl Comment {
    /// Number of comments in this subtree, including this one.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Depth-first search for a comment by id.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Comment> {
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

// Iterative: reply chains can be deeper than the call stack.
impl Drop for Comment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Authored for Comment {
    fn author_ref(&self) -> Option<AuthorRef> {
        self.author_ref.clone()
    }
}

/// Newest first; missing timestamps last.
fn newest_first(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the ordered forest for one batch.
///
/// # Errors
///
/// [`CommentTreeError::MissingId`] if any record lacks an `id`.
pub fn build_comment_tree(records: Vec<CommentRecord>) -> Result<Vec<Comment>, CommentTreeError> {
    let mut ids = Vec::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        ids.push(record.id.ok_or(CommentTreeError::MissingId { position })?);
    }

    let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (position, id) in ids.iter().enumerate() {
        index.entry(*id).or_insert(position);
    }

    let mut parent_of: Vec<Option<usize>> = records
        .iter()
        .map(|record| record.parent.and_then(|pid| index.get(&pid).copied()))
        .collect();
    break_cycles(&mut parent_of);

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    for (position, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(position),
            None => roots.push(position),
        }
    }

    let timestamps: Vec<Option<DateTime<Utc>>> =
        records.iter().map(|record| record.created_at).collect();
    let by_time = |a: &usize, b: &usize| newest_first(timestamps[*a].as_ref(), timestamps[*b].as_ref());
    roots.sort_by(by_time);
    for list in &mut children {
        list.sort_by(by_time);
    }

    let slots: Vec<Option<Comment>> = records
        .into_iter()
        .zip(ids)
        .map(|(record, id)| Some(leaf(id, record)))
        .collect();

    Ok(assemble(&roots, &children, slots))
}

fn leaf(id: i64, record: CommentRecord) -> Comment {
    let author = CommentAuthor::normalize(record.author.as_ref(), record.author_avatar);
    Comment {
        id,
        parent_id: record.parent,
        post_id: record.post,
        author,
        author_ref: record.author,
        content: record.content,
        created_at: record.created_at,
        children: Vec::new(),
    }
}

/// Attach every node to its parent bottom-up, without recursion.
///
/// A pre-order walk from the roots reaches each node exactly once (cycles are
/// already broken); in reverse, every child is complete before its parent
/// takes it.
fn assemble(
    roots: &[usize],
    children: &[Vec<usize>],
    mut slots: Vec<Option<Comment>>,
) -> Vec<Comment> {
    let mut order = Vec::with_capacity(slots.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(position) = stack.pop() {
        order.push(position);
        stack.extend(children[position].iter().rev().copied());
    }

    for &position in order.iter().rev() {
        let attached: Vec<Comment> = children[position]
            .iter()
            .filter_map(|child| slots[*child].take())
            .collect();
        if let Some(node) = slots[position].as_mut() {
            node.children = attached;
        }
    }

    roots.iter().filter_map(|root| slots[*root].take()).collect()
}

/// Demote the earliest member of every parent cycle to a root.
fn break_cycles(parent_of: &mut [Option<usize>]) {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; parent_of.len()];
    let mut path = Vec::new();
    for start in 0..parent_of.len() {
        if state[start] != UNSEEN {
            continue;
        }
        path.clear();
        let mut cursor = Some(start);
        while let Some(node) = cursor {
            match state[node] {
                UNSEEN => {
                    state[node] = ON_PATH;
                    path.push(node);
                    cursor = parent_of[node];
                }
                ON_PATH => {
                    if let Some(at) = path.iter().position(|n| *n == node) {
                        if let Some(first) = path[at..].iter().min().copied() {
                            parent_of[first] = None;
                        }
                    }
                    break;
                }
                _ => break,
            }
        }
        for node in &path {
            state[*node] = DONE;
        }
    }
}

/// Total number of comments in a forest.
#[must_use]
pub fn forest_len(forest: &[Comment]) -> usize {
    forest.iter().map(Comment::subtree_len).sum()
}
