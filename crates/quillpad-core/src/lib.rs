//! Quillpad Core - Pure Domain Layer
//!
//! Everything the client decides without talking to the network lives here.
//!
//! # Modules
//!
//! ## Identity
//! - `session`: `Session` snapshot, `Role`, `AuthorRef` and the permission predicates
//!
//! ## Navigation
//! - `location`: hash parsing into `Route` and `ListParams`
//! - `view`: `View::resolve` and the guard each view requires
//!
//! ## Algorithms
//! - `comments`: flat comment batch → ordered reply forest
//! - `pagination`: page-number window and links from total/limit/offset
//!
//! ## Wire
//! - `records`: API record shapes and `Listing<T>`
//! - `errors`: `ApiError` message formatting, `CommentTreeError`

#![forbid(unsafe_code)]

// === Identity ===

/// Session snapshot, roles, and authorship matching
pub mod session;

// === Navigation ===

/// Hash location parsing
pub mod location;

/// Typed views and access requirements
pub mod view;

// === Algorithms ===

/// Comment tree construction
pub mod comments;

/// Pagination window computation
pub mod pagination;

// === Wire ===

/// API error formatting and builder errors
pub mod errors;

/// API record shapes
pub mod records;

pub use comments::{build_comment_tree, Comment, CommentAuthor, ANONYMOUS_AUTHOR};
pub use errors::{ApiError, CommentTreeError};
pub use location::{ListParams, Location, Route, HOME_HASH, SKIP_LINK_HASH};
pub use pagination::{PageItem, PageWindow};
pub use records::{
    CategoryRecord, CommentRecord, LikeResponse, Listing, LoginResponse, PostRecord,
    SaveResponse, SiteStats, TagRecord, UserRecord,
};
pub use session::{AuthorRef, Authored, Role, Session, UnknownRole};
pub use view::{Access, ListSource, View};
