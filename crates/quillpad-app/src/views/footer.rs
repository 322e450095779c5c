//! Site footer model.

use serde::{Deserialize, Serialize};

use quillpad_core::{PostRecord, SiteStats, TagRecord};

/// Footer contents. Each part degrades independently when its request fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterView {
    /// Most recent posts
    pub recent_posts: Vec<PostRecord>,
    /// Most used tags
    pub popular_tags: Vec<TagRecord>,
    /// Site counters, absent when unavailable
    pub stats: Option<SiteStats>,
}
