//! # Pagination Calculator
//!
//! Computes the page-number window and links for a limit/offset list. Pure: the
//! caller supplies the total from the list response and the base location.

use serde::{Deserialize, Serialize};

/// Maximum number of page numbers in the window.
pub const WINDOW_SIZE: u64 = 5;

/// One control in the pagination widget, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageItem {
    /// Previous-page control; `href` is `None` on the first page
    Prev {
        /// Target location when enabled
        href: Option<String>,
    },
    /// A numbered page link
    Page {
        /// One-based page number
        number: u64,
        /// Target location
        href: String,
        /// Whether this is the current page
        active: bool,
    },
    /// Ellipsis between the boundary page and the window
    Gap,
    /// Next-page control; `href` is `None` on the last page
    Next {
        /// Target location when enabled
        href: Option<String>,
    },
}

/// Derived pagination state plus the rendered controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// One-based current page
    pub current_page: u64,
    /// Total number of pages
    pub total_pages: u64,
    /// First page number in the window
    pub window_start: u64,
    /// Last page number in the window
    pub window_end: u64,
    /// Controls in display order
    pub items: Vec<PageItem>,
}

impl PageWindow {
    /// Page numbers inside the window.
    #[must_use]
    pub fn window(&self) -> Vec<u64> {
        (self.window_start..=self.window_end).collect()
    }

    /// Every numbered link, including boundary pages outside the window.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<u64> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    /// Whether the previous control links anywhere.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Whether the next control links anywhere.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// `base_url` with an `offset` parameter appended.
#[must_use]
pub fn page_href(base_url: &str, offset: u64) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}offset={offset}")
}

/// Compute the widget, or `None` when everything fits on one page.
///
/// An offset past the last page (it comes straight from the location) is
/// clamped to the last page's offset.
#[must_use]
pub fn compute(total_items: u64, limit: u64, offset: u64, base_url: &str) -> Option<PageWindow> {
    if limit == 0 || total_items <= limit {
        return None;
    }

    let total_pages = total_items.div_ceil(limit);
    let offset = offset.min((total_pages - 1) * limit);
    let current_page = offset / limit + 1;

    let half = WINDOW_SIZE / 2;
    let naive_start = current_page.saturating_sub(half).max(1);
    let window_end = (naive_start + WINDOW_SIZE - 1).min(total_pages);
    let window_start = window_end.saturating_sub(WINDOW_SIZE - 1).max(1);

    let href = |page: u64| page_href(base_url, (page - 1) * limit);
    let link = |page: u64| PageItem::Page {
        number: page,
        href: href(page),
        active: page == current_page,
    };

    let mut items = Vec::with_capacity(WINDOW_SIZE as usize + 6);
    items.push(PageItem::Prev {
        href: (current_page > 1).then(|| page_href(base_url, offset.saturating_sub(limit))),
    });
    if window_start > 1 {
        items.push(link(1));
        if window_start > 2 {
            items.push(PageItem::Gap);
        }
    }
    items.extend((window_start..=window_end).map(link));
    if window_end < total_pages {
        if window_end < total_pages - 1 {
            items.push(PageItem::Gap);
        }
        items.push(link(total_pages));
    }
    items.push(PageItem::Next {
        href: (current_page < total_pages).then(|| page_href(base_url, offset + limit)),
    });

    Some(PageWindow {
        current_page,
        total_pages,
        window_start,
        window_end,
        items,
    })
}
