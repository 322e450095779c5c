//! # Location Parsing
//!
//! Turns a hash location (`#posts/by_tag/rust?offset=10`) into a [`Route`].
//! Parsing is total: every string produces either the skip-link target or a
//! route, and the router decides what an unknown route means.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location used when the current hash is empty.
pub const HOME_HASH: &str = "#/";

/// Accessibility skip-link fragment; never dispatched as a view.
pub const SKIP_LINK_HASH: &str = "#main-content";

/// Route name used for `#/` and the empty hash.
pub const HOME_ROUTE: &str = "home";

/// Default page size when `limit` is missing, zero, or unparsable.
pub const DEFAULT_LIMIT: u64 = 10;

/// Parsed location: route name, positional path parameters, and query mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// First path segment, or [`HOME_ROUTE`]
    pub name: String,
    /// Remaining path segments, in order
    pub params: Vec<String>,
    /// Decoded query parameters
    pub query: BTreeMap<String, String>,
}

/// Result of parsing a hash location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// `#main-content`: focus the content region, dispatch nothing
    SkipLink,
    /// Any other location
    Route(Route),
}

impl Location {
    /// Parse a raw hash. Empty input is treated as [`HOME_HASH`].
    pub fn parse(raw: &str) -> Self {
        let hash = normalize_hash(raw);
        if hash == SKIP_LINK_HASH {
            return Self::SkipLink;
        }
        Self::Route(Route::parse(hash))
    }
}

/// The empty hash is normalized to [`HOME_HASH`] so callers can compare hashes.
#[must_use]
pub fn normalize_hash(raw: &str) -> &str {
    if raw.is_empty() {
        HOME_HASH
    } else {
        raw
    }
}

/// The hash without its query string (`#posts/x?offset=10` → `#posts/x`).
#[must_use]
pub fn base_hash(hash: &str) -> &str {
    hash.split_once('?').map_or(hash, |(path, _)| path)
}

impl Route {
    /// Parse a hash that is not the skip link.
    pub fn parse(hash: &str) -> Self {
        let body = hash.strip_prefix('#').unwrap_or(hash);
        let (path, query) = match body.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (body, None),
        };

        let mut segments = path.split('/');
        let name = match segments.next() {
            Some(first) if !first.is_empty() => first.to_string(),
            _ => HOME_ROUTE.to_string(),
        };
        let params = segments.map(str::to_string).collect::<Vec<_>>();

        Self {
            name,
            params,
            query: query.map(parse_query).unwrap_or_default(),
        }
    }

    /// Positional parameter, treating empty segments as absent.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params
            .get(index)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Query value by key.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// `offset`/`limit` with their defaults applied.
    #[must_use]
    pub fn list_params(&self) -> ListParams {
        let offset = self
            .query_value("offset")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let limit = self
            .query_value("limit")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIMIT);
        ListParams { offset, limit }
    }
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some((key.to_string(), value))
        })
        .collect()
}

/// Limit/offset window for list routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    /// Items to skip
    pub offset: u64,
    /// Page size, never zero
    pub limit: u64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    /// `limit=<n>&offset=<n>` query fragment.
    #[must_use]
    pub fn query(&self) -> String {
        format!("limit={}&offset={}", self.limit, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(hash: &str) -> Route {
        match Location::parse(hash) {
            Location::Route(route) => route,
            Location::SkipLink => panic!("unexpected skip link for {hash}"),
        }
    }

    #[test]
    fn test_empty_and_root_are_home() {
        assert_eq!(route("").name, HOME_ROUTE);
        assert_eq!(route("#/").name, HOME_ROUTE);
        assert_eq!(route("#").name, HOME_ROUTE);
    }

    #[test]
    fn test_skip_link_is_special() {
        assert_eq!(Location::parse("#main-content"), Location::SkipLink);
        assert!(matches!(
            Location::parse("#main-content?x=1"),
            Location::Route(_)
        ));
    }

    #[test]
    fn test_segments_and_query() {
        let r = route("#posts/by_tag/rust?offset=20&limit=5&q=a%20b");
        assert_eq!(r.name, "posts");
        assert_eq!(r.params, vec!["by_tag", "rust"]);
        assert_eq!(r.query_value("q"), Some("a b"));
        assert_eq!(r.list_params(), ListParams { offset: 20, limit: 5 });
    }

    #[test]
    fn test_list_param_defaults() {
        assert_eq!(route("#my-posts").list_params(), ListParams::default());
        let r = route("#my-posts?limit=0&offset=abc");
        assert_eq!(r.list_params(), ListParams { offset: 0, limit: 10 });
        let r = route("#my-posts?offset=-5");
        assert_eq!(r.list_params().offset, 0);
    }

    #[test]
    fn test_query_without_value_and_empty_key() {
        let r = route("#/?flag&=x&a=1");
        assert_eq!(r.query_value("flag"), Some(""));
        assert_eq!(r.query.len(), 2);
    }

    #[test]
    fn test_base_hash_strips_query() {
        assert_eq!(base_hash("#posts/x?offset=10"), "#posts/x");
        assert_eq!(base_hash("#login"), "#login");
    }
}
