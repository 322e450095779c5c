//! # Application Configuration
//!
//! Settings the engine needs to talk to the API and size its requests.
//! Loaded from TOML, overridden by `QUILLPAD_*` environment variables, then
//! validated before the engine is built.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Default API root.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Default page size for list views.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Default `limit` for lookup requests (categories, tags, saved status).
pub const DEFAULT_LOOKUP_LIMIT: u64 = 1000;
/// Default number of recent posts in the footer.
pub const DEFAULT_RECENT_POSTS: u64 = 5;
/// Default excerpt length on post cards, in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 200;
/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Environment variable overriding [`AppConfig::api_base_url`].
pub const ENV_API_BASE_URL: &str = "QUILLPAD_API_BASE_URL";
/// Environment variable overriding [`AppConfig::page_size`].
pub const ENV_PAGE_SIZE: &str = "QUILLPAD_PAGE_SIZE";
/// Environment variable overriding [`AppConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "QUILLPAD_REQUEST_TIMEOUT_SECS";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API root; request paths are appended verbatim
    pub api_base_url: String,
    /// Page size used when a list location carries no `limit`
    pub page_size: u64,
    /// `limit` for category/tag/saved-status lookups
    pub lookup_limit: u64,
    /// Number of posts in the footer's recent list
    pub recent_posts: u64,
    /// Excerpt length on post cards
    pub excerpt_chars: usize,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            lookup_limit: DEFAULT_LOOKUP_LIMIT,
            recent_posts: DEFAULT_RECENT_POSTS,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `QUILLPAD_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn merge_with_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = parse_var(ENV_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_var(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }
        Ok(())
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: "must not be empty".into(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: format!("must be an http(s) URL, got {url}"),
            });
        }
        for (field, value) in [
            ("page_size", self.page_size),
            ("lookup_limit", self.lookup_limit),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn api_root(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

fn parse_var(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        field: name,
        reason: format!("not an unsigned integer: {raw}"),
    })
}
