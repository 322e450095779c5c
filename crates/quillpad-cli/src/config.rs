//! CLI configuration file.
//!
//! ```toml
//! session_file = "~/.quillpad/session.json"
//! log_filter = "quillpad_app=debug"
//!
//! [app]
//! api_base_url = "https://blog.example.com/api"
//! page_size = 20
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use quillpad_app::{AppConfig, ConfigError};

/// Default session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".quillpad/session.json";

/// Contents of the CLI config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Engine settings
    pub app: AppConfig,
    /// Where the session is persisted; a leading `~/` is the home directory
    pub session_file: PathBuf,
    /// Tracing filter used when neither `RUST_LOG` nor `-v` is given
    pub log_filter: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            log_filter: None,
        }
    }
}

impl CliConfig {
    /// Load `path`, or defaults when it does not exist. Environment overrides
    /// are applied and the result validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };
        config.app.merge_with_env()?;
        config.app.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Session file with `~/` expanded.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        match (self.session_file.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => self.session_file.clone(),
        }
    }
}
