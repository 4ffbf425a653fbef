use super::types::{Config, LogLevel};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const SEARCH_PATHS: [&str; 3] = [
    "./muse.toml",
    "~/.muse/config.toml",
    "~/.config/muse/config.toml",
];

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Loads the first config file found on the search path, or defaults.
    pub fn load_default() -> Result<Self> {
        for path in &SEARCH_PATHS {
            let expanded = shellexpand::tilde(path);
            let path = Path::new(expanded.as_ref());
            if path.exists() {
                debug!(path = %path.display(), "Loading config file");
                return Self::load_from_file(path);
            }
        }

        Ok(Config::default())
    }

    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    pub fn merge_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("MUSE_LOG_LEVEL") {
            match level.parse::<LogLevel>() {
                Ok(level) => self.general.log_level = level,
                Err(e) => warn!(error = %e, "Ignoring MUSE_LOG_LEVEL"),
            }
        }

        if let Some(model) = lookup("MUSE_MODEL") {
            self.llm.model = Some(model);
        }

        if let Some(url) = lookup("MUSE_BASE_URL") {
            self.llm.base_url = Some(url);
        }

        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }

        self
    }

    /// The credential every agent needs before the first turn.
    pub fn api_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::missing_config(format!(
                    "{} environment variable is not set. Set it in your environment or pass --api-key",
                    API_KEY_ENV
                ))
            })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}
