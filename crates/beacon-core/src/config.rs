use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BeaconError, BeaconResult};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub files: FilesConfig,
    pub wiki: WikiConfig,
    #[serde(default)]
    pub snippet_runners: Vec<SnippetRunnerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Driver poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Quiet period after the last keystroke before searching.
    pub debounce_ms: u64,
    /// Per-provider result cap in snapshots.
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Base directory searched when a query has no path prefix.
    pub root: String,
    pub max_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// MediaWiki api.php endpoint queried via opensearch.
    pub endpoint: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetRunnerConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            debounce_ms: 200,
            max_results: 8,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: "~".to_string(),
            max_depth: 4,
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            max_results: 8,
        }
    }
}

impl SearchConfig {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("beacon")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Path of the persisted provider enable/disable preferences.
    pub fn prefs_path() -> PathBuf {
        Self::config_dir().join("providers.toml")
    }

    /// Load config from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to parse config, using defaults");
                        Self::default()
                    }
                },
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read config, using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    /// Validate and clamp config values to acceptable ranges
    fn validate(&mut self) {
        self.search.poll_interval_ms = self.search.poll_interval_ms.clamp(10, 500);
        self.search.debounce_ms = self.search.debounce_ms.clamp(50, 2000);
        self.search.max_results = self.search.max_results.clamp(1, 50);
        self.files.max_depth = self.files.max_depth.clamp(1, 16);
        self.wiki.max_results = self.wiki.max_results.clamp(1, 50);
    }

    /// Save config to file
    pub fn save(&self) -> BeaconResult<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| BeaconError::Config(e.to_string()))?;
        fs::write(&path, content)?;

        Ok(())
    }
}
