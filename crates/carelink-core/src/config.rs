use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{API_BASE_ENV, DEFAULT_API_BASE, POLL_INTERVAL_SECS, STATUS_TTL_MS};

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub api_base: String,
    pub poll_interval: Duration,
    pub status_ttl: Duration,
}

/// On-disk form of the config. Every field is optional; missing ones keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_ttl_ms: Option<u64>,
}

impl CoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            status_ttl: Duration::from_millis(STATUS_TTL_MS),
        }
    }

    /// Defaults, then the optional JSON file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let file: ConfigFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.apply_file(file);
        }
        config.apply_env_override(std::env::var(API_BASE_ENV).ok());
        Ok(config)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(base) = file.api_base {
            self.api_base = base;
        }
        if let Some(secs) = file.poll_interval_secs.filter(|s| *s > 0) {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = file.status_ttl_ms {
            self.status_ttl = Duration::from_millis(ms);
        }
    }

    fn apply_env_override(&mut self, api_base: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.api_base = base;
        }
    }

    /// API base without a trailing slash, ready for path concatenation.
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join("carelink"))
            .unwrap_or_else(|| PathBuf::from("carelink_data"));
        Self::new(dir)
    }
}
