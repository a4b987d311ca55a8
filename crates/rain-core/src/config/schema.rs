//! Configuration schema for rain.toml
//!
//! Every section is optional:
//! - `[search]`: catalog paging, match threshold, input debounce
//! - `[paths]`: where user servers and the cached registry catalog live

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, DEFAULT_THRESHOLD, SearchOptions};

/// Root configuration structure for rain.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RainConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results shown per page
    pub page_size: usize,

    /// Field score cutoff (0.0 exact, 1.0 anything)
    pub threshold: f64,

    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            threshold: DEFAULT_THRESHOLD,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            page_size: self.page_size,
            threshold: self.threshold,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// File locations; unset paths fall back to the config directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_store: Option<PathBuf>,
}

impl PathsConfig {
    pub fn servers_file(&self, config_dir: &Path) -> PathBuf {
        self.servers_file
            .clone()
            .unwrap_or_else(|| config_dir.join("servers.json"))
    }

    pub fn schema_store(&self, config_dir: &Path) -> PathBuf {
        self.schema_store
            .clone()
            .unwrap_or_else(|| config_dir.join("schema_store.json"))
    }
}

impl RainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.page_size == 0 {
            bail!("search.page_size must be greater than 0");
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            bail!(
                "search.threshold must be between 0.0 and 1.0, got {}",
                self.search.threshold
            );
        }
        for (key, path) in [
            ("paths.servers_file", &self.paths.servers_file),
            ("paths.schema_store", &self.paths.schema_store),
        ] {
            if let Some(path) = path
                && path.as_os_str().is_empty()
            {
                bail!("{} cannot be empty", key);
            }
        }
        Ok(())
    }
}
