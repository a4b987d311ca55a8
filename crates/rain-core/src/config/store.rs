//! Config store for loading and saving rain.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{RainConfig, parser};

pub const CONFIG_FILE: &str = "rain.toml";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    config_dir: PathBuf,
}

impl ConfigStore {
    /// `<config_dir>/rain-mcp/rain.toml`
    pub fn from_default() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("rain-mcp");
        Ok(Self::from_dir(config_dir))
    }

    pub fn from_dir(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join(CONFIG_FILE),
            config_dir,
        }
    }

    /// Explicit file; relative data paths resolve beside it.
    pub fn from_path(config_path: PathBuf) -> Self {
        let config_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            config_path,
            config_dir,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn load(&self) -> anyhow::Result<RainConfig> {
        if !self.config_path.exists() {
            return Ok(RainConfig::new());
        }
        parser::parse_rain_toml(&self.config_path)
    }

    pub fn save(&self, config: &RainConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config).context("Failed to serialize config to TOML")?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }

    pub fn servers_file(&self, config: &RainConfig) -> PathBuf {
        self.resolve(config.paths.servers_file(&self.config_dir))
    }

    pub fn schema_store(&self, config: &RainConfig) -> PathBuf {
        self.resolve(config.paths.schema_store(&self.config_dir))
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_relative() {
            self.config_dir.join(path)
        } else {
            path
        }
    }
}
