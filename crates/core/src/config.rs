//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{catalog::PAGE_SIZE, models::DEFAULT_STORE_URL, progress::DEFAULT_STEP_DELAY};

const CONFIG_DIR: &str = "gamepick";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# gamepick configuration.
#
# Path to a JSON catalog file (an array of game objects). When unset the
# built-in sample catalog is used.
# catalog_path = "/path/to/catalog.json"

# Cards per catalog page.
page_size = 5

# Delay between recommendation stages, in milliseconds.
step_delay_ms = 900

# Store page opened for games without a link of their own.
# store_url = "https://store.steampowered.com/"
"#;

/// Settings merged from the config file and `GAMEPICK_*` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// JSON catalog file; the built-in sample is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Cards per catalog page.
    pub page_size: usize,
    /// Delay between recommendation stages, in milliseconds.
    pub step_delay_ms: u64,
    /// Override for [`DEFAULT_STORE_URL`].
    #[serde(default)]
    pub store_url: Option<String>,
}

impl AppConfig {
    /// Load configuration, layering defaults, then the config file, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("page_size", PAGE_SIZE as u64)
            .context("failed to set default page size")?
            .set_default("step_delay_ms", DEFAULT_STEP_DELAY.as_millis() as u64)
            .context("failed to set default step delay")?;

        if let Some(path) = config_file_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("GAMEPICK"));

        let mut loaded: AppConfig = builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        if loaded.page_size == 0 {
            tracing::warn!("page_size 0 is invalid; using {}", PAGE_SIZE);
            loaded.page_size = PAGE_SIZE;
        }
        Ok(loaded)
    }

    /// Delay between recommendation stages.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Store URL substituted for games without one of their own.
    pub fn effective_store_url(&self) -> &str {
        self.store_url.as_deref().unwrap_or(DEFAULT_STORE_URL)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            page_size: PAGE_SIZE,
            step_delay_ms: DEFAULT_STEP_DELAY.as_millis() as u64,
            store_url: None,
        }
    }
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let Some(path) = config_file_path() else {
        return Ok(());
    };
    if path.exists() {
        return Ok(());
    }
    write_default_config(&path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

/// Location of the config file, if a config directory exists on this
/// platform.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.step_delay(), Duration::from_millis(900));
        assert_eq!(config.effective_store_url(), DEFAULT_STORE_URL);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn default_config_file_is_written_once() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("gamepick").join("config.toml");
        write_default_config(&path)?;
        let written = fs::read_to_string(&path)?;
        assert!(written.contains("page_size = 5"));
        assert!(written.contains("step_delay_ms = 900"));

        // The default file must itself parse as valid TOML config.
        let parsed: AppConfig = Config::builder()
            .add_source(File::from(path.clone()))
            .build()?
            .try_deserialize()?;
        assert_eq!(parsed.page_size, 5);
        Ok(())
    }
}
