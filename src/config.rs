//! Runtime settings for the runner and anything embedding the crate.
//!
//! Every field has a default, so an empty file (or no file) is a valid config.
//!
//! ```toml
//! catalog = "levels/catalog.toml"
//!
//! [playback]
//! step_interval_ms = 400
//!
//! [progression]
//! auto_advance = true
//! ```

use crate::error::ConfigError;
use crate::playback::PlaybackConfig;
use crate::progression::ProgressionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level catalog to load instead of the bundled one.
    pub catalog: Option<PathBuf>,

    pub playback: PlaybackConfig,

    pub progression: ProgressionConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        // Relative catalog paths are relative to the config file.
        if let Some(catalog) = config.catalog.as_mut()
            && catalog.is_relative()
            && let Some(dir) = path.parent()
        {
            *catalog = dir.join(&*catalog);
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}
