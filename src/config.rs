//! Render settings read from `config.json`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::interface::{PrunePolicy, DEFAULT_NOISE_ATTRIBUTES};
use crate::renderer::FormattingOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_noise_attributes() -> Vec<String> {
    DEFAULT_NOISE_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub formatting: FormattingOptions,
    /// Attribute simple names stripped from the interface view.
    pub noise_attributes: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            formatting: FormattingOptions::default(),
            noise_attributes: default_noise_attributes(),
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `{config_dir}/typeview/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("typeview").join("config.json"))
    }

    /// Load the user config if one exists, otherwise fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn prune_policy(&self, target_name: &str) -> PrunePolicy {
        PrunePolicy::new(target_name).with_noise_attributes(self.noise_attributes.iter().cloned())
    }
}
