//! Default search bounds, read from a JSON config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = ".gedgraph.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GedgraphConfig {
    /// Pedigree depth when `-g` is not given.
    pub generations: usize,
    /// Descendant chart depth when `-g` is not given.
    pub descendant_generations: usize,
    /// Relationship search bound when `-d` is not given.
    pub max_depth: usize,
}

impl Default for GedgraphConfig {
    fn default() -> Self {
        Self {
            generations: 4,
            descendant_generations: 3,
            max_depth: 50,
        }
    }
}

impl GedgraphConfig {
    /// Loads an explicit config file, or `.gedgraph.json` in `dir` if it
    /// exists, or the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = dir.join(CONFIG_FILE);
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
