// src/utils/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::utils::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// On-disk run configuration, e.g.
/// `{ "input_path": "specs/Order.xlsx", "output_path": "out" }`.
/// Both keys are optional here so command-line flags can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// Fully resolved paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl FileConfig {
    /// Reads a config file. A missing file at the default location is not an
    /// error (`required == false`); an explicitly requested one is.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            tracing::debug!("No config file at {}, using command-line values only", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: FileConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Merges command-line overrides on top of the file values.
    pub fn resolve(
        self,
        input_override: Option<PathBuf>,
        output_override: Option<PathBuf>,
    ) -> Result<RunConfig, ConfigError> {
        let input_path = input_override
            .or(self.input_path)
            .ok_or(ConfigError::Missing("input path"))?;
        let output_path = output_override
            .or(self.output_path)
            .ok_or(ConfigError::Missing("output path"))?;

        Ok(RunConfig { input_path, output_path })
    }
}
