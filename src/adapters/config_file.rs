//! JSON file config adapter.
//!
//! Implements [`ConfigPort`] over a JSON document on disk.  Missing fields
//! take their defaults; the result is validated before it is returned.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ControllerConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate a JSON document.
    pub fn parse(text: &str) -> Result<ControllerConfig, ConfigError> {
        let cfg: ControllerConfig =
            serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let cfg = Self::parse(&text)?;
        info!("JsonConfigFile: loaded {}", self.path.display());
        Ok(cfg)
    }
}
