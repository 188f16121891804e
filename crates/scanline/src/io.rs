//! JSON configuration helpers.

use std::{fs, path::Path};

use scanline_core::FramingBounds;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureSettings;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Scanner configuration: viewfinder bounds and camera settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub framing: FramingBounds,
    pub capture: CaptureSettings,
}

impl ScanConfig {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
