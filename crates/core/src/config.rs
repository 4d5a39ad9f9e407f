//! Dashboard configuration
//!
//! Stored as pretty-printed JSON. Every field has a default, so a partial
//! file (or none at all) is a valid configuration.

use crate::core_types::LngLat;
use crate::map::MapViewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors from loading or saving a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("failed to load config: {0}")]
    LoadFailed(String),
    /// File contents are not a valid configuration
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    /// Failed to serialize the configuration
    #[error("failed to serialize config: {0}")]
    SerializeFailed(String),
    /// Failed to write the file
    #[error("failed to save config: {0}")]
    SaveFailed(String),
}

/// Runtime settings for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Centre of the overview map
    pub map_center: LngLat,
    /// Zoom of the overview map
    pub map_zoom: f64,
    /// Zoom the location picker opens at
    pub picker_zoom: f64,
    /// JSON file holding the sample table
    pub store_path: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            map_center: MapViewport::DEFAULT_CENTER,
            map_zoom: MapViewport::DEFAULT_ZOOM,
            picker_zoom: MapViewport::PICKER_ZOOM,
            store_path: PathBuf::from("soil_samples.json"),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        info!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match fs::metadata(path.as_ref()) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            _ => Self::load(path),
        }
    }

    /// Save configuration to a JSON file
    ///
    /// # Errors
    /// Returns error if the configuration cannot be serialized or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeFailed(e.to_string()))?;
        fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        Ok(())
    }

    /// Overview map viewport
    pub fn viewport(&self) -> MapViewport {
        MapViewport::new(self.map_center, self.map_zoom)
    }
}
