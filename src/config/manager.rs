//! Configuration loading
//!
//! The configuration ships with the tool as `easypatch.json` in the resource
//! root. A missing or unreadable file is not an error: the defaults apply.

use crate::config::models::PatchConfig;
use crate::error::Result;
use crate::resources;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the bundled configuration
pub const CONFIG_FILE_NAME: &str = "easypatch.json";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    ///
    /// Returns: `<resource root>\easypatch.json`
    pub fn get_config_path() -> Result<PathBuf> {
        resources::resolve_resource(CONFIG_FILE_NAME)
    }

    /// Load configuration from the resource root
    pub fn load() -> Result<PatchConfig> {
        Ok(Self::load_from(&Self::get_config_path()?))
    }

    /// Load configuration from `path`
    ///
    /// If the file doesn't exist or is corrupt, returns the default configuration.
    pub fn load_from(path: &Path) -> PatchConfig {
        if !path.exists() {
            info!("Configuration file not found, using defaults");
            return PatchConfig::default();
        }

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read {}, using defaults: {}", path.display(), e);
                return PatchConfig::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                PatchConfig::default()
            }
        }
    }
}
