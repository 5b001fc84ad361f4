//! Configuration data models
//!
//! This module defines the data structures used for application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration: what to patch and how the window looks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Human-readable name of the application to patch (e.g. "Sublime Text")
    pub app_name: String,
    /// Replacement file, relative to the resource root
    pub source_file: PathBuf,
    /// Initial window geometry
    pub window: WindowState,
}

/// Window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowState {
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            app_name: "Sublime Text".to_string(),
            source_file: PathBuf::from("payload").join("sublime_text.exe"),
            window: WindowState::default(),
        }
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}
