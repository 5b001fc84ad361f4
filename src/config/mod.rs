//! Configuration management module
//!
//! Which application to patch and with which bundled file is read from
//! `easypatch.json` in the resource root, falling back to built-in defaults.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{PatchConfig, WindowState};
