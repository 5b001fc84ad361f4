//! `EasyPatch` - Drop-in file replacement for installed Windows applications
//!
//! Opens a small window with a log pane and a button. Clicking the button
//! finds the configured application's install directory, backs up the file
//! about to be replaced and copies the bundled replacement over it.

// Set Windows subsystem to hide console window
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![expect(
    missing_docs,
    reason = "Slint-generated code from include_modules! lacks doc comments"
)]
#![allow(clippy::unwrap_used)] // Slint-generated code from include_modules! uses .unwrap() extensively

// GUI module is only in the binary, not the library
mod gui;

use anyhow::{Context, Result};
use easypatch::{config::ConfigManager, error::get_user_friendly_error, utils};
use gui::GuiController;
use tracing::{error, info};

// Include Slint-generated code
slint::include_modules!();

fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    info!("EasyPatch v{} starting...", env!("CARGO_PKG_VERSION"));

    // Only one copy may patch at a time; this must happen before any file is touched
    let _single_instance_guard = match utils::SingleInstanceGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Single instance check failed: {}", e);
            show_error_and_exit(&get_user_friendly_error(&e));
            return Err(e.into());
        }
    };

    let config = ConfigManager::load().context("Failed to load configuration")?;
    info!(
        "Configured to patch {} with {}",
        config.app_name,
        config.source_file.display()
    );

    let gui_controller = match GuiController::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Failed to create GUI: {:#}", e);
            show_error_and_exit(&format!("Failed to start EasyPatch:\n\n{e:#}"));
            return Err(e);
        }
    };

    info!("Starting GUI event loop");
    gui_controller
        .run()
        .context("GUI event loop terminated with error")?;

    info!("EasyPatch shutting down");

    Ok(())
}

/// Shows an error dialog and exits the application.
#[cfg(windows)]
fn show_error_and_exit(message: &str) {
    use rfd::MessageDialog;

    MessageDialog::new()
        .set_title("EasyPatch - Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .set_level(rfd::MessageLevel::Error)
        .show();

    std::process::exit(1);
}

/// Shows an error dialog and exits the application (non-Windows fallback).
#[cfg(not(windows))]
fn show_error_and_exit(message: &str) {
    eprintln!("ERROR: {message}");
    std::process::exit(1);
}
