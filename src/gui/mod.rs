//! GUI module
//!
//! Provides the Slint main window: a log pane and a single action button.

pub mod gui_controller;

pub use gui_controller::GuiController;
