//! Error types for `EasyPatch`
//!
//! Every failure of the resolve-then-replace task maps onto one variant here.
//! The task reports the `Display` text of the error as its single terminal
//! failure message.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for `EasyPatch`
#[derive(Debug, Error)]
pub enum EasyPatchError {
    /// No resolution strategy produced an installation directory
    #[error("could not find the installation directory for {app_name}")]
    NotFound {
        /// Application that was searched for
        app_name: String,
    },

    /// The bundled replacement file does not exist
    #[error("source file does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The resolved installation directory is gone at replace time
    #[error("target directory does not exist: {}", .0.display())]
    TargetDirMissing(PathBuf),

    /// The resolved target is the bundled replacement file itself
    #[error("source and target are the same file: {}", .0.display())]
    SameFile(PathBuf),

    /// Backup or replacement copy failed
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    CopyFailed {
        /// Copy source
        from: PathBuf,
        /// Copy destination
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Another process of this tool holds the single-instance lock
    #[error("another instance of EasyPatch is already running")]
    AlreadyRunning,

    /// Logging could not be set up
    /// Preserves the underlying error source for full error chain transparency
    #[error("Logging error: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Windows API error
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] windows::core::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for `EasyPatch` operations
pub type Result<T> = std::result::Result<T, EasyPatchError>;

/// Convert an error to a message suitable for an error dialog
pub fn get_user_friendly_error(error: &EasyPatchError) -> String {
    match error {
        EasyPatchError::NotFound { app_name } => {
            format!(
                "Could not find the installation directory for {app_name}.\n\n\
                 Please ensure:\n\
                 - {app_name} is installed\n\
                 - Or set the {} environment variable to its install folder",
                crate::resolver::env_var_name(app_name)
            )
        }
        EasyPatchError::SourceMissing(path) => {
            format!(
                "The replacement file is missing:\n{}\n\n\
                 Please re-extract the tool with all of its bundled files.",
                path.display()
            )
        }
        EasyPatchError::TargetDirMissing(path) => {
            format!(
                "The installation directory no longer exists:\n{}\n\n\
                 The application may have been moved or uninstalled.",
                path.display()
            )
        }
        EasyPatchError::SameFile(path) => {
            format!(
                "The replacement file would overwrite itself:\n{}\n\n\
                 The install directory points at the folder EasyPatch runs from.",
                path.display()
            )
        }
        EasyPatchError::CopyFailed { to, source, .. } => {
            format!(
                "Failed to write {}:\n\n{source}\n\n\
                 Please ensure:\n\
                 - The application is not running\n\
                 - You have write permission (try running as administrator)\n\
                 - There is enough free disk space",
                to.display()
            )
        }
        EasyPatchError::AlreadyRunning => "EasyPatch is already running.\n\n\
             Please close the existing window before starting a new one."
            .to_string(),
        EasyPatchError::LoggingError(e) => {
            format!(
                "EasyPatch could not set up logging:\n\n{e}\n\n\
                 Please check that %APPDATA% is writable."
            )
        }
        #[cfg(windows)]
        EasyPatchError::WindowsApiError(e) => {
            format!(
                "A Windows API error occurred:\n\n{e}\n\n\
                 Please ensure your Windows installation is up to date."
            )
        }
        EasyPatchError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
    }
}
