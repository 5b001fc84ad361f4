//! `EasyPatch` - Drop-in file replacement for installed Windows applications
//!
//! Locates where an application is installed, backs up one of its files and
//! overwrites it with a bundled replacement. The install directory comes from
//! the first strategy that finds it: an `<APP_NAME>_PATH` environment
//! variable, a common install location, or the registry's uninstall entries.
//!
//! `InstallPathResolver` finds the directory, `FileReplacer` performs the
//! backup and copy, and `TaskRunner` runs both on a background worker while
//! streaming progress to the GUI.

// Module declarations
pub mod config;
pub mod error;
pub mod progress;
pub mod replacer;
pub mod resolver;
pub mod resources;
pub mod task;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use error::{EasyPatchError, Result};
pub use progress::{ProgressEvent, ProgressSink, Severity};
pub use replacer::{FileReplacer, ReplaceOutcome};
pub use resolver::InstallPathResolver;
pub use task::{PatchJob, TaskEvent, TaskOutcome, TaskRunner, TaskState};
