//! Install-path resolution
//!
//! Finds the directory an application is installed in. Strategies are tried
//! in a fixed order and the first one that produces a directory wins:
//!
//! 1. **Environment variable** `<APP_NAME>_PATH` (uppercased, spaces replaced
//!    by underscores). Its value is taken as-is.
//! 2. **Common install locations** under Program Files, Program Files (x86),
//!    `%LOCALAPPDATA%` and `%APPDATA%`, first existing directory wins.
//! 3. **Registry scan** of the uninstall entries, see [`registry`].
//!
//! Resolution is read-only: it touches the environment, the filesystem and
//! the registry but never writes to any of them.

pub mod env;
pub mod registry;

pub use env::{EnvLookup, ProcessEnv, SearchRoots};
pub use registry::{
    InstallRegistry, RegistryScope, UnavailableLookup, UninstallBranch, UninstallEntries,
    UninstallEntry, default_registry, display_name_matches, scan_uninstall_branch,
};
#[cfg(windows)]
pub use registry::WindowsRegistryLookup;

use crate::error::{EasyPatchError, Result};
use crate::progress::ProgressSink;
use std::path::PathBuf;
use tracing::{debug, info};

/// Name of the environment variable that overrides the install directory of `app_name`
///
/// `"Sublime Text"` becomes `SUBLIME_TEXT_PATH`.
pub fn env_var_name(app_name: &str) -> String {
    format!("{}_PATH", app_name.to_uppercase().replace(' ', "_"))
}

/// Resolves application install directories
pub struct InstallPathResolver {
    env: Box<dyn EnvLookup>,
    registry: Box<dyn InstallRegistry>,
}

impl InstallPathResolver {
    /// Create a resolver over the given environment and registry capability
    pub fn new(env: Box<dyn EnvLookup>, registry: Box<dyn InstallRegistry>) -> Self {
        Self { env, registry }
    }

    /// Resolver over the process environment and the platform registry
    pub fn system() -> Self {
        Self::new(Box::new(ProcessEnv), default_registry())
    }

    /// Resolve the install directory of `app_name`
    pub fn resolve(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Result<PathBuf> {
        sink.info(format!("Looking for the installation directory of {app_name}..."));

        if let Some(dir) = self.from_env_var(app_name, sink) {
            return Ok(dir);
        }

        if let Some(dir) = self.from_common_paths(app_name, sink) {
            return Ok(dir);
        }

        sink.info("Not found in common locations, trying the registry...");
        let dir = self.registry.scan(app_name, sink).map_err(|e| {
            debug!("Registry lookup for {app_name} failed: {e}");
            EasyPatchError::NotFound {
                app_name: app_name.to_string(),
            }
        })?;
        info!("Resolved {app_name} from the registry: {}", dir.display());
        Ok(dir)
    }

    fn from_env_var(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Option<PathBuf> {
        let var = env_var_name(app_name);
        match self.env.var(&var) {
            Some(value) => {
                let dir = PathBuf::from(value);
                info!("Resolved {app_name} from {var}: {}", dir.display());
                sink.success(format!(
                    "Found install directory in environment variable {var}: {}",
                    dir.display()
                ));
                Some(dir)
            }
            None => {
                sink.info(format!("Environment variable {var} is not set, continuing..."));
                None
            }
        }
    }

    fn from_common_paths(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Option<PathBuf> {
        sink.info("Checking common install locations...");

        for candidate in SearchRoots::from_env(self.env.as_ref()).candidates(app_name) {
            sink.info(format!("  Checking: {}", candidate.display()));
            if candidate.exists() {
                info!("Resolved {app_name} from common path {}", candidate.display());
                sink.success(format!(
                    "Found install directory in a common location: {}",
                    candidate.display()
                ));
                return Some(candidate);
            }
        }

        None
    }
}
