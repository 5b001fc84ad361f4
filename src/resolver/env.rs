//! Environment access for install-path resolution
//!
//! Resolution reads environment variables through [`EnvLookup`] so tests can
//! supply a fixed map instead of mutating the process environment.

use std::collections::HashMap;
use std::path::PathBuf;

/// Default value of `%ProgramFiles%` when the variable is absent
pub const DEFAULT_PROGRAM_FILES: &str = r"C:\Program Files";

/// Default value of `%ProgramFiles(x86)%` when the variable is absent
pub const DEFAULT_PROGRAM_FILES_X86: &str = r"C:\Program Files (x86)";

/// Source of environment variables
pub trait EnvLookup: Send {
    /// Value of `key`, or `None` if unset or not valid Unicode
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Root directories under which applications are commonly installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    /// `%ProgramFiles%`
    pub program_files: Option<PathBuf>,
    /// `%ProgramFiles(x86)%`
    pub program_files_x86: Option<PathBuf>,
    /// `%LOCALAPPDATA%`
    pub local_app_data: Option<PathBuf>,
    /// `%APPDATA%`
    pub app_data: Option<PathBuf>,
}

impl SearchRoots {
    /// Read the roots from `env`, defaulting the two Program Files roots
    pub fn from_env(env: &dyn EnvLookup) -> Self {
        let non_empty = |key: &str| env.var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Self {
            program_files: Some(
                non_empty("ProgramFiles").unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILES)),
            ),
            program_files_x86: Some(
                non_empty("ProgramFiles(x86)")
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILES_X86)),
            ),
            local_app_data: non_empty("LOCALAPPDATA"),
            app_data: non_empty("APPDATA"),
        }
    }

    /// Candidate install directories for `app_name`, in probe order
    ///
    /// Roots that are unset are left out.
    pub fn candidates(&self, app_name: &str) -> Vec<PathBuf> {
        [
            &self.program_files,
            &self.program_files_x86,
            &self.local_app_data,
            &self.app_data,
        ]
        .into_iter()
        .flatten()
        .map(|root| root.join(app_name))
        .collect()
    }
}
