//! Bundled resource lookup
//!
//! Files shipped with the tool (the replacement payload and `easypatch.json`)
//! live under a resource root. When the tool runs from a packaged bundle the
//! launcher points `EASYPATCH_RESOURCE_DIR` at the extracted bundle;
//! otherwise resources sit next to the executable.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Environment variable naming the packaged bundle directory
pub const RESOURCE_DIR_VAR: &str = "EASYPATCH_RESOURCE_DIR";

/// Directory bundled resources are resolved against
pub fn resource_root() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(RESOURCE_DIR_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf))
}

/// Absolute path of the bundled resource at `relative`
pub fn resolve_resource(relative: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(resource_root()?.join(relative))
}
