//! Shared test utilities for `EasyPatch` unit tests.
//!
//! This module is only compiled during testing (`#[cfg(test)]`).

use std::ffi::OsStr;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes tests that modify process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that sets or clears one environment variable for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because another
/// thread may read the environment concurrently. Every test that touches the
/// environment goes through this guard, and the guard holds `ENV_LOCK` for
/// its whole lifetime, so modifications never overlap.
pub struct EnvVarGuard {
    key: &'static str,
    original: Option<std::ffi::OsString>,
    // Held for the lifetime of the guard
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under ENV_LOCK"
)]
impl EnvVarGuard {
    /// Set `key` to `value` until the guard is dropped
    pub fn set(key: &'static str, value: impl AsRef<OsStr>) -> Self {
        let guard = Self::acquire(key);
        // SAFETY: ENV_LOCK is held, no other test touches the environment
        unsafe {
            std::env::set_var(key, value);
        }
        guard
    }

    /// Clear `key` until the guard is dropped
    pub fn unset(key: &'static str) -> Self {
        let guard = Self::acquire(key);
        // SAFETY: ENV_LOCK is held, no other test touches the environment
        unsafe {
            std::env::remove_var(key);
        }
        guard
    }

    fn acquire(key: &'static str) -> Self {
        // A panicking test poisons the lock; the environment is still restored by Drop
        let lock = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            key,
            original: std::env::var_os(key),
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under ENV_LOCK"
)]
impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: ENV_LOCK is still held by this guard
        unsafe {
            match self.original.take() {
                Some(original) => std::env::set_var(self.key, original),
                None => std::env::remove_var(self.key),
            }
        }
    }
}
