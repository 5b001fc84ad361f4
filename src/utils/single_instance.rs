//! Single instance enforcement
//!
//! Two copies of the tool patching the same install directory would race on
//! the backup and the target, so only one may run at a time. Uses a Windows
//! named mutex.

use crate::error::Result;

#[cfg(windows)]
use crate::error::EasyPatchError;

#[cfg(windows)]
use windows::Win32::Foundation::{CloseHandle, HANDLE};
#[cfg(windows)]
use windows::Win32::System::Threading::{CreateMutexW, OpenMutexW, SYNCHRONIZATION_SYNCHRONIZE};

/// Name of the mutex held while the tool runs
#[cfg(windows)]
const MUTEX_NAME: &str = "Global\\EasyPatch_SingleInstance_Mutex";

/// Single instance guard using a Windows named mutex (released on drop)
#[cfg(windows)]
pub struct SingleInstanceGuard {
    mutex_handle: HANDLE,
}

#[cfg(windows)]
impl SingleInstanceGuard {
    /// Create a new single instance guard, returning an error if another instance is running
    #[allow(unsafe_code)] // Windows FFI for mutex
    pub fn new() -> Result<Self> {
        use tracing::{debug, error};
        use windows::core::HSTRING;

        let mutex_name = HSTRING::from(MUTEX_NAME);

        unsafe {
            // Opening succeeds only if another instance created the mutex
            if let Ok(existing_handle) = OpenMutexW(SYNCHRONIZATION_SYNCHRONIZE, false, &mutex_name)
            {
                error!("Another instance of EasyPatch is already running");
                let _ = CloseHandle(existing_handle);
                return Err(EasyPatchError::AlreadyRunning);
            }

            let mutex_handle = CreateMutexW(None, true, &mutex_name)?;
            debug!("Single instance mutex created");
            Ok(Self { mutex_handle })
        }
    }
}

#[cfg(windows)]
impl Drop for SingleInstanceGuard {
    #[allow(unsafe_code)] // Windows FFI for mutex cleanup
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.mutex_handle);
        }
        tracing::debug!("Single instance mutex released");
    }
}

/// Stub implementation for non-Windows platforms
#[cfg(not(windows))]
pub struct SingleInstanceGuard;

#[cfg(not(windows))]
impl SingleInstanceGuard {
    /// Create a new single instance guard (stub for non-Windows, always succeeds)
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}
