//! Registry scan for recorded install locations
//!
//! Installed products register themselves under
//! `SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall`, one subkey per
//! product. The scan walks that branch under the machine-wide hive and then
//! the current-user hive and returns the `InstallLocation` of the first entry
//! whose `DisplayName` contains the application name, ignoring case.
//!
//! The matching rules live in [`scan_uninstall_branch`], which only needs an
//! [`UninstallBranch`]. Each scope's branch is opened once and every product
//! subkey once; both values are read from that one open subkey. On Windows that is backed by `winreg`; elsewhere the
//! registry is reported as unavailable through [`UnavailableLookup`].

use crate::error::{EasyPatchError, Result};
use crate::progress::ProgressSink;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Registry path of the uninstall-entries branch, relative to a hive root
pub const UNINSTALL_BRANCH: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

/// Hive root that an uninstall branch is opened under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryScope {
    /// `HKEY_LOCAL_MACHINE`
    LocalMachine,
    /// `HKEY_CURRENT_USER`
    CurrentUser,
}

impl RegistryScope {
    /// Scopes in the order they are scanned
    pub const SCAN_ORDER: [Self; 2] = [Self::LocalMachine, Self::CurrentUser];

    /// Short hive name for log lines
    pub fn hive_name(self) -> &'static str {
        match self {
            Self::LocalMachine => "HKLM",
            Self::CurrentUser => "HKCU",
        }
    }
}

/// Capability to look up an application's install location in the registry
pub trait InstallRegistry: Send {
    /// Find the install location recorded for `app_name`
    ///
    /// Fails with [`EasyPatchError::NotFound`] when nothing matches or the
    /// registry cannot be used at all.
    fn scan(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Result<PathBuf>;
}

/// One product subkey of an uninstall branch, opened for reading
pub trait UninstallEntry {
    /// Subkey name
    fn name(&self) -> &str;

    /// String value `value` of this subkey
    fn read_string(&self, value: &str) -> io::Result<String>;
}

/// Product subkeys of one scope; an `Err` item is a subkey that could not be opened
pub type UninstallEntries<'a> = Box<dyn Iterator<Item = io::Result<Box<dyn UninstallEntry>>> + 'a>;

/// Read access to the uninstall branch of each scope
pub trait UninstallBranch {
    /// Product subkeys under `scope`, in ascending index order
    ///
    /// An error means the branch itself could not be opened.
    fn entries(&self, scope: RegistryScope) -> io::Result<UninstallEntries<'_>>;
}

/// Whether a registry `DisplayName` refers to `app_name`
pub fn display_name_matches(display_name: &str, app_name: &str) -> bool {
    display_name
        .to_lowercase()
        .contains(&app_name.to_lowercase())
}

/// Scan `branch` for `app_name`, returning the first recorded install location
///
/// A scope whose branch cannot be opened is skipped, as is any subkey with a
/// missing or unreadable `DisplayName`, a missing `InstallLocation`, or an
/// empty one.
pub fn scan_uninstall_branch(
    branch: &dyn UninstallBranch,
    app_name: &str,
    sink: &mut dyn ProgressSink,
) -> Option<PathBuf> {
    for scope in RegistryScope::SCAN_ORDER {
        let entries = match branch.entries(scope) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping {}\\{UNINSTALL_BRANCH}: {e}", scope.hive_name());
                continue;
            }
        };

        debug!("Scanning uninstall entries under {}", scope.hive_name());

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable uninstall entry: {e}");
                    continue;
                }
            };
            let Ok(display_name) = entry.read_string("DisplayName") else {
                continue;
            };
            if !display_name_matches(&display_name, app_name) {
                continue;
            }

            sink.success(format!("Found application in the registry: {display_name}"));

            match entry.read_string("InstallLocation") {
                Ok(location) if !location.trim().is_empty() => {
                    let install_dir = PathBuf::from(location.trim());
                    info!(
                        "Registry entry {}\\{} points to {}",
                        scope.hive_name(),
                        entry.name(),
                        install_dir.display()
                    );
                    sink.success(format!(
                        "Install directory from the registry: {}",
                        install_dir.display()
                    ));
                    return Some(install_dir);
                }
                Ok(_) => debug!("Registry entry {} has an empty InstallLocation", entry.name()),
                Err(e) => debug!("Registry entry {} has no InstallLocation: {e}", entry.name()),
            }
        }
    }

    None
}

/// Registry lookup for hosts without a registry
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLookup;

impl InstallRegistry for UnavailableLookup {
    fn scan(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Result<PathBuf> {
        warn!("Registry access is not available on this platform");
        sink.warning("Registry access is not available on this platform, skipping registry lookup");
        Err(EasyPatchError::NotFound {
            app_name: app_name.to_string(),
        })
    }
}

/// Registry lookup backed by the Windows registry
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistryLookup;

#[cfg(windows)]
impl WindowsRegistryLookup {
    fn open_branch(scope: RegistryScope) -> io::Result<winreg::RegKey> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

        let hive = match scope {
            RegistryScope::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryScope::CurrentUser => HKEY_CURRENT_USER,
        };
        RegKey::predef(hive).open_subkey(UNINSTALL_BRANCH)
    }
}

/// An opened product subkey
#[cfg(windows)]
struct WindowsUninstallEntry {
    name: String,
    key: winreg::RegKey,
}

#[cfg(windows)]
impl UninstallEntry for WindowsUninstallEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_string(&self, value: &str) -> io::Result<String> {
        self.key.get_value::<String, _>(value)
    }
}

#[cfg(windows)]
impl UninstallBranch for WindowsRegistryLookup {
    fn entries(&self, scope: RegistryScope) -> io::Result<UninstallEntries<'_>> {
        let branch = Self::open_branch(scope)?;
        let names: Vec<io::Result<String>> = branch.enum_keys().collect();

        Ok(Box::new(names.into_iter().map(
            move |name| -> io::Result<Box<dyn UninstallEntry>> {
                let name = name?;
                let key = branch.open_subkey(&name)?;
                Ok(Box::new(WindowsUninstallEntry { name, key }))
            },
        )))
    }
}

#[cfg(windows)]
impl InstallRegistry for WindowsRegistryLookup {
    fn scan(&self, app_name: &str, sink: &mut dyn ProgressSink) -> Result<PathBuf> {
        sink.info("Querying the registry...");
        scan_uninstall_branch(self, app_name, sink).ok_or_else(|| EasyPatchError::NotFound {
            app_name: app_name.to_string(),
        })
    }
}

/// The registry capability of the current platform
pub fn default_registry() -> Box<dyn InstallRegistry> {
    #[cfg(windows)]
    {
        Box::new(WindowsRegistryLookup)
    }

    #[cfg(not(windows))]
    {
        Box::new(UnavailableLookup)
    }
}
