//! Backup-then-replace of a single file inside an install directory
//!
//! The replacement keeps the source file's name: `payload/app.exe` replaces
//! `<install_dir>/app.exe`. An existing target is first copied to
//! `<target>.bak`, overwriting any earlier backup. If the backup cannot be
//! written the target is left untouched.

use crate::error::{EasyPatchError, Result};
use crate::progress::ProgressSink;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the target file name for its backup
pub const BACKUP_SUFFIX: &str = ".bak";

/// What a successful replacement did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// File that now holds the source's contents
    pub target: PathBuf,
    /// Backup of the previous target, if there was one
    pub backup: Option<PathBuf>,
}

/// Path of the backup for `target`
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Replaces a file in an install directory with a bundled one
pub struct FileReplacer;

impl FileReplacer {
    /// Copy `source_file` into `install_dir`, backing up the file it replaces
    ///
    /// All preconditions are checked before any file is written: the source
    /// must exist ([`EasyPatchError::SourceMissing`]), so must the install
    /// directory ([`EasyPatchError::TargetDirMissing`]), and the target must
    /// not be the source itself ([`EasyPatchError::SameFile`]).
    pub fn replace(
        install_dir: &Path,
        source_file: &Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<ReplaceOutcome> {
        if !source_file.exists() {
            return Err(EasyPatchError::SourceMissing(source_file.to_path_buf()));
        }

        if !install_dir.is_dir() {
            return Err(EasyPatchError::TargetDirMissing(install_dir.to_path_buf()));
        }

        let file_name = source_file
            .file_name()
            .ok_or_else(|| EasyPatchError::SourceMissing(source_file.to_path_buf()))?;
        let target = install_dir.join(file_name);

        if is_same_file(source_file, &target) {
            return Err(EasyPatchError::SameFile(target));
        }

        let backup = if target.exists() {
            let backup = backup_path(&target);
            sink.info(format!("Creating backup: {}", backup.display()));
            copy_preserving_metadata(&target, &backup)?;
            info!("Backed up {} to {}", target.display(), backup.display());
            sink.success("Backup created");
            Some(backup)
        } else {
            debug!("No existing {} to back up", target.display());
            None
        };

        sink.info(format!("Replacing {}...", target.display()));
        copy_preserving_metadata(source_file, &target)?;
        info!("Replaced {} with {}", target.display(), source_file.display());
        sink.success("Replacement complete!");

        Ok(ReplaceOutcome { target, backup })
    }
}

/// Whether `source` and `target` name the same file on disk
fn is_same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}

/// Copy `from` over `to`, carrying over permissions and access/modification times
///
/// Times are set through the handle used to write the contents and the
/// permissions are applied last, so a read-only source still yields a
/// complete copy.
fn copy_preserving_metadata(from: &Path, to: &Path) -> Result<()> {
    let copy_failed = |source| EasyPatchError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(from).map_err(copy_failed)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    let mut reader = File::open(from).map_err(copy_failed)?;
    let mut writer = File::create(to).map_err(copy_failed)?;
    io::copy(&mut reader, &mut writer).map_err(copy_failed)?;
    writer.set_times(times).map_err(copy_failed)?;
    drop(writer);

    fs::set_permissions(to, metadata.permissions()).map_err(copy_failed)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressEvent;
    use std::time::{Duration, SystemTime};

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let payload = temp.path().join("payload");
        let install = temp.path().join("install");
        fs::create_dir(&payload).unwrap();
        fs::create_dir(&install).unwrap();
        let source = payload.join("tool.exe");
        fs::write(&source, b"new build").unwrap();
        (temp, source, install)
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/opt/app/tool.exe")),
            PathBuf::from("/opt/app/tool.exe.bak")
        );
    }

    #[test]
    fn test_replace_without_existing_target_makes_no_backup() {
        let (_temp, source, install) = setup();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let outcome = FileReplacer::replace(&install, &source, &mut events).unwrap();

        assert_eq!(outcome.target, install.join("tool.exe"));
        assert!(outcome.backup.is_none());
        assert!(!install.join("tool.exe.bak").exists());
        assert_eq!(fs::read(&outcome.target).unwrap(), b"new build");
    }

    #[test]
    fn test_replace_backs_up_existing_target() {
        let (_temp, source, install) = setup();
        fs::write(install.join("tool.exe"), b"old build").unwrap();
        fs::write(install.join("tool.exe.bak"), b"ancient build").unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let outcome = FileReplacer::replace(&install, &source, &mut events).unwrap();

        assert_eq!(outcome.backup, Some(install.join("tool.exe.bak")));
        assert_eq!(fs::read(install.join("tool.exe.bak")).unwrap(), b"old build");
        assert_eq!(fs::read(install.join("tool.exe")).unwrap(), b"new build");
        assert!(events.iter().any(|e| e.message == "Backup created"));
    }

    #[test]
    fn test_missing_source_checked_first() {
        let (temp, _source, _install) = setup();
        let missing_dir = temp.path().join("gone");
        let mut events: Vec<ProgressEvent> = Vec::new();

        let err =
            FileReplacer::replace(&missing_dir, &temp.path().join("nope.exe"), &mut events)
                .unwrap_err();

        assert!(matches!(err, EasyPatchError::SourceMissing(_)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_install_dir() {
        let (temp, source, _install) = setup();
        let missing_dir = temp.path().join("gone");
        let mut events: Vec<ProgressEvent> = Vec::new();

        let err = FileReplacer::replace(&missing_dir, &source, &mut events).unwrap_err();

        assert!(matches!(err, EasyPatchError::TargetDirMissing(ref p) if p == &missing_dir));
        assert!(!missing_dir.exists());
    }

    #[test]
    fn test_modification_time_is_preserved() {
        let (_temp, source, install) = setup();
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(stamp)
            .unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let outcome = FileReplacer::replace(&install, &source, &mut events).unwrap();

        let modified = fs::metadata(&outcome.target).unwrap().modified().unwrap();
        assert_eq!(modified, stamp);
    }

    #[test]
    fn test_failed_backup_leaves_target_untouched() {
        let (_temp, source, install) = setup();
        fs::write(install.join("tool.exe"), b"old build").unwrap();
        // A directory where the backup file should go makes the copy fail
        fs::create_dir(install.join("tool.exe.bak")).unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let err = FileReplacer::replace(&install, &source, &mut events).unwrap_err();

        assert!(matches!(err, EasyPatchError::CopyFailed { .. }));
        assert_eq!(fs::read(install.join("tool.exe")).unwrap(), b"old build");
    }

    #[test]
    fn test_target_is_source_is_rejected() {
        let (_temp, source, _install) = setup();
        let bundle_dir = source.parent().unwrap().to_path_buf();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let err = FileReplacer::replace(&bundle_dir, &source, &mut events).unwrap_err();

        assert!(matches!(err, EasyPatchError::SameFile(ref p) if p == &source));
        assert_eq!(fs::read(&source).unwrap(), b"new build");
        assert!(!bundle_dir.join("tool.exe.bak").exists());
        assert!(events.is_empty());
    }

    #[test]
    fn test_read_only_source_is_copied_with_permissions() {
        let (_temp, source, install) = setup();
        fs::write(install.join("tool.exe"), b"old build").unwrap();
        let mut readonly = fs::metadata(&source).unwrap().permissions();
        readonly.set_readonly(true);
        fs::set_permissions(&source, readonly).unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let outcome = FileReplacer::replace(&install, &source, &mut events).unwrap();

        assert_eq!(fs::read(&outcome.target).unwrap(), b"new build");
        assert!(fs::metadata(&outcome.target).unwrap().permissions().readonly());
        assert_eq!(fs::read(install.join("tool.exe.bak")).unwrap(), b"old build");
    }

    #[test]
    fn test_read_only_target_is_backed_up() {
        let (_temp, source, install) = setup();
        let target = install.join("tool.exe");
        fs::write(&target, b"old build").unwrap();
        let mut readonly = fs::metadata(&target).unwrap().permissions();
        readonly.set_readonly(true);
        fs::set_permissions(&target, readonly).unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();

        let result = FileReplacer::replace(&install, &source, &mut events);

        // The backup completes whether or not the read-only target can then be overwritten
        let backup = install.join("tool.exe.bak");
        assert_eq!(fs::read(&backup).unwrap(), b"old build");
        assert!(fs::metadata(&backup).unwrap().permissions().readonly());
        assert!(events.iter().any(|e| e.message == "Backup created"));
        if let Err(err) = result {
            assert!(matches!(err, EasyPatchError::CopyFailed { ref to, .. } if to == &target));
        }
    }
}
