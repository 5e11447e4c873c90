//! What to do when the destination is missing or already taken.

use crate::config::TransferSettings;
use crate::error::{Result, TransferError};
use crate::host::VaultHost;
use crate::types::ResolvedDestination;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// How a copy may go ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Nothing is in the way.
    Proceed,
    /// The existing destination file must be removed first.
    ProceedAfterRemoval,
}

/// Check a destination before anything is written.
///
/// Fails with [`TransferError::DirectoryMissing`] when the destination folder
/// does not exist and with [`TransferError::FileExists`] when the file is
/// present and overwriting is off.
pub fn check_destination<H: VaultHost + ?Sized>(
    host: &H,
    destination: &ResolvedDestination,
    settings: &TransferSettings,
) -> Result<ConflictDecision> {
    if !host.target_is_dir(&destination.directory) {
        return Err(TransferError::DirectoryMissing(destination.directory.clone()));
    }

    if host.target_exists(&destination.file) {
        if !settings.overwrite {
            return Err(TransferError::FileExists(destination.file.clone()));
        }
        return Ok(ConflictDecision::ProceedAfterRemoval);
    }

    Ok(ConflictDecision::Proceed)
}

/// Destinations written during one operation, with the vault file each
/// was copied from.
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    sources: HashMap<PathBuf, PathBuf>,
}

impl WrittenFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, destination: PathBuf, source: PathBuf) {
        self.sources.insert(destination, source);
    }

    /// Whether `source` was already copied to `destination`.
    ///
    /// A destination written from a different file is a conflict whether or
    /// not overwriting is on.
    pub fn already_copied(&self, destination: &Path, source: &Path) -> Result<bool> {
        match self.sources.get(destination) {
            Some(previous) if previous == source => Ok(true),
            Some(_) => Err(TransferError::FileExists(destination.to_path_buf())),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Vault;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TempDir, Vault) {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let vault = Vault::new(source.path()).unwrap();
        (source, target, vault)
    }

    fn destination(dir: &std::path::Path, name: &str) -> ResolvedDestination {
        ResolvedDestination {
            directory: dir.to_path_buf(),
            file: dir.join(name),
        }
    }

    #[test]
    fn test_missing_directory() {
        let (_source, target, vault) = setup();
        let dest = destination(&target.path().join("nope"), "a.md");
        let result = check_destination(&vault, &dest, &TransferSettings::default());
        assert!(matches!(result, Err(TransferError::DirectoryMissing(_))));
    }

    #[test]
    fn test_free_destination() {
        let (_source, target, vault) = setup();
        let dest = destination(target.path(), "a.md");
        let decision = check_destination(&vault, &dest, &TransferSettings::default()).unwrap();
        assert_eq!(decision, ConflictDecision::Proceed);
    }

    #[test]
    fn test_existing_file_follows_overwrite() {
        let (_source, target, vault) = setup();
        fs::write(target.path().join("a.md"), "old").unwrap();
        let dest = destination(target.path(), "a.md");

        let result = check_destination(&vault, &dest, &TransferSettings::default());
        assert!(matches!(result, Err(TransferError::FileExists(_))));

        let settings = TransferSettings {
            overwrite: true,
            ..Default::default()
        };
        let decision = check_destination(&vault, &dest, &settings).unwrap();
        assert_eq!(decision, ConflictDecision::ProceedAfterRemoval);
        // Checking never touches the file
        assert_eq!(fs::read_to_string(&dest.file).unwrap(), "old");
    }

    #[test]
    fn test_written_by_another_file_conflicts() {
        let mut written = WrittenFiles::new();
        let dest = PathBuf::from("/other/x.md");
        written.record(dest.clone(), PathBuf::from("P/A/x.md"));

        assert!(written.already_copied(&dest, Path::new("P/A/x.md")).unwrap());
        assert!(matches!(
            written.already_copied(&dest, Path::new("P/B/x.md")),
            Err(TransferError::FileExists(_))
        ));
        assert!(!written.already_copied(Path::new("/other/y.md"), Path::new("P/y.md")).unwrap());
    }
}
