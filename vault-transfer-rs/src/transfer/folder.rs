//! Folder tree transfer.

use super::Transfer;
use crate::config::TransferSettings;
use crate::error::exit_code;
use crate::host::VaultHost;
use crate::transfer::conflict::WrittenFiles;
use crate::types::{FolderRef, NoteRef, TransferOutcome, VaultEntry};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one file within a folder transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: TransferOutcome,
}

/// Everything that happened during a folder transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderTransferReport {
    pub folder: PathBuf,
    /// Set when the whole operation stopped before any file was visited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<TransferOutcome>,
    pub files: Vec<FileReport>,
    /// Whether the source folder was moved to the trash.
    pub folder_removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_error: Option<String>,
}

impl FolderTransferReport {
    fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            aborted: None,
            files: Vec::new(),
            folder_removed: false,
            folder_error: None,
        }
    }

    /// Whether every file was copied into the other vault.
    ///
    /// A skipped file does not count: whatever sits at its destination is
    /// not its content.
    pub fn all_copied(&self) -> bool {
        self.aborted.is_none() && self.files.iter().all(|f| f.outcome.is_copied())
    }

    /// Exit code of the first failure, or success.
    pub fn exit_code(&self) -> i32 {
        if let Some(ref outcome) = self.aborted {
            return outcome.exit_code();
        }
        if let Some(report) = self
            .files
            .iter()
            .find(|f| f.outcome.exit_code() != exit_code::SUCCESS)
        {
            return report.outcome.exit_code();
        }
        if self.folder_error.is_some() {
            return exit_code::GENERAL_ERROR;
        }
        exit_code::SUCCESS
    }
}

/// Every file below a folder, depth first, children in name order.
pub fn collect_files(folder: &FolderRef) -> Vec<&NoteRef> {
    let mut children: Vec<&VaultEntry> = folder.children.iter().collect();
    children.sort_by(|a, b| a.name().cmp(b.name()));

    let mut files = Vec::new();
    for child in children {
        match child {
            VaultEntry::File(file) => files.push(file),
            VaultEntry::Folder(sub) => files.extend(collect_files(sub)),
        }
    }
    files
}

impl<'a, H: VaultHost + ?Sized> Transfer<'a, H> {
    /// Copy every file below a folder into the other vault.
    ///
    /// Files are transferred one at a time and a failing file does not stop
    /// the walk. When the original is to be deleted, the folder is trashed
    /// once at the end, and only if every file made it across.
    pub fn transfer_folder(
        &self,
        folder: &FolderRef,
        settings: &TransferSettings,
        explicit: Option<&Path>,
    ) -> FolderTransferReport {
        let mut report = FolderTransferReport::new(&folder.path);

        if let Err(e) = settings.validate() {
            report.aborted = Some(self.failure_outcome(e));
            return report;
        }

        let mut written = WrittenFiles::new();
        for file in collect_files(folder) {
            let outcome = self.transfer_note_in(None, file, settings, true, explicit, &mut written);
            self.notify(&format!("Finished copying {}", file.path_str()));
            report.files.push(FileReport {
                path: file.path.clone(),
                outcome,
            });
        }

        if settings.delete_original && !settings.create_link {
            self.remove_folder(folder, settings, &mut report);
        }

        report
    }

    fn remove_folder(
        &self,
        folder: &FolderRef,
        settings: &TransferSettings,
        report: &mut FolderTransferReport,
    ) {
        if !report.all_copied() {
            tracing::warn!(
                "keeping {}: not every file was transferred",
                folder.path.display()
            );
            return;
        }
        if folder.path.as_os_str().is_empty() {
            tracing::warn!("refusing to trash the vault root");
            return;
        }

        match self.host.trash(&folder.path, settings.move_to_system_trash) {
            Ok(()) => {
                tracing::info!("trashed {}", folder.path.display());
                report.folder_removed = true;
            }
            Err(e) => {
                self.notify(&format!("Error deleting folder: {}", e));
                report.folder_error = Some(e.to_string());
            }
        }
    }
}
