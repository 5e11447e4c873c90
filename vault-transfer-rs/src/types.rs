//! Shared types for vault-transfer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a link was written in the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSyntax {
    /// `[[target]]` or `![[target]]`.
    Wiki,
    /// `[text](target)` or `![alt](target)`.
    Markdown,
}

/// A link or embed found in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The link path, without heading or block reference.
    pub target: String,

    /// Optional display alias (wikilink `|alias` or markdown link text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after #, before ^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Optional block reference (the part after #^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Whether this is an embed rather than a link.
    pub embed: bool,

    pub syntax: LinkSyntax,

    /// Line number where this link appears (1-indexed).
    pub line: usize,

    /// Start column in the line (0-indexed).
    pub start_col: usize,

    /// End column in the line (0-indexed, exclusive).
    pub end_col: usize,
}

impl Link {
    /// Returns the full link target including heading/block reference.
    pub fn full_target(&self) -> String {
        let mut result = self.target.clone();
        if let Some(ref heading) = self.heading {
            result.push('#');
            result.push_str(heading);
        }
        if let Some(ref block_id) = self.block_id {
            result.push_str("#^");
            result.push_str(block_id);
        }
        result
    }
}

/// A single file in a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRef {
    /// Path relative to the vault root (e.g. `Projects/My Note.md`).
    pub path: PathBuf,
    /// File name with extension.
    pub name: String,
    /// File name without extension.
    pub basename: String,
}

impl NoteRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let basename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            basename,
        }
    }

    /// Lowercased extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// Whether this file is a markdown note.
    pub fn is_markdown(&self) -> bool {
        self.extension().as_deref() == Some("md")
    }

    /// The path as a forward-slash string.
    pub fn path_str(&self) -> String {
        path_to_slash(&self.path)
    }
}

/// A folder in a vault and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    /// Path relative to the vault root; empty for the root itself.
    pub path: PathBuf,
    pub name: String,
    pub children: Vec<VaultEntry>,
}

/// A vault item: either a file or a folder with children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultEntry {
    File(NoteRef),
    Folder(FolderRef),
}

impl VaultEntry {
    pub fn path(&self) -> &Path {
        match self {
            VaultEntry::File(file) => &file.path,
            VaultEntry::Folder(folder) => &folder.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VaultEntry::File(file) => &file.name,
            VaultEntry::Folder(folder) => &folder.name,
        }
    }
}

/// A non-note file linked or embedded from a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRef {
    /// Resolved path relative to the source vault root.
    pub path: PathBuf,
    pub name: String,
}

impl From<AttachmentRef> for NoteRef {
    fn from(attachment: AttachmentRef) -> Self {
        NoteRef::new(attachment.path)
    }
}

/// Where a file will be written in the other vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDestination {
    /// Directory that must exist before the copy.
    pub directory: PathBuf,
    /// Full path of the copied file.
    pub file: PathBuf,
}

/// The result of transferring a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransferOutcome {
    CopiedWithLink,
    CopiedWithDelete,
    CopiedUnchanged,
    SkippedExists,
    AbortedNoTargetFolder,
    AbortedInvalidSettings,
    FailedIo { message: String },
}

impl TransferOutcome {
    /// Whether the file now exists in the other vault because of this transfer.
    pub fn is_copied(&self) -> bool {
        matches!(
            self,
            TransferOutcome::CopiedWithLink
                | TransferOutcome::CopiedWithDelete
                | TransferOutcome::CopiedUnchanged
        )
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        use crate::error::exit_code;
        match self {
            TransferOutcome::CopiedWithLink
            | TransferOutcome::CopiedWithDelete
            | TransferOutcome::CopiedUnchanged => exit_code::SUCCESS,
            TransferOutcome::SkippedExists => exit_code::FILE_EXISTS,
            TransferOutcome::AbortedNoTargetFolder => exit_code::DIRECTORY_MISSING,
            TransferOutcome::AbortedInvalidSettings => exit_code::INVALID_SETTINGS,
            TransferOutcome::FailedIo { .. } => exit_code::GENERAL_ERROR,
        }
    }
}

/// Render a relative path with forward slashes.
pub fn path_to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
