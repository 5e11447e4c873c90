//! Capabilities the transfer engine needs from its host.
//!
//! The engine never touches UI or storage directly. A host provides:
//! - [`VaultHost`]: access to the source vault and the destination filesystem
//! - [`Notifier`]: user-facing notices
//! - [`Editor`]: an open editing buffer for the note, when there is one

use crate::error::Result;
use crate::types::{FolderRef, NoteRef, VaultEntry};
use chrono::NaiveDateTime;
use serde_yaml::Mapping;
use std::cell::RefCell;
use std::ops::Range;
use std::path::Path;

/// Timestamps of a vault file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTimes {
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
}

/// Source vault and destination filesystem operations.
///
/// Vault paths are relative to the source vault root. Destination paths
/// are absolute paths in the other vault and default to `std::fs`.
pub trait VaultHost {
    /// Absolute root of the source vault.
    fn root(&self) -> &Path;

    /// Read the raw bytes of a vault file.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace the full text of a note.
    fn write_note(&self, path: &Path, content: &str) -> Result<()>;

    /// Read a note's frontmatter, `None` if it has none.
    fn frontmatter(&self, path: &Path) -> Result<Option<Mapping>>;

    /// Mutate a note's frontmatter in place.
    ///
    /// `edit` returns whether it changed anything; unchanged notes are not
    /// rewritten.
    fn process_frontmatter(
        &self,
        path: &Path,
        edit: &mut dyn FnMut(&mut Mapping) -> bool,
    ) -> Result<()>;

    /// Direct children of a folder, with folder children left empty.
    fn list_children(&self, folder: &Path) -> Result<Vec<VaultEntry>>;

    /// Move a file or folder to the OS trash or to the vault trash.
    fn trash(&self, path: &Path, system: bool) -> Result<()>;

    /// Resolve a link (fragment allowed) relative to the note holding it.
    fn resolve_link(&self, link: &str, source: &Path) -> Option<NoteRef>;

    /// Resolve every link of one note, in order.
    fn resolve_links(&self, links: &[&str], source: &Path) -> Vec<Option<NoteRef>> {
        links.iter().map(|link| self.resolve_link(link, source)).collect()
    }

    /// The note's embedded and linked targets, as written.
    fn linked_targets(&self, note: &Path) -> Result<Vec<String>>;

    fn file_times(&self, path: &Path) -> Result<FileTimes>;

    fn target_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn target_is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_target_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn write_target(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn remove_target(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)?;
        Ok(())
    }
}

/// Load a folder and all of its descendants.
pub fn load_folder_tree<H: VaultHost + ?Sized>(host: &H, path: &Path) -> Result<FolderRef> {
    let mut children = host.list_children(path)?;
    for child in children.iter_mut() {
        if let VaultEntry::Folder(folder) = child {
            *folder = load_folder_tree(host, &folder.path)?;
        }
    }

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FolderRef {
        path: path.to_path_buf(),
        name,
        children,
    })
}

/// Shows short messages to the user.
pub trait Notifier {
    fn notice(&self, message: &str);
}

/// Notices that only go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        tracing::info!(target: "notice", "{}", message);
    }
}

/// Keeps every notice, for reports and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        self.messages.take()
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// An open editing buffer.
pub trait Editor {
    /// Replace the whole buffer.
    fn set_value(&mut self, content: &str);

    /// Replace the current selection, or insert at the cursor.
    fn replace_selection(&mut self, text: &str);
}

/// A plain in-memory editor buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub content: String,
    /// Selected byte range; empty means a cursor.
    pub selection: Range<usize>,
}

impl TextBuffer {
    /// A buffer with the cursor at the end.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let end = content.len();
        Self {
            content,
            selection: end..end,
        }
    }

    pub fn with_selection(mut self, selection: Range<usize>) -> Self {
        self.selection = selection;
        self
    }
}

impl Editor for TextBuffer {
    fn set_value(&mut self, content: &str) {
        self.content = content.to_string();
        self.selection = 0..0;
    }

    fn replace_selection(&mut self, text: &str) {
        let end = self.selection.end.min(self.content.len());
        let start = self.selection.start.min(end);
        self.content.replace_range(start..end, text);
        let cursor = start + text.len();
        self.selection = cursor..cursor;
    }
}
