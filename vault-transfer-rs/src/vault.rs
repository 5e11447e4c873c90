//! A vault on the local filesystem.

use crate::error::{Result, TransferError};
use crate::host::{FileTimes, VaultHost};
use crate::parser::{self, strip_fragment};
use crate::trash;
use crate::types::{FolderRef, NoteRef, VaultEntry, path_to_slash};
use chrono::NaiveDateTime;
use glob::glob;
use serde_yaml::Mapping;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use unicode_normalization::UnicodeNormalization;

/// Represents an Obsidian vault rooted at a directory.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
    /// Folder standing in for the platform trash.
    system_trash: Option<PathBuf>,
}

impl Vault {
    /// Open a vault at an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(TransferError::VaultNotFound(root));
        }

        Ok(Self {
            root,
            system_trash: None,
        })
    }

    /// Move system-trashed items into `dir` instead of the platform trash.
    pub fn with_system_trash(mut self, dir: impl Into<PathBuf>) -> Self {
        self.system_trash = Some(dir.into());
        self
    }

    /// Name of the vault (its folder name).
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Get the full path to a vault item.
    pub fn full_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Check if a file exists in the vault.
    pub fn file_exists(&self, relative_path: &Path) -> bool {
        self.full_path(relative_path).is_file()
    }

    /// Look up a file given as a vault path, with or without `.md`.
    pub fn file(&self, query: &str) -> Result<NoteRef> {
        let query = query.trim().trim_start_matches(['/', '\\']).replace('\\', "/");
        let exact = PathBuf::from(&query);
        if self.file_exists(&exact) {
            return Ok(NoteRef::new(exact));
        }

        let with_ext = PathBuf::from(format!("{}.md", query));
        if self.file_exists(&with_ext) {
            return Ok(NoteRef::new(with_ext));
        }

        Err(TransferError::NotFound(exact))
    }

    /// Load a folder and everything below it.
    pub fn folder(&self, relative_path: &Path) -> Result<FolderRef> {
        if !self.full_path(relative_path).is_dir() {
            return Err(TransferError::NotFound(relative_path.to_path_buf()));
        }
        crate::host::load_folder_tree(self, relative_path)
    }

    /// List every file in the vault, hidden entries excluded.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.root.join("**").join("*");
        let pattern_str = pattern.to_string_lossy();

        let mut files = Vec::new();
        for entry in glob(&pattern_str)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        if !is_hidden(relative) {
                            files.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_text(&self, relative_path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(self.full_path(relative_path))?)
    }

    /// Resolve a link against an already listed set of vault files.
    ///
    /// Resolution order, as Obsidian does it:
    /// 1. `./` and `../` links relative to the source note's folder
    /// 2. Exact vault path
    /// 3. Path relative to the source note's folder
    /// 4. Files whose path ends with the link; same folder first, then shortest
    fn resolve_among(&self, files: &[PathBuf], link: &str, source: &Path) -> Option<NoteRef> {
        let link = strip_fragment(link).replace('\\', "/");
        if link.is_empty() {
            return None;
        }

        let link = if Path::new(&link).extension().is_some() {
            link
        } else {
            format!("{}.md", link)
        };

        let source_dir = source.parent().unwrap_or(Path::new(""));

        if link.starts_with("./") || link.starts_with("../") {
            let relative = normalize_relative(&source_dir.join(&link))?;
            return self.file_exists(&relative).then(|| NoteRef::new(relative));
        }

        let wanted = comparable(Path::new(link.trim_start_matches('/')));

        if let Some(found) = files.iter().find(|f| comparable(f) == wanted) {
            return Some(NoteRef::new(found.clone()));
        }

        let beside = comparable(&source_dir.join(&link));
        if let Some(found) = files.iter().find(|f| comparable(f) == beside) {
            return Some(NoteRef::new(found.clone()));
        }

        let suffix = format!("/{}", wanted);
        let mut candidates: Vec<&PathBuf> = files
            .iter()
            .filter(|f| comparable(f).ends_with(&suffix))
            .collect();
        candidates.sort_by_key(|f| {
            let same_folder = f.parent() == Some(source_dir);
            (!same_folder, f.components().count(), path_to_slash(f))
        });
        candidates.first().map(|f| NoteRef::new((*f).clone()))
    }
}

fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

/// Collapse `.` and `..` in a vault-relative path.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.iter().collect())
}

fn comparable(path: &Path) -> String {
    path_to_slash(path).nfc().collect::<String>().to_lowercase()
}

fn to_naive(time: std::io::Result<SystemTime>) -> Option<NaiveDateTime> {
    time.ok()
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).naive_local())
}

impl VaultHost for Vault {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !self.file_exists(path) {
            return Err(TransferError::NotFound(path.to_path_buf()));
        }
        Ok(std::fs::read(self.full_path(path))?)
    }

    fn write_note(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(full_path, content)?;
        Ok(())
    }

    fn frontmatter(&self, path: &Path) -> Result<Option<Mapping>> {
        let content = self.read_text(path)?;
        parser::parse_frontmatter(&content, path)
    }

    fn process_frontmatter(
        &self,
        path: &Path,
        edit: &mut dyn FnMut(&mut Mapping) -> bool,
    ) -> Result<()> {
        let content = self.read_text(path)?;
        let mut map = parser::parse_frontmatter(&content, path)?.unwrap_or_default();

        if !edit(&mut map) {
            return Ok(());
        }

        let body = parser::split_frontmatter(&content).body;
        let updated = parser::render_frontmatter(&map, body)?;
        self.write_note(path, &updated)
    }

    fn list_children(&self, folder: &Path) -> Result<Vec<VaultEntry>> {
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(self.full_path(folder))? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let relative = folder.join(&name);
            if entry.file_type()?.is_dir() {
                entries.push(VaultEntry::Folder(FolderRef {
                    path: relative,
                    name,
                    children: Vec::new(),
                }));
            } else {
                entries.push(VaultEntry::File(NoteRef::new(relative)));
            }
        }

        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    fn trash(&self, path: &Path, system: bool) -> Result<()> {
        if system {
            let full_path = self.full_path(path);
            match self.system_trash {
                Some(ref dir) => {
                    trash::move_into(dir, &full_path)?;
                }
                None => trash::move_to_system_trash(&full_path)?,
            }
        } else {
            trash::move_to_vault_trash(&self.root, path)?;
        }
        Ok(())
    }

    fn resolve_link(&self, link: &str, source: &Path) -> Option<NoteRef> {
        let files = self.list_files().ok()?;
        self.resolve_among(&files, link, source)
    }

    fn resolve_links(&self, links: &[&str], source: &Path) -> Vec<Option<NoteRef>> {
        match self.list_files() {
            Ok(files) => links
                .iter()
                .map(|link| self.resolve_among(&files, link, source))
                .collect(),
            Err(e) => {
                tracing::warn!("cannot list vault files: {}", e);
                vec![None; links.len()]
            }
        }
    }

    fn linked_targets(&self, note: &Path) -> Result<Vec<String>> {
        if !NoteRef::new(note).is_markdown() {
            return Ok(Vec::new());
        }
        let content = self.read_text(note)?;
        Ok(parser::linked_targets(&content))
    }

    fn file_times(&self, path: &Path) -> Result<FileTimes> {
        let metadata = std::fs::metadata(self.full_path(path))?;
        Ok(FileTimes {
            created: to_naive(metadata.created()),
            modified: to_naive(metadata.modified()),
        })
    }
}
