//! Vault-local and system trash.
//!
//! The vault trash is the `.trash` folder at the vault root, as Obsidian uses
//! it. The system trash is whatever the platform provides, reached through
//! the `trash` crate.

use crate::error::{Result, TransferError};
use std::fs;
use std::path::{Path, PathBuf};

pub const VAULT_TRASH_DIR: &str = ".trash";

/// Pick a name in `dir` that does not exist yet.
///
/// `note.md` becomes `note 1.md`, `note 2.md`, and so on.
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{} {}.{}", stem, n, ext)),
            None => dir.join(format!("{} {}", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

fn item_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| TransferError::Other(format!("Cannot trash {}", path.display())))
}

/// Move a file, falling back to copy and delete across filesystems.
fn move_item(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if from.is_file() => {
            tracing::debug!("rename failed ({}), copying {} instead", e, from.display());
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Move an item into `dir` under a name that is still free.
pub fn move_into(dir: &Path, path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(TransferError::NotFound(path.to_path_buf()));
    }
    fs::create_dir_all(dir)?;
    let destination = unique_destination(dir, &item_name(path)?);

    move_item(path, &destination)?;
    tracing::debug!("moved {} to {}", path.display(), destination.display());
    Ok(destination)
}

/// Move a vault item into the vault's `.trash` folder.
pub fn move_to_vault_trash(vault_root: &Path, relative: &Path) -> Result<PathBuf> {
    let source = vault_root.join(relative);
    if !source.exists() {
        return Err(TransferError::NotFound(relative.to_path_buf()));
    }
    move_into(&vault_root.join(VAULT_TRASH_DIR), &source)
}

/// Move an item into the platform's trash.
pub fn move_to_system_trash(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(TransferError::NotFound(path.to_path_buf()));
    }
    trash::delete(path)?;
    tracing::debug!("moved {} to the system trash", path.display());
    Ok(())
}
