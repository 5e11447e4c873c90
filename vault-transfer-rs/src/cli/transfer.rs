//! Note, folder and link commands.

use crate::cli::args::{FolderArgs, LinkArgs, NoteArgs};
use crate::cli::output::{DryRunResponse, Output, PlannedCopy};
use crate::config::TransferSettings;
use crate::error::{Result, exit_code};
use crate::transfer::link::link_for_note;
use crate::transfer::path::{PathResolver, clean_path, clean_root};
use crate::transfer::{Transfer, list_attachments};
use crate::types::{NoteRef, TransferOutcome};
use crate::vault::Vault;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub path: String,
    #[serde(flatten)]
    pub outcome: TransferOutcome,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub path: String,
    pub link: String,
}

/// Resolve `--to` against the other vault and create it when asked.
fn explicit_destination(
    to: Option<&Path>,
    mkdir: bool,
    settings: &TransferSettings,
) -> Result<Option<PathBuf>> {
    let Some(to) = to else {
        return Ok(None);
    };

    let destination = if to.is_absolute() {
        to.to_path_buf()
    } else {
        settings.validate()?;
        PathBuf::from(clean_root(&settings.target_root)).join(to)
    };

    if mkdir {
        tracing::info!("creating {}", destination.display());
        std::fs::create_dir_all(&destination)?;
    }
    Ok(Some(destination))
}

pub fn note(
    vault: &Vault,
    settings: &TransferSettings,
    args: &NoteArgs,
    output: &Output,
) -> Result<i32> {
    let note = vault.file(&args.path)?;
    let explicit = explicit_destination(args.to.as_deref(), args.mkdir, settings)?;

    if args.dry_run {
        return dry_run(vault, &note, settings, explicit.as_deref(), output);
    }

    let outcome = Transfer::new(vault, output).transfer_note(
        None,
        &note,
        settings,
        false,
        explicit.as_deref(),
    );
    let code = outcome.exit_code();
    output.print(&NoteResponse {
        path: note.path_str(),
        outcome,
    })?;
    Ok(code)
}

fn dry_run(
    vault: &Vault,
    note: &NoteRef,
    settings: &TransferSettings,
    explicit: Option<&Path>,
    output: &Output,
) -> Result<i32> {
    settings.validate()?;
    let resolver = PathResolver::for_note(vault, note, settings, explicit);
    let destination = resolver.destination_for(note)?;

    let mut attachments = Vec::new();
    for attachment in list_attachments(vault, note)? {
        let source = attachment.path.to_string_lossy().into_owned();
        let planned = resolver.destination_for(&NoteRef::from(attachment))?;
        attachments.push(PlannedCopy {
            source,
            destination: planned.file.to_string_lossy().into_owned(),
        });
    }

    output.print(&DryRunResponse {
        action: "transfer".to_string(),
        source: note.path_str(),
        destination: destination.file.to_string_lossy().into_owned(),
        attachments,
    })?;
    Ok(exit_code::SUCCESS)
}

pub fn folder(
    vault: &Vault,
    settings: &TransferSettings,
    args: &FolderArgs,
    output: &Output,
) -> Result<i32> {
    let folder = vault.folder(Path::new(&clean_path(&args.path)))?;
    let explicit = explicit_destination(args.to.as_deref(), args.mkdir, settings)?;

    let report = Transfer::new(vault, output).transfer_folder(&folder, settings, explicit.as_deref());
    output.print(&report)?;
    Ok(report.exit_code())
}

pub fn link(
    vault: &Vault,
    settings: &TransferSettings,
    args: &LinkArgs,
    output: &Output,
) -> Result<i32> {
    let note = vault.file(&args.path)?;
    let link = link_for_note(&note, settings)?;
    output.print(&LinkResponse {
        path: note.path_str(),
        link,
    })?;
    Ok(exit_code::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_destination_relative_to_target() {
        let settings = TransferSettings {
            target_root: "/Vaults/Second/".to_string(),
            ..Default::default()
        };
        let resolved = explicit_destination(Some(Path::new("Inbox")), false, &settings).unwrap();
        assert_eq!(resolved, Some(PathBuf::from("/Vaults/Second/Inbox")));

        let absolute = explicit_destination(Some(Path::new("/elsewhere")), false, &settings).unwrap();
        assert_eq!(absolute, Some(PathBuf::from("/elsewhere")));

        assert_eq!(explicit_destination(None, false, &settings).unwrap(), None);
    }

    #[test]
    fn test_relative_destination_needs_target() {
        let result = explicit_destination(Some(Path::new("Inbox")), false, &TransferSettings::default());
        assert!(result.is_err());
    }
}
