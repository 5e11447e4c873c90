//! Attachments a note embeds or links to.

use crate::config::TransferSettings;
use crate::error::Result;
use crate::host::VaultHost;
use crate::parser::strip_fragment;
use crate::transfer::conflict::WrittenFiles;
use crate::transfer::path::PathResolver;
use crate::types::{AttachmentRef, NoteRef};
use std::collections::HashSet;
use std::path::PathBuf;

/// The non-note files a note links to or embeds, each reported once.
///
/// Targets that do not resolve are skipped.
pub fn list_attachments<'h, H: VaultHost + ?Sized>(
    host: &'h H,
    note: &NoteRef,
) -> Result<impl Iterator<Item = AttachmentRef> + 'h> {
    let targets = host.linked_targets(&note.path)?;
    let links: Vec<&str> = targets.iter().map(|t| strip_fragment(t)).collect();
    let resolved = host.resolve_links(&links, &note.path);
    let source = note.path.clone();
    let mut seen = HashSet::new();

    Ok(resolved.into_iter().flatten().filter_map(move |resolved| {
        if resolved.is_markdown() || resolved.path == source {
            return None;
        }
        if !seen.insert(resolved.path.clone()) {
            return None;
        }
        Some(AttachmentRef {
            path: resolved.path,
            name: resolved.name,
        })
    }))
}

/// Copy a note's attachments next to where the note goes.
///
/// Best effort: a failing attachment is logged and the rest still copy.
/// Every copy is recorded in `written`. Returns the destinations written.
pub fn copy_attachments<H: VaultHost + ?Sized>(
    host: &H,
    note: &NoteRef,
    resolver: &PathResolver<'_>,
    settings: &TransferSettings,
    written: &mut WrittenFiles,
) -> Vec<PathBuf> {
    let attachments = match list_attachments(host, note) {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::warn!("cannot list attachments of {}: {}", note.path_str(), e);
            return Vec::new();
        }
    };

    let mut copied = Vec::new();
    for attachment in attachments {
        let source = attachment.path.clone();
        match copy_attachment(host, attachment, resolver, settings, written) {
            Ok(Some(destination)) => {
                written.record(destination.clone(), source);
                copied.push(destination);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("failed to copy attachment {}: {}", source.display(), e),
        }
    }
    copied
}

fn copy_attachment<H: VaultHost + ?Sized>(
    host: &H,
    attachment: AttachmentRef,
    resolver: &PathResolver<'_>,
    settings: &TransferSettings,
    written: &WrittenFiles,
) -> Result<Option<PathBuf>> {
    let file = NoteRef::from(attachment);
    let destination = resolver.destination_for(&file)?;
    if written.already_copied(&destination.file, &file.path)? {
        return Ok(None);
    }

    if !host.target_is_dir(&destination.directory) {
        host.create_target_dir(&destination.directory)?;
    }

    if host.target_exists(&destination.file) {
        if !settings.overwrite {
            tracing::debug!("attachment {} already exists, skipping", destination.file.display());
            return Ok(None);
        }
        host.remove_target(&destination.file)?;
    }

    let bytes = host.read_bytes(&file.path)?;
    host.write_target(&destination.file, &bytes)?;
    tracing::debug!("copied attachment {} to {}", file.path_str(), destination.file.display());
    Ok(Some(destination.file))
}
