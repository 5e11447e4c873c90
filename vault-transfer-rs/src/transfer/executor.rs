//! Single note transfer.

use super::Transfer;
use crate::config::TransferSettings;
use crate::error::{Result, TransferError};
use crate::host::{Editor, VaultHost};
use crate::parser::{add_tag, remove_tag, render_frontmatter};
use crate::transfer::attachments::copy_attachments;
use crate::transfer::conflict::{ConflictDecision, WrittenFiles, check_destination};
use crate::transfer::link::{create_vault_file_link, insert_link_to_other_vault};
use crate::transfer::path::PathResolver;
use crate::types::{NoteRef, TransferOutcome};
use serde_yaml::Mapping;
use std::path::Path;

/// What happens to the original once its copy is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostAction {
    Link,
    Delete,
    Keep,
}

impl PostAction {
    fn for_note(note: &NoteRef, settings: &TransferSettings, is_recursive: bool) -> Self {
        if settings.create_link {
            if note.is_markdown() {
                PostAction::Link
            } else {
                PostAction::Keep
            }
        } else if settings.delete_original && !is_recursive {
            PostAction::Delete
        } else {
            PostAction::Keep
        }
    }
}

impl<'a, H: VaultHost + ?Sized> Transfer<'a, H> {
    /// Copy one note, with its attachments, into the other vault.
    ///
    /// Never fails: every problem becomes a notice and an outcome. With
    /// `is_recursive` set the progress notice is left to the caller and the
    /// original is never deleted.
    pub fn transfer_note(
        &self,
        editor: Option<&mut dyn Editor>,
        note: &NoteRef,
        settings: &TransferSettings,
        is_recursive: bool,
        explicit: Option<&Path>,
    ) -> TransferOutcome {
        self.transfer_note_in(editor, note, settings, is_recursive, explicit, &mut WrittenFiles::new())
    }

    /// Like [`Transfer::transfer_note`], sharing the destinations already
    /// written by the surrounding operation.
    pub(super) fn transfer_note_in(
        &self,
        editor: Option<&mut dyn Editor>,
        note: &NoteRef,
        settings: &TransferSettings,
        is_recursive: bool,
        explicit: Option<&Path>,
        written: &mut WrittenFiles,
    ) -> TransferOutcome {
        match self.try_transfer_note(editor, note, settings, is_recursive, explicit, written) {
            Ok(outcome) => {
                tracing::debug!("{}: {:?}", note.path_str(), outcome);
                outcome
            }
            Err(e) => self.failure_outcome(e),
        }
    }

    /// Insert a link to the note's counterpart in the other vault.
    ///
    /// Returns the inserted link, or `None` after a notice when the
    /// settings are incomplete.
    pub fn insert_link_to_other_vault(
        &self,
        editor: &mut dyn Editor,
        note: &NoteRef,
        settings: &TransferSettings,
    ) -> Option<String> {
        match insert_link_to_other_vault(editor, note, settings) {
            Ok(link) => Some(link),
            Err(e) => {
                self.notify(&format!("Error: {}", e));
                None
            }
        }
    }

    pub(super) fn failure_outcome(&self, error: TransferError) -> TransferOutcome {
        match error {
            TransferError::InvalidSettings => {
                self.notify(&format!("Error: {}", error));
                TransferOutcome::AbortedInvalidSettings
            }
            TransferError::DirectoryMissing(_) => {
                self.notify(&format!("Error: {}", error));
                TransferOutcome::AbortedNoTargetFolder
            }
            TransferError::FileExists(_) => {
                self.notify(&format!("Error: {}", error));
                TransferOutcome::SkippedExists
            }
            other => {
                self.notify(&format!("Error copying file: {}", other));
                TransferOutcome::FailedIo {
                    message: other.to_string(),
                }
            }
        }
    }

    fn try_transfer_note(
        &self,
        editor: Option<&mut dyn Editor>,
        note: &NoteRef,
        settings: &TransferSettings,
        is_recursive: bool,
        explicit: Option<&Path>,
        written: &mut WrittenFiles,
    ) -> Result<TransferOutcome> {
        settings.validate()?;

        let resolver = PathResolver::for_note(self.host, note, settings, explicit);
        let destination = resolver.destination_for(note)?;
        resolver.prepare(self.host, &destination)?;

        if !is_recursive {
            self.notify(&format!(
                "Copying {} to {}",
                note.path_str(),
                destination.file.display()
            ));
        }

        if written.already_copied(&destination.file, &note.path)? {
            tracing::debug!("{} was already copied as an attachment", note.path_str());
            return Ok(TransferOutcome::CopiedUnchanged);
        }

        let decision = check_destination(self.host, &destination, settings)?;

        let action = PostAction::for_note(note, settings, is_recursive);
        let tag = settings
            .tag_name()
            .filter(|_| note.is_markdown() && action != PostAction::Delete);

        // The copy must not carry the marker tag
        if let Some(tag) = tag {
            self.host
                .process_frontmatter(&note.path, &mut |map| remove_tag(map, tag))?;
        }

        copy_attachments(self.host, note, &resolver, settings, written);

        if decision == ConflictDecision::ProceedAfterRemoval {
            self.host.remove_target(&destination.file)?;
        }
        let bytes = self.host.read_bytes(&note.path)?;
        self.host.write_target(&destination.file, &bytes)?;
        written.record(destination.file.clone(), note.path.clone());

        match action {
            PostAction::Link => {
                let link = create_vault_file_link(&note.basename, &settings.target_root);
                let content = match tag {
                    Some(tag) => {
                        let mut map = Mapping::new();
                        add_tag(&mut map, tag);
                        render_frontmatter(&map, &link)?
                    }
                    None => link,
                };
                match editor {
                    Some(editor) => editor.set_value(&content),
                    None => self.host.write_note(&note.path, &content)?,
                }
                Ok(TransferOutcome::CopiedWithLink)
            }
            PostAction::Delete => {
                self.host.trash(&note.path, settings.move_to_system_trash)?;
                Ok(TransferOutcome::CopiedWithDelete)
            }
            PostAction::Keep => {
                if let Some(tag) = tag {
                    self.host
                        .process_frontmatter(&note.path, &mut |map| add_tag(map, tag))?;
                }
                Ok(TransferOutcome::CopiedUnchanged)
            }
        }
    }
}
