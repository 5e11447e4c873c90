//! The transfer engine.
//!
//! A [`Transfer`] borrows a host and a notifier for the length of one
//! operation. It copies a note or a folder tree into another vault, with
//! the note's attachments, and then applies the configured post-copy action
//! to the original.

pub mod attachments;
pub mod conflict;
pub mod date;
mod executor;
mod folder;
pub mod link;
pub mod path;

pub use attachments::list_attachments;
pub use conflict::{ConflictDecision, check_destination};
pub use folder::{FileReport, FolderTransferReport};
pub use link::{create_vault_file_link, insert_link_to_other_vault};
pub use path::{PathResolver, resolve_note_destination};

use crate::host::{Notifier, VaultHost};

/// Runs transfers against a host.
pub struct Transfer<'a, H: VaultHost + ?Sized> {
    host: &'a H,
    notifier: &'a dyn Notifier,
}

impl<'a, H: VaultHost + ?Sized> Transfer<'a, H> {
    pub fn new(host: &'a H, notifier: &'a dyn Notifier) -> Self {
        Self { host, notifier }
    }

    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
        self.notifier.notice(message);
    }
}
