//! vault-transfer - Copy notes and folders between Obsidian-style vaults.
//!
//! # Overview
//!
//! A transfer copies a note, together with the attachments it embeds or
//! links to, from one vault into another. Afterwards the original can be
//! replaced with an `obsidian://` link to the copy, moved to the trash, or
//! left as it is. Folder transfers apply the same rules to every file below
//! a folder.
//!
//! The engine talks to its surroundings through the [`VaultHost`],
//! [`Notifier`] and [`Editor`] traits; [`Vault`] implements [`VaultHost`]
//! for a vault on the local filesystem.
//!
//! # Example
//!
//! ```no_run
//! use vault_transfer::{LogNotifier, Transfer, TransferSettings, Vault};
//!
//! let vault = Vault::new("/path/to/vault").unwrap();
//! let settings = TransferSettings {
//!     target_root: "/path/to/other".to_string(),
//!     ..Default::default()
//! };
//!
//! let note = vault.file("Inbox/Meeting").unwrap();
//! let outcome = Transfer::new(&vault, &LogNotifier).transfer_note(None, &note, &settings, false, None);
//! println!("{:?}", outcome);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod parser;
pub mod transfer;
pub mod trash;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use config::{Config, TransferSettings};
pub use error::{Result, TransferError};
pub use host::{Editor, LogNotifier, Notifier, RecordingNotifier, TextBuffer, VaultHost};
pub use transfer::{FolderTransferReport, Transfer};
pub use types::*;
pub use vault::Vault;
