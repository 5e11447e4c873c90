//! CLI argument definitions using clap.

use crate::config::{TransferSettings, parse_remove_paths};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vault-transfer")]
#[command(author, version, about = "Transfer notes and their attachments to another vault", long_about = None)]
pub struct Cli {
    /// Path to the source vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config file to load instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress notices
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }

    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

/// Flags overriding the configured transfer settings.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Root folder of the other vault
    #[arg(long, global = true)]
    pub target: Option<String>,

    /// Folder inside the other vault (may contain {{DATE}} variables)
    #[arg(long, global = true)]
    pub subfolder: Option<String>,

    /// Recreate the source folder structure in the other vault
    #[arg(long, global = true)]
    pub recreate_tree: bool,

    /// Create the output folder when it does not exist
    #[arg(long, global = true)]
    pub create_folder: bool,

    /// Replace files that already exist in the other vault
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// Leave the original note as it is instead of replacing it with a link
    #[arg(long, global = true)]
    pub no_link: bool,

    /// Delete the original after copying (ignored unless --no-link)
    #[arg(long, global = true)]
    pub delete_original: bool,

    /// Delete to the system trash instead of the vault's .trash folder
    #[arg(long, global = true)]
    pub system_trash: bool,

    /// Tag added to the original after the transfer
    #[arg(long, global = true)]
    pub tag: Option<String>,

    /// Folders stripped from the path when recreating the tree (comma separated, repeatable)
    #[arg(long, global = true)]
    pub remove_path: Vec<String>,
}

impl SettingsArgs {
    /// Apply the flags on top of the configured settings.
    pub fn apply(&self, settings: &mut TransferSettings) {
        if let Some(ref target) = self.target {
            settings.target_root = target.clone();
        }
        if let Some(ref subfolder) = self.subfolder {
            settings.target_subfolder = subfolder.clone();
        }
        if self.recreate_tree {
            settings.recreate_tree = true;
        }
        if self.create_folder {
            settings.automatic_create_output_folder = true;
        }
        if self.overwrite {
            settings.overwrite = true;
        }
        if self.no_link {
            settings.create_link = false;
        }
        if self.delete_original {
            settings.delete_original = true;
        }
        if self.system_trash {
            settings.move_to_system_trash = true;
        }
        if let Some(ref tag) = self.tag {
            settings.tag = Some(tag.clone());
        }
        if !self.remove_path.is_empty() {
            settings.remove_path = self
                .remove_path
                .iter()
                .flat_map(|value| parse_remove_paths(value))
                .collect();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfer a note and its attachments
    Note(NoteArgs),

    /// Transfer every file in a folder
    Folder(FolderArgs),

    /// Print the link to a note in the other vault
    Link(LinkArgs),
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Path to the note within the vault
    pub path: String,

    /// Folder to copy into (relative paths are inside the other vault)
    #[arg(long)]
    pub to: Option<PathBuf>,

    /// Create the --to folder first
    #[arg(long, requires = "to")]
    pub mkdir: bool,

    /// Show where the note and its attachments would go without copying
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Path to the folder within the vault (`/` for the whole vault)
    pub path: String,

    /// Folder to copy into (relative paths are inside the other vault)
    #[arg(long)]
    pub to: Option<PathBuf>,

    /// Create the --to folder first
    #[arg(long, requires = "to")]
    pub mkdir: bool,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Path to the note within the vault
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_command() {
        let cli = Cli::try_parse_from([
            "vault-transfer",
            "--vault",
            "/v",
            "note",
            "Inbox/a",
            "--target",
            "/other",
            "--no-link",
            "--to",
            "Chosen",
        ])
        .unwrap();
        assert_eq!(cli.vault, Some(PathBuf::from("/v")));
        assert_eq!(cli.settings.target.as_deref(), Some("/other"));
        assert!(cli.settings.no_link);
        let Commands::Note(args) = cli.command else {
            panic!("expected note command");
        };
        assert_eq!(args.path, "Inbox/a");
        assert_eq!(args.to, Some(PathBuf::from("Chosen")));
    }

    #[test]
    fn test_apply_overrides_settings() {
        let args = SettingsArgs {
            target: Some("/other".to_string()),
            no_link: true,
            delete_original: true,
            remove_path: vec!["Drafts, Old".to_string(), "Inbox".to_string()],
            ..Default::default()
        };
        let mut settings = TransferSettings {
            target_subfolder: "Kept".to_string(),
            ..Default::default()
        };
        args.apply(&mut settings);
        assert_eq!(settings.target_root, "/other");
        assert_eq!(settings.target_subfolder, "Kept");
        assert!(!settings.create_link);
        assert!(settings.delete_original);
        assert_eq!(settings.remove_path, vec!["Drafts", "Old", "Inbox"]);
    }

    #[test]
    fn test_mkdir_requires_to() {
        let result = Cli::try_parse_from(["vault-transfer", "folder", "P", "--mkdir"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::try_parse_from(["vault-transfer", "-vv", "link", "a"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
    }
}
