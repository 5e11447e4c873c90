//! Transfer settings and the config file that carries them.

use crate::error::{Result, TransferError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which date feeds `{{...}}` variables in output paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    /// A date stored under a frontmatter key.
    #[default]
    Frontmatter,
    /// The file creation time.
    Creation,
    /// The last modification time.
    Modification,
}

/// Date variable resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateVariable {
    #[serde(rename = "type")]
    pub kind: DateKind,
    /// Used when the frontmatter key is absent or unparseable.
    pub fallback: Option<DateKind>,
    pub frontmatter_key: Option<String>,
}

impl Default for DateVariable {
    fn default() -> Self {
        Self {
            kind: DateKind::Frontmatter,
            fallback: None,
            frontmatter_key: Some("date".to_string()),
        }
    }
}

impl DateVariable {
    /// The frontmatter key to read, defaulting to `date`.
    pub fn key(&self) -> &str {
        self.frontmatter_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or("date")
    }
}

/// Rewrites part of a source path when the folder tree is recreated.
///
/// `source_path` wrapped in slashes (`/regex/`) is a regular expression,
/// otherwise a literal. Both match case-insensitively. The replacement may
/// contain date variables such as `{{YYYY-MM-DD}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverridePath {
    pub source_path: String,
    pub replacement: String,
}

/// Settings for a single transfer operation.
///
/// Owned by the host; the transfer engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Full path to the other vault's root folder.
    pub target_root: String,
    /// Folder within the other vault to copy into.
    pub target_subfolder: String,
    pub automatic_create_output_folder: bool,
    pub create_link: bool,
    /// Only applies when `create_link` is false.
    pub delete_original: bool,
    /// Only applies when `delete_original` is true.
    pub move_to_system_trash: bool,
    /// When false, files already present in the other vault are skipped.
    pub overwrite: bool,
    /// Recreate the source folder structure in the other vault.
    pub recreate_tree: bool,
    pub override_paths: Vec<OverridePath>,
    pub remove_path: Vec<String>,
    /// Tag added to the original note after a transfer.
    pub tag: Option<String>,
    pub date_variable: DateVariable,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            target_root: String::new(),
            target_subfolder: String::new(),
            automatic_create_output_folder: false,
            create_link: true,
            delete_original: false,
            move_to_system_trash: false,
            overwrite: false,
            recreate_tree: false,
            override_paths: Vec::new(),
            remove_path: Vec::new(),
            tag: None,
            date_variable: DateVariable::default(),
        }
    }
}

impl TransferSettings {
    /// Check the settings needed before any filesystem access.
    pub fn validate(&self) -> Result<()> {
        if self.target_root.trim().is_empty() {
            return Err(TransferError::InvalidSettings);
        }
        Ok(())
    }

    /// The configured tag without a leading `#`, if any.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag
            .as_deref()
            .map(|t| t.trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty())
    }
}

/// Split a comma or newline separated list of folders to remove.
pub fn parse_remove_paths(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.replace('\\', "/"))
        .collect()
}

/// On-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default source vault.
    pub vault: Option<PathBuf>,
    pub transfer: TransferSettings,
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vault-transfer").join("config.toml"))
    }

    /// Load the config from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TransferError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Pick the source vault: CLI flag first, then config, then the current directory.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        if let Some(ref path) = self.vault {
            return Ok(path.clone());
        }
        Ok(std::env::current_dir()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plugin() {
        let settings = TransferSettings::default();
        assert!(settings.create_link);
        assert!(!settings.delete_original);
        assert!(!settings.overwrite);
        assert!(!settings.recreate_tree);
        assert_eq!(settings.date_variable.key(), "date");
    }

    #[test]
    fn test_validate_requires_target_root() {
        let mut settings = TransferSettings::default();
        assert!(matches!(settings.validate(), Err(TransferError::InvalidSettings)));

        settings.target_root = "   ".to_string();
        assert!(settings.validate().is_err());

        settings.target_root = "/vaults/other".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_tag_name_strips_hash() {
        let settings = TransferSettings {
            tag: Some("#transferred".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.tag_name(), Some("transferred"));

        let empty = TransferSettings {
            tag: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(empty.tag_name(), None);
    }

    #[test]
    fn test_parse_remove_paths() {
        let parsed = parse_remove_paths("Drafts, Archive\\Old\n\n ,Inbox ");
        assert_eq!(parsed, vec!["Drafts", "Archive/Old", "Inbox"]);
    }

    #[test]
    fn test_config_from_toml() {
        let raw = r#"
vault = "/home/me/Main"

[transfer]
target_root = "/home/me/Second"
target_subfolder = "Inbox/{{YYYY}}"
recreate_tree = true
remove_path = ["Drafts"]
tag = "moved"

[[transfer.override_paths]]
source_path = "/^Projects/"
replacement = "Archive"

[transfer.date_variable]
type = "modification"
"#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.vault, Some(PathBuf::from("/home/me/Main")));
        assert_eq!(config.transfer.target_root, "/home/me/Second");
        assert!(config.transfer.recreate_tree);
        assert!(config.transfer.create_link);
        assert_eq!(config.transfer.override_paths.len(), 1);
        assert_eq!(config.transfer.date_variable.kind, DateKind::Modification);
    }

    #[test]
    fn test_resolve_vault_path_prefers_cli() {
        let config = Config {
            vault: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_vault_path(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.resolve_vault_path(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
