//! Error types and exit codes for vault-transfer.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes used by the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const FILE_EXISTS: i32 = 3;
    pub const DIRECTORY_MISSING: i32 = 4;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const INVALID_SETTINGS: i32 = 6;
}

/// Main error type for transfer operations.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Target vault has not been set.")]
    InvalidSettings,

    #[error("Directory does not exist at {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("File already exists at {}", .0.display())]
    FileExists(PathBuf),

    #[error("Not found in vault: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Vault not found at: {}", .0.display())]
    VaultNotFound(PathBuf),

    #[error("Invalid frontmatter in {}: {message}", path.display())]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Trash error: {0}")]
    Trash(#[from] trash::Error),

    #[error("{0}")]
    Other(String),
}

impl TransferError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TransferError::InvalidSettings => exit_code::INVALID_SETTINGS,
            TransferError::DirectoryMissing(_) => exit_code::DIRECTORY_MISSING,
            TransferError::FileExists(_) => exit_code::FILE_EXISTS,
            TransferError::NotFound(_) | TransferError::VaultNotFound(_) => exit_code::NOT_FOUND,
            TransferError::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for transfer operations.
pub type Result<T> = std::result::Result<T, TransferError>;
