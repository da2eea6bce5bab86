//! Error types for Blogwiz

use thiserror::Error;

use crate::platforms::Platform;

pub type Result<T> = std::result::Result<T, BlogwizError>;

#[derive(Error, Debug)]
pub enum BlogwizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl BlogwizError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BlogwizError::InvalidInput(_) => 3,
            BlogwizError::Format(FormatError::InvalidConfig { .. }) => 2,
            BlogwizError::Format(_) => 1,
            BlogwizError::Config(_) => 1,
            BlogwizError::Storage(_) => 1,
            BlogwizError::File(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone)]
pub enum FormatError {
    #[error("{platform} settings are incomplete (missing: {})", .missing.join(", "))]
    InvalidConfig {
        platform: Platform,
        missing: Vec<String>,
    },

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Markup rewrite failed: {0}")]
    Markup(String),

    #[error("Payload encoding failed: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to save file: {0}")]
    Save(String),

    #[error("Failed to load file: {0}")]
    Load(String),

    #[error("Not a valid archive: {0}")]
    Parse(#[from] serde_json::Error),
}
