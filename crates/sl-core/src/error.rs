//! Error types for sl-core

use thiserror::Error;

/// Core error type for Sluice
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error with file path context
    #[error("[E003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E004: YAML parse error (config or catalog file)
    #[error("[E004] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E005: Identifier could not be parsed
    #[error("[E005] Invalid identifier '{raw}': {reason}")]
    InvalidIdentifier { raw: String, reason: String },

    /// E006: Database missing from the schema catalog
    #[error("[E006] Database '{name}' not found in catalog")]
    DatabaseNotFound { name: String },

    /// E007: Unknown masking level name
    #[error("[E007] Unknown masking level '{0}', expected none, partial or full")]
    UnknownMaskingLevel(String),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
