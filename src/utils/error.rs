use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Failed to read XML file {path}: {reason}")]
    FileLoad { path: String, reason: String },

    #[error("Failed to convert //SRVD/LG value to float in file {path}: {source}")]
    LengthParse {
        path: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl TallyError {
    pub fn file_load(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::FileLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the per-file and per-leg failures the pipeline logs and skips.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FileLoad { .. } | Self::LengthParse { .. })
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
