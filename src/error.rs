use std::io;
use thiserror::Error;
use zip::result::ZipError;

/// Result type for zipper operations
pub type Result<T> = std::result::Result<T, ZipperError>;

/// Unified error type for all zipper operations
#[derive(Debug, Error)]
pub enum ZipperError {
    // Table errors
    #[error("Entry not found in table: {0}")]
    NotFound(String),

    #[error("Invalid mask pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    // Pack errors
    #[error("Source for {name} is unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },

    #[error("Failed to copy {name} into archive: {source}")]
    Copy { name: String, source: io::Error },

    #[error("Archive codec rejected entry {name}: {source}")]
    Codec { name: String, source: ZipError },

    #[error("Failed to finalize archive: {0}")]
    Finalize(#[source] ZipError),

    // Source archive errors
    #[error("Invalid source archive: {0}")]
    Archive(#[from] ZipError),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // Configuration errors
    #[error("Invalid pack options: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ZipperError {
    /// Classify a codec failure while framing `name`.
    ///
    /// I/O failures on the destination surface as [`ZipperError::Copy`], anything the codec
    /// itself refuses surfaces as [`ZipperError::Codec`].
    pub(crate) fn framing(name: &str, err: ZipError) -> Self {
        match err {
            ZipError::Io(source) => ZipperError::Copy {
                name: name.to_string(),
                source,
            },
            other => ZipperError::Codec {
                name: name.to_string(),
                source: other,
            },
        }
    }

    pub(crate) fn unavailable(name: &str, reason: impl Into<String>) -> Self {
        ZipperError::SourceUnavailable {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn copy(name: &str, source: io::Error) -> Self {
        ZipperError::Copy {
            name: name.to_string(),
            source,
        }
    }
}

impl From<toml::de::Error> for ZipperError {
    fn from(err: toml::de::Error) -> Self {
        ZipperError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ZipperError {
    fn from(err: toml::ser::Error) -> Self {
        ZipperError::Config(err.to_string())
    }
}
