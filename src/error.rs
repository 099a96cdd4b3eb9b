//! Centralized error types for donorlens.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the donorlens library.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A header grammar references a placeholder outside the recognized
    /// symbol set. Configuration-time defect: the grammar is skipped,
    /// the remaining grammars are still tried.
    #[error("No known pattern for header token '{token}'")]
    UnknownToken { token: String },

    /// An archive entry's bytes are not valid UTF-8.
    #[error("Could not decode to utf-8: {entry}")]
    Decode { entry: String },

    /// The input is neither an openable archive nor a recognized plain-text
    /// file. Fatal for the whole invocation.
    #[error("'{0}' is not a valid input format")]
    InvalidInput(PathBuf),

    /// No grammar, including the fallback, extracted any messages.
    /// Soft: the file contributes nothing, the invocation continues.
    #[error("No header format matched the text")]
    NoMatch,

    /// The archive container itself could not be read.
    #[error("Archive error in '{path}': {source}")]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// A JSON entry could not be parsed.
    #[error("Could not parse '{entry}': {source}")]
    Json {
        entry: String,
        source: serde_json::Error,
    },
}

/// Convenience alias for `Result<T, ExtractError>`.
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
