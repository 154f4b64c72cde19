use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while scanning, unpacking and transcoding spreadsheet images.
///
/// Only `InputNotFound` / `NotADirectory` end a run. Everything else is caught
/// at the file or image it belongs to and logged.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Input directory does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Cannot open spreadsheet package '{}': {reason}", path.display())]
    CorruptPackage { path: PathBuf, reason: String },
    #[error("Unreadable image reference '{reference}': {reason}")]
    UnreadableImageRef { reference: String, reason: String },
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Unsupported image format: {0}")]
    InvalidFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ExtractError::CorruptPackage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unreadable(reference: impl Into<String>, reason: impl ToString) -> Self {
        ExtractError::UnreadableImageRef {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExtractError> for CommandError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::InputNotFound(_) => CommandError::NotFound(error.to_string()),
            ExtractError::InvalidFormat(_) | ExtractError::NotADirectory(_) => {
                CommandError::InvalidInput(error.to_string())
            }
            ExtractError::Io(e) => CommandError::Io(e.to_string()),
            other => CommandError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(error: serde_json::Error) -> Self {
        CommandError::InvalidInput(error.to_string())
    }
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
