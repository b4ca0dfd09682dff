//! Error types for the persistence and capture layers
//!
//! The styling engine itself is total and never returns these.

use thiserror::Error;

/// Failures of the document, note and preference stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("corrupt store {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Failures while turning recognized text into a stored document
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("there is no text to save")]
    NothingToSave,

    #[error("capture source unavailable: {0}")]
    Source(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidName("a/b".to_string());
        assert_eq!(err.to_string(), "invalid name: \"a/b\"");

        let err = CaptureError::NothingToSave;
        assert_eq!(err.to_string(), "there is no text to save");

        let err = CaptureError::from(StoreError::NotFound("x.txt".to_string()));
        assert_eq!(err.to_string(), "not found: x.txt");
    }
}
