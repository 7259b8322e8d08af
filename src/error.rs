//! Error types for unoutline library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure inference and linking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A page's run data is absent or inconsistent.
    #[error("Malformed page {page}: {reason}")]
    MalformedPage {
        /// Page number (1-indexed)
        page: u32,
        /// What is wrong with the page
        reason: String,
    },

    /// The embedding provider failed for the whole batch.
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// The embedding provider returned a result set that does not line up with its input.
    #[error("Embedding provider returned {actual} vectors for {expected} texts")]
    EmbeddingMismatch {
        /// Number of texts sent to the provider
        expected: usize,
        /// Number of vectors received
        actual: usize,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A collection directory or its manifest does not exist.
    #[error("Collection not found: {}", .0.display())]
    CollectionNotFound(PathBuf),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Check if this error belongs to the embedding stage.
    pub fn is_embedding_failure(&self) -> bool {
        matches!(
            self,
            Error::EmbeddingProvider(_) | Error::EmbeddingMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedPage {
            page: 3,
            reason: "missing run data".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed page 3: missing run data");

        let err = Error::EmbeddingMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Embedding provider returned 3 vectors for 4 texts"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_embedding_failure_classification() {
        assert!(Error::EmbeddingProvider("down".into()).is_embedding_failure());
        assert!(!Error::InvalidConfig("bad".into()).is_embedding_failure());
    }
}
