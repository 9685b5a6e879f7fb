//! Error types for the designer crate.

use thiserror::Error;

/// Errors raised while assembling or writing a project document.
#[derive(Error, Debug)]
pub enum DesignerError {
    /// No canvas with the requested id exists in the document.
    #[error("Unknown canvas: {0}")]
    UnknownCanvas(String),

    /// The document has no canvas to add primitives to.
    #[error("Document has no canvas")]
    NoCanvas,

    /// I/O error while writing the document.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for designer operations.
pub type DesignerResult<T> = Result<T, DesignerError>;
