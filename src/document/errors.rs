//! Document conversion errors

use thiserror::Error;

/// Result type for document conversions
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised while converting external JSON into documents
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Document root must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Invalid $date at '{path}': {reason}")]
    InvalidDate { path: String, reason: String },

    #[error("Number at '{0}' is not representable")]
    InvalidNumber(String),
}
