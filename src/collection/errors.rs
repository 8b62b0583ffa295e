//! # Collection Errors

use thiserror::Error;

use crate::schema::{SchemaError, Violation};

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Collection and catalog errors
#[derive(Debug, Clone, Error)]
pub enum CollectionError {
    // Write errors
    #[error("Document failed validation for '{collection}': {} violation(s)", .violations.len())]
    ValidationFailed {
        collection: String,
        violations: Vec<Violation>,
    },

    #[error("Duplicate key on '{field}': {value}")]
    DuplicateKey { field: String, value: String },

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("_id is immutable: '{existing}' cannot become '{attempted}'")]
    ImmutableId { existing: String, attempted: String },

    #[error("_id must be a string")]
    InvalidId,

    // Catalog errors
    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Invalid collection name: '{0}'")]
    InvalidCollectionName(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CollectionError {
    /// Violations carried by a validation failure, empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            CollectionError::ValidationFailed { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Fatal errors abort setup; everything else is a refused request
    pub fn is_fatal(&self) -> bool {
        match self {
            CollectionError::Schema(e) => e.is_fatal(),
            CollectionError::Io(_) => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for CollectionError {
    fn from(e: std::io::Error) -> Self {
        CollectionError::Io(e.to_string())
    }
}
