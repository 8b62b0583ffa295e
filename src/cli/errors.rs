//! CLI-specific error types
//!
//! All CLI errors are FATAL: `main` prints them to stderr and exits 1.

use std::fmt;
use std::io;

use crate::collection::CollectionError;
use crate::document::DocumentError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Collection setup failed
    SetupFailed,
    /// Input is not a document
    InvalidDocument,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLIENTEDB_CLI_CONFIG_ERROR",
            Self::IoError => "CLIENTEDB_CLI_IO_ERROR",
            Self::AlreadyInitialized => "CLIENTEDB_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "CLIENTEDB_CLI_NOT_INITIALIZED",
            Self::SetupFailed => "CLIENTEDB_CLI_SETUP_FAILED",
            Self::InvalidDocument => "CLIENTEDB_CLI_INVALID_DOCUMENT",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Collection 'clientes' already exists",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Collection 'clientes' not found. Run 'clientedb init' first.",
        )
    }

    pub fn setup_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SetupFailed, msg)
    }

    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidDocument, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DocumentError> for CliError {
    fn from(e: DocumentError) -> Self {
        Self::invalid_document(e.to_string())
    }
}

impl From<CollectionError> for CliError {
    fn from(e: CollectionError) -> Self {
        match e {
            CollectionError::CollectionExists(_) => Self::already_initialized(),
            CollectionError::UnknownCollection(_) => Self::not_initialized(),
            other => Self::setup_failed(other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::config_error("data_dir must not be empty");
        assert_eq!(
            err.to_string(),
            "CLIENTEDB_CLI_CONFIG_ERROR: data_dir must not be empty"
        );
    }

    #[test]
    fn test_collection_errors_map_to_lifecycle_codes() {
        let exists: CliError = CollectionError::CollectionExists("clientes".into()).into();
        assert_eq!(exists.code(), &CliErrorCode::AlreadyInitialized);

        let missing: CliError = CollectionError::UnknownCollection("clientes".into()).into();
        assert_eq!(missing.code(), &CliErrorCode::NotInitialized);
    }
}
