//! Schema error types
//!
//! Error codes:
//! - CLIENTEDB_SCHEMA_MALFORMED (FATAL)
//! - CLIENTEDB_SCHEMA_VALIDATION_FAILED (REJECT)
//!
//! A malformed schema cannot validate anything, so it aborts setup. A
//! rejected document is only turned into an error at a write boundary;
//! the validator itself reports violations as data.

use std::fmt;

use super::violation::Violation;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Setup must terminate
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema definition is invalid
    SchemaMalformed,
    /// Document violates schema
    SchemaValidationFailed,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaMalformed => "CLIENTEDB_SCHEMA_MALFORMED",
            SchemaErrorCode::SchemaValidationFailed => "CLIENTEDB_SCHEMA_VALIDATION_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaMalformed => Severity::Fatal,
            SchemaErrorCode::SchemaValidationFailed => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Location of the offending node or file, if known
    location: Option<String>,
    violations: Vec<Violation>,
}

impl SchemaError {
    /// Create an error for a malformed schema definition
    pub fn malformed_schema(location: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed schema at '{}': {}", location, reason.into()),
            location: Some(location),
            violations: Vec::new(),
        }
    }

    /// Create a validation failed error carrying every reported violation
    pub fn validation_failed(collection: impl Into<String>, violations: Vec<Violation>) -> Self {
        let collection = collection.into();
        let summary = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            code: SchemaErrorCode::SchemaValidationFailed,
            message: format!("Document failed validation for '{}': {}", collection, summary),
            location: Some(collection),
            violations,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::SchemaMalformed.code(), "CLIENTEDB_SCHEMA_MALFORMED");
        assert_eq!(
            SchemaErrorCode::SchemaValidationFailed.code(),
            "CLIENTEDB_SCHEMA_VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::SchemaMalformed.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::SchemaValidationFailed.severity(), Severity::Reject);
    }

    #[test]
    fn test_validation_failed_lists_violations() {
        let err = SchemaError::validation_failed(
            "clientes",
            vec![
                Violation::missing_field("nomeCliente"),
                Violation::type_mismatch("ativo", "bool", "string"),
            ],
        );

        assert!(!err.is_fatal());
        assert_eq!(err.violations().len(), 2);
        let display = err.to_string();
        assert!(display.starts_with("[REJECT] CLIENTEDB_SCHEMA_VALIDATION_FAILED"));
        assert!(display.contains("nomeCliente"));
        assert!(display.contains("ativo"));
    }

    #[test]
    fn test_malformed_keeps_location() {
        let err = SchemaError::malformed_schema("$.properties.cpf", "invalid regex");
        assert_eq!(err.location(), Some("$.properties.cpf"));
        assert!(err.to_string().contains("FATAL"));
    }
}
