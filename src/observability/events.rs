//! Observability events for clientedb
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in clientedb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// One-shot setup begins
    SetupBegin,
    /// One-shot setup complete
    SetupComplete,
    /// Configuration loaded
    ConfigLoaded,

    // Catalog
    /// Collection definitions loaded from disk
    CatalogLoaded,
    /// Validated collection created
    CollectionCreated,
    /// Schema definition failed to compile (FATAL)
    SchemaCompileFailed,

    // Writes
    /// Document passed validation and was stored
    DocumentAccepted,
    /// Document refused by validation
    DocumentRejected,
    /// Document violated the schema but was stored (warn action)
    ValidationWarned,
    /// Validation skipped because the level is off
    ValidationBypassed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SetupBegin => "SETUP_BEGIN",
            Event::SetupComplete => "SETUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CollectionCreated => "COLLECTION_CREATED",
            Event::SchemaCompileFailed => "SCHEMA_COMPILE_FAILED",
            Event::DocumentAccepted => "DOCUMENT_ACCEPTED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
            Event::ValidationWarned => "VALIDATION_WARNED",
            Event::ValidationBypassed => "VALIDATION_BYPASSED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::SetupBegin,
            Event::SetupComplete,
            Event::ConfigLoaded,
            Event::CatalogLoaded,
            Event::CollectionCreated,
            Event::SchemaCompileFailed,
            Event::DocumentAccepted,
            Event::DocumentRejected,
            Event::ValidationWarned,
            Event::ValidationBypassed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::CollectionCreated), "COLLECTION_CREATED");
    }
}
