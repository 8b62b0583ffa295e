//! In-memory validated collection
//!
//! The write boundary where validation level and action take effect.
//! The validator reports violations as data; this is where a rejection
//! becomes a refused write (`error`) or a logged warning (`warn`).
//!
//! Documents are validated as supplied by the caller. A generated `_id`
//! is added only after validation, so a schema that does not declare
//! `_id` still accepts documents that leave it to the collection.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::errors::{CollectionError, CollectionResult};
use super::options::{CollectionOptions, ValidationAction, ValidationLevel};
use crate::document::{Document, Value};
use crate::observability::Event;
use crate::schema::{SchemaValidator, ValidationResult, Violation};

const ID_FIELD: &str = "_id";

/// Result of a successful write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// `_id` of the stored document
    pub id: String,
    /// Violations tolerated under the `warn` action
    pub warnings: Vec<Violation>,
}

/// A named collection that validates every write against its schema.
pub struct ValidatedCollection {
    name: String,
    options: CollectionOptions,
    documents: BTreeMap<String, Document>,
}

impl ValidatedCollection {
    pub fn new(name: impl Into<String>, options: CollectionOptions) -> Self {
        Self {
            name: name.into(),
            options,
            documents: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &CollectionOptions {
        &self.options
    }

    /// Validates a document with this collection's schema and validator
    /// options, regardless of level and action.
    pub fn validate(&self, document: &Document) -> ValidationResult {
        SchemaValidator::with_options(&self.options.schema, self.options.validator)
            .validate(document)
    }

    /// Inserts a new document.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` under `strict` + `error` when the schema rejects it
    /// - `DuplicateKey` when `_id` or a unique field collides
    /// - `InvalidId` when a supplied `_id` is not a string
    pub fn insert_one(&mut self, mut document: Document) -> CollectionResult<WriteOutcome> {
        let supplied_id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => return Err(CollectionError::InvalidId),
            None => None,
        };

        if let Some(id) = &supplied_id {
            if self.documents.contains_key(id) {
                return Err(CollectionError::DuplicateKey {
                    field: ID_FIELD.to_string(),
                    value: id.clone(),
                });
            }
        }

        let warnings = self.police(&document)?;
        self.check_unique(&document, None)?;

        let id = match supplied_id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                document.insert(ID_FIELD, id.clone());
                id
            }
        };

        tracing::info!(
            event = Event::DocumentAccepted.as_str(),
            collection = %self.name,
            id = %id
        );
        self.documents.insert(id.clone(), document);
        Ok(WriteOutcome { id, warnings })
    }

    /// Replaces the document stored under `id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no document has this `_id`
    /// - `ImmutableId` when the replacement carries a different `_id`
    /// - plus the validation and uniqueness errors of `insert_one`
    pub fn replace_one(&mut self, id: &str, mut document: Document) -> CollectionResult<WriteOutcome> {
        if !self.documents.contains_key(id) {
            return Err(CollectionError::NotFound(id.to_string()));
        }

        match document.get(ID_FIELD) {
            Some(Value::String(new_id)) if new_id != id => {
                return Err(CollectionError::ImmutableId {
                    existing: id.to_string(),
                    attempted: new_id.clone(),
                });
            }
            Some(Value::String(_)) | None => {}
            Some(_) => return Err(CollectionError::InvalidId),
        }

        let warnings = self.police(&document)?;
        self.check_unique(&document, Some(id))?;

        if !document.contains_key(ID_FIELD) {
            document.insert(ID_FIELD, id);
        }

        tracing::info!(
            event = Event::DocumentAccepted.as_str(),
            collection = %self.name,
            id = %id
        );
        self.documents.insert(id.to_string(), document);
        Ok(WriteOutcome {
            id: id.to_string(),
            warnings,
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// First document (in `_id` order) whose value at `path` equals `value`.
    pub fn find_one_by(&self, path: &str, value: &Value) -> Option<&Document> {
        self.documents
            .values()
            .find(|doc| doc.get_path(path) == Some(value))
    }

    pub fn delete_one(&mut self, id: &str) -> CollectionResult<Document> {
        self.documents
            .remove(id)
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stored documents in `_id` order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.documents.iter().map(|(id, doc)| (id.as_str(), doc))
    }

    /// Applies validation level and action to a pending write.
    fn police(&self, document: &Document) -> CollectionResult<Vec<Violation>> {
        if self.options.level == ValidationLevel::Off {
            tracing::info!(
                event = Event::ValidationBypassed.as_str(),
                collection = %self.name
            );
            return Ok(Vec::new());
        }

        let violations = match self.validate(document) {
            ValidationResult::Accepted => return Ok(Vec::new()),
            ValidationResult::Rejected(violations) => violations,
        };

        match self.options.action {
            ValidationAction::Error => {
                tracing::info!(
                    event = Event::DocumentRejected.as_str(),
                    collection = %self.name,
                    violations = violations.len()
                );
                Err(CollectionError::ValidationFailed {
                    collection: self.name.clone(),
                    violations,
                })
            }
            ValidationAction::Warn => {
                for violation in &violations {
                    tracing::warn!(
                        event = Event::ValidationWarned.as_str(),
                        collection = %self.name,
                        code = violation.code(),
                        path = %violation.path,
                        reason = %violation.reason()
                    );
                }
                Ok(violations)
            }
        }
    }

    /// Unique index check. A missing field indexes as `null`, so at most
    /// one document may lack each unique field.
    fn check_unique(&self, document: &Document, replacing: Option<&str>) -> CollectionResult<()> {
        let null = Value::Null;
        for field in &self.options.unique_fields {
            let value = document.get(field).unwrap_or(&null);
            let taken = self.documents.iter().any(|(id, other)| {
                Some(id.as_str()) != replacing && other.get(field).unwrap_or(&null) == value
            });
            if taken {
                return Err(CollectionError::DuplicateKey {
                    field: field.clone(),
                    value: render_value(value),
                });
            }
        }
        Ok(())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_json().to_string(),
    }
}
