//! Schema validator for documents
//!
//! Validation semantics (depth-first, top-down):
//! - Every required field at a level is present
//! - Declared fields match their `bsonType` exactly, no coercion
//! - Strings match their pattern in full and respect inclusive length bounds
//! - Ints respect their inclusive minimum
//! - Nested objects and array elements are checked recursively
//! - Undeclared fields are ignored unless the level is strict
//!
//! Validation is pure and deterministic: no I/O, no logging, same input
//! always yields the same result.

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

use super::errors::{SchemaError, SchemaResult};
use super::types::{CompiledSchema, IntSchema, ObjectSchema, SchemaNode, StringSchema};
use super::violation::{LengthBound, ValidationResult, Violation};
use crate::document::{Document, Value};

/// How many violations to collect before returning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Stop at the first violation
    First,
    /// Collect every violation
    #[default]
    All,
}

/// Treatment of fields that are not declared in `properties`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Follow each object's `additionalProperties` declaration
    #[default]
    AsDeclared,
    /// Top level is strict, nested objects follow their declaration
    RejectAtRoot,
    /// Every object level is strict
    RejectEverywhere,
}

/// Validator configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    #[serde(default)]
    pub report: ReportMode,
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

/// Validates documents against a compiled schema.
///
/// Holds a borrowed, read-only schema; any number of validators may share
/// one schema across threads.
pub struct SchemaValidator<'a> {
    schema: &'a CompiledSchema,
    options: ValidatorOptions,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a CompiledSchema) -> Self {
        Self::with_options(schema, ValidatorOptions::default())
    }

    pub fn with_options(schema: &'a CompiledSchema, options: ValidatorOptions) -> Self {
        Self { schema, options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validates a document against the schema.
    pub fn validate(&self, document: &Document) -> ValidationResult {
        let mut walk = Walk {
            options: &self.options,
            violations: Vec::new(),
        };
        let _ = walk.check_object(document, &self.schema.root, "");

        if walk.violations.is_empty() {
            ValidationResult::Accepted
        } else {
            ValidationResult::Rejected(walk.violations)
        }
    }

    /// Validates and turns a rejection into an error, for write paths that
    /// refuse invalid documents.
    ///
    /// # Errors
    ///
    /// Returns `CLIENTEDB_SCHEMA_VALIDATION_FAILED` carrying every violation.
    pub fn validate_or_reject(&self, collection: &str, document: &Document) -> SchemaResult<()> {
        match self.validate(document) {
            ValidationResult::Accepted => Ok(()),
            ValidationResult::Rejected(violations) => {
                Err(SchemaError::validation_failed(collection, violations))
            }
        }
    }
}

/// Validates `document` against `schema` with default options.
pub fn validate(document: &Document, schema: &CompiledSchema) -> ValidationResult {
    SchemaValidator::new(schema).validate(document)
}

/// Traversal state for one validation call
struct Walk<'o> {
    options: &'o ValidatorOptions,
    violations: Vec<Violation>,
}

impl Walk<'_> {
    fn report(&mut self, violation: Violation) -> ControlFlow<()> {
        self.violations.push(violation);
        match self.options.report {
            ReportMode::First => ControlFlow::Break(()),
            ReportMode::All => ControlFlow::Continue(()),
        }
    }

    fn is_strict(&self, schema: &ObjectSchema, at_root: bool) -> bool {
        match self.options.unknown_fields {
            UnknownFieldPolicy::AsDeclared => !schema.additional_properties,
            UnknownFieldPolicy::RejectAtRoot => at_root || !schema.additional_properties,
            UnknownFieldPolicy::RejectEverywhere => true,
        }
    }

    fn check_object(
        &mut self,
        doc: &Document,
        schema: &ObjectSchema,
        prefix: &str,
    ) -> ControlFlow<()> {
        for name in &schema.required {
            if !doc.contains_key(name) {
                self.report(Violation::missing_field(make_path(prefix, name)))?;
            }
        }

        let strict = self.is_strict(schema, prefix.is_empty());
        for (key, value) in doc.iter() {
            let field_path = make_path(prefix, key);
            match schema.get(key) {
                Some(prop) => self.check_value(value, &prop.node, &field_path)?,
                None if strict => self.report(Violation::unknown_field(field_path))?,
                None => {}
            }
        }

        ControlFlow::Continue(())
    }

    fn check_value(&mut self, value: &Value, node: &SchemaNode, path: &str) -> ControlFlow<()> {
        match (node, value) {
            (SchemaNode::String(s), Value::String(v)) => self.check_string(v, s, path),
            (SchemaNode::Int(s), Value::Int(n)) if i32::try_from(*n).is_ok() => {
                self.check_int(*n, s, path)
            }
            (SchemaNode::Bool, Value::Bool(_)) => ControlFlow::Continue(()),
            (SchemaNode::Date, Value::Date(_)) => ControlFlow::Continue(()),
            (SchemaNode::Object(o), Value::Document(d)) => self.check_object(d, o, path),
            (SchemaNode::Array(a), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_value(item, &a.items, &format!("{}[{}]", path, i))?;
                }
                ControlFlow::Continue(())
            }
            (expected, actual) => self.report(Violation::type_mismatch(
                path,
                expected.type_name(),
                actual.type_name(),
            )),
        }
    }

    fn check_string(&mut self, value: &str, schema: &StringSchema, path: &str) -> ControlFlow<()> {
        if let Some(pattern) = &schema.pattern {
            if !pattern.is_full_match(value) {
                self.report(Violation::pattern_mismatch(path, pattern.as_str()))?;
            }
        }

        let len = value.chars().count();
        if let Some(min) = schema.min_length {
            if len < min {
                self.report(Violation::length_out_of_range(path, LengthBound::Min(min), len))?;
            }
        }
        if let Some(max) = schema.max_length {
            if len > max {
                self.report(Violation::length_out_of_range(path, LengthBound::Max(max), len))?;
            }
        }

        ControlFlow::Continue(())
    }

    fn check_int(&mut self, value: i64, schema: &IntSchema, path: &str) -> ControlFlow<()> {
        match schema.minimum {
            Some(minimum) if value < minimum => {
                self.report(Violation::value_below_minimum(path, minimum, value))
            }
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ViolationKind;
    use chrono::Utc;

    fn users_schema() -> CompiledSchema {
        let address = ObjectSchema::new()
            .required_property("city", SchemaNode::string())
            .property(
                "zip",
                StringSchema::new().with_pattern("[0-9]{5}").unwrap().into(),
            );

        let root = ObjectSchema::new()
            .required_property(
                "name",
                StringSchema::new().with_min_length(3).with_max_length(10).into(),
            )
            .required_property("active", SchemaNode::Bool)
            .property("age", SchemaNode::int_with_minimum(0))
            .property("joined", SchemaNode::Date)
            .property("address", address.into())
            .property("tags", SchemaNode::array_of(SchemaNode::string()));

        CompiledSchema::new(root).unwrap()
    }

    fn valid_doc() -> Document {
        Document::new().with("name", "Alice").with("active", true)
    }

    #[test]
    fn test_valid_document_passes() {
        let schema = users_schema();
        assert_eq!(validate(&valid_doc(), &schema), ValidationResult::Accepted);
    }

    #[test]
    fn test_valid_document_with_optional_fields() {
        let schema = users_schema();
        let doc = valid_doc()
            .with("age", 30)
            .with("joined", Utc::now())
            .with("address", Document::new().with("city", "NYC").with("zip", "10001"))
            .with("tags", vec!["a", "b"]);
        assert!(validate(&doc, &schema).is_accepted());
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let schema = users_schema();
        let result = validate(&Document::new(), &schema);
        assert_eq!(
            result.violations(),
            &[
                Violation::missing_field("name"),
                Violation::missing_field("active"),
            ]
        );
    }

    #[test]
    fn test_first_mode_stops_early() {
        let schema = users_schema();
        let options = ValidatorOptions {
            report: ReportMode::First,
            ..Default::default()
        };
        let result = SchemaValidator::with_options(&schema, options).validate(&Document::new());
        assert_eq!(result.violations(), &[Violation::missing_field("name")]);
    }

    #[test]
    fn test_type_mismatch_skips_other_checks() {
        let schema = users_schema();
        let doc = valid_doc().with("name", 12);
        assert_eq!(
            validate(&doc, &schema).violations(),
            &[Violation::type_mismatch("name", "string", "int")]
        );
    }

    #[test]
    fn test_null_is_a_type_mismatch() {
        let schema = users_schema();
        let doc = valid_doc().with("active", Value::Null);
        assert_eq!(
            validate(&doc, &schema).violations(),
            &[Violation::type_mismatch("active", "bool", "null")]
        );
    }

    #[test]
    fn test_int_rejects_double_and_long() {
        let schema = users_schema();

        let doc = valid_doc().with("age", 1.5);
        assert_eq!(
            validate(&doc, &schema).violations(),
            &[Violation::type_mismatch("age", "int", "double")]
        );

        let doc = valid_doc().with("age", i64::from(i32::MAX) + 1);
        assert_eq!(
            validate(&doc, &schema).violations(),
            &[Violation::type_mismatch("age", "int", "long")]
        );
    }

    #[test]
    fn test_minimum_is_inclusive() {
        let schema = users_schema();
        assert!(validate(&valid_doc().with("age", 0), &schema).is_accepted());
        assert_eq!(
            validate(&valid_doc().with("age", -1), &schema).violations(),
            &[Violation::value_below_minimum("age", 0, -1)]
        );
    }

    #[test]
    fn test_length_bounds_inclusive_and_unicode_aware() {
        let schema = users_schema();
        assert!(validate(&valid_doc().with("name", "Ana"), &schema).is_accepted());
        assert!(validate(&valid_doc().with("name", "Joãozinhoo"), &schema).is_accepted());

        let result = validate(&valid_doc().with("name", "Al"), &schema);
        assert_eq!(
            result.violations(),
            &[Violation::length_out_of_range("name", LengthBound::Min(3), 2)]
        );

        let result = validate(&valid_doc().with("name", "Maximiliano"), &schema);
        assert_eq!(
            result.violations(),
            &[Violation::length_out_of_range("name", LengthBound::Max(10), 11)]
        );
    }

    #[test]
    fn test_nested_paths_prefixed() {
        let schema = users_schema();
        let doc = valid_doc().with("address", Document::new().with("zip", "1000"));
        let result = validate(&doc, &schema);
        assert_eq!(
            result.violations(),
            &[
                Violation::missing_field("address.city"),
                Violation::pattern_mismatch("address.zip", "[0-9]{5}"),
            ]
        );
    }

    #[test]
    fn test_array_elements_index_qualified() {
        let schema = users_schema();
        let doc = valid_doc().with(
            "tags",
            Value::Array(vec![Value::from("ok"), Value::Int(1), Value::Bool(true)]),
        );
        let paths: Vec<_> = validate(&doc, &schema)
            .into_violations()
            .into_iter()
            .map(|v| v.path)
            .collect();
        assert_eq!(paths, vec!["tags[1]", "tags[2]"]);
    }

    #[test]
    fn test_unknown_fields_ignored_by_default() {
        let schema = users_schema();
        let doc = valid_doc()
            .with("nickname", "Al")
            .with("address", Document::new().with("city", "NYC").with("floor", 3));
        assert!(validate(&doc, &schema).is_accepted());
    }

    #[test]
    fn test_unknown_field_policies() {
        let schema = users_schema();
        let doc = valid_doc()
            .with("nickname", "Al")
            .with("address", Document::new().with("city", "NYC").with("floor", 3));

        let at_root = ValidatorOptions {
            unknown_fields: UnknownFieldPolicy::RejectAtRoot,
            ..Default::default()
        };
        assert_eq!(
            SchemaValidator::with_options(&schema, at_root).validate(&doc).violations(),
            &[Violation::unknown_field("nickname")]
        );

        let everywhere = ValidatorOptions {
            unknown_fields: UnknownFieldPolicy::RejectEverywhere,
            ..Default::default()
        };
        assert_eq!(
            SchemaValidator::with_options(&schema, everywhere)
                .validate(&doc)
                .violations(),
            &[
                Violation::unknown_field("nickname"),
                Violation::unknown_field("address.floor"),
            ]
        );
    }

    #[test]
    fn test_declared_strict_level() {
        let root = ObjectSchema::new()
            .required_property("id", SchemaNode::string())
            .strict();
        let schema = CompiledSchema::new(root).unwrap();

        let doc = Document::new().with("id", "x").with("extra", 1);
        let result = validate(&doc, &schema);
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].kind, ViolationKind::UnknownField);
    }

    #[test]
    fn test_validate_or_reject() {
        let schema = users_schema();
        let validator = SchemaValidator::new(&schema);

        assert!(validator.validate_or_reject("users", &valid_doc()).is_ok());

        let err = validator
            .validate_or_reject("users", &Document::new())
            .unwrap_err();
        assert_eq!(err.code().code(), "CLIENTEDB_SCHEMA_VALIDATION_FAILED");
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_options_deserialize_from_snake_case() {
        let options: ValidatorOptions =
            serde_json::from_str(r#"{"report":"first","unknown_fields":"reject_at_root"}"#)
                .unwrap();
        assert_eq!(options.report, ReportMode::First);
        assert_eq!(options.unknown_fields, UnknownFieldPolicy::RejectAtRoot);

        let defaults: ValidatorOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, ValidatorOptions::default());
    }
}
