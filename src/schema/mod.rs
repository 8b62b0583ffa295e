//! Schema validation subsystem for clientedb
//!
//! Schemas are declared once, compiled once, and then shared read-only by
//! every validation call.
//!
//! # Design Principles
//!
//! - One variant per `bsonType`, checked by exhaustive matching
//! - Patterns compiled at load time, matched against the whole value
//! - No nulls as wildcards, no defaults, no coercion
//! - Violations are data; only a malformed schema is an error
//! - Deterministic validation

mod compiler;
mod errors;
mod types;
mod validator;
mod violation;

pub use compiler::SchemaCompiler;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use types::{
    ArraySchema, CompiledSchema, IntSchema, ObjectSchema, Pattern, PropertyDef, SchemaNode,
    StringSchema,
};
pub use validator::{validate, ReportMode, SchemaValidator, UnknownFieldPolicy, ValidatorOptions};
pub use violation::{LengthBound, ValidationResult, Violation, ViolationKind};
