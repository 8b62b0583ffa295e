//! Schema type definitions
//!
//! Supported BSON types:
//! - string: UTF-8 string, optional pattern and length bounds
//! - int: 32-bit signed integer, optional inclusive minimum
//! - bool: Boolean
//! - date: UTC timestamp
//! - object: Nested object with its own property schema
//! - array: Homogeneous array with element schema
//!
//! Each variant carries only the constraints that apply to its type, so
//! the validator checks them by exhaustive matching instead of probing
//! optional keys.

use regex::Regex;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};

/// A regular expression compiled once and matched against whole values.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self { source, regex })
    }

    /// The pattern as declared in the schema (without the added anchors).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// Constraints for `bsonType: "string"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub pattern: Option<Pattern>,
    /// Inclusive, counted in Unicode scalar values
    pub min_length: Option<usize>,
    /// Inclusive, counted in Unicode scalar values
    pub max_length: Option<usize>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern constraint, failing if the regex does not compile.
    pub fn with_pattern(mut self, pattern: &str) -> SchemaResult<Self> {
        let compiled = Pattern::new(pattern)
            .map_err(|e| SchemaError::malformed_schema("pattern", e.to_string()))?;
        self.pattern = Some(compiled);
        Ok(self)
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// Constraints for `bsonType: "int"`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntSchema {
    /// Inclusive lower bound
    pub minimum: Option<i64>,
}

/// A declared property of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub node: SchemaNode,
    pub description: Option<String>,
}

/// Constraints for `bsonType: "object"`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    /// Field names that must be present, subset of `properties`
    pub required: Vec<String>,
    /// Declared properties in declaration order
    pub properties: Vec<PropertyDef>,
    /// `false` makes this level strict: undeclared fields are rejected
    pub additional_properties: bool,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            properties: Vec::new(),
            additional_properties: true,
        }
    }
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an optional property.
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            node,
            description: None,
        });
        self
    }

    /// Declares a property and marks it required.
    pub fn required_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.property(name, node)
    }

    /// Rejects fields not declared in `properties`.
    pub fn strict(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Checks that every required name is a declared property, recursively.
    pub fn validate_structure(&self, path: &str) -> Result<(), String> {
        for name in &self.required {
            if self.get(name).is_none() {
                return Err(format!(
                    "{}: required field '{}' is not declared in properties",
                    path, name
                ));
            }
        }
        for prop in &self.properties {
            let child = format!("{}.{}", path, prop.name);
            prop.node.validate_structure(&child)?;
        }
        Ok(())
    }
}

/// Constraints for `bsonType: "array"`
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    /// Element schema (boxed to allow recursive types)
    pub items: Box<SchemaNode>,
}

/// A recursive schema node, one variant per supported BSON type
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String(StringSchema),
    Int(IntSchema),
    Bool,
    Date,
    Object(ObjectSchema),
    Array(ArraySchema),
}

impl SchemaNode {
    /// Returns the type name as written in `bsonType`
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::String(_) => "string",
            SchemaNode::Int(_) => "int",
            SchemaNode::Bool => "bool",
            SchemaNode::Date => "date",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
        }
    }

    pub fn string() -> Self {
        SchemaNode::String(StringSchema::new())
    }

    pub fn int() -> Self {
        SchemaNode::Int(IntSchema::default())
    }

    pub fn int_with_minimum(minimum: i64) -> Self {
        SchemaNode::Int(IntSchema {
            minimum: Some(minimum),
        })
    }

    pub fn array_of(items: SchemaNode) -> Self {
        SchemaNode::Array(ArraySchema {
            items: Box::new(items),
        })
    }

    fn validate_structure(&self, path: &str) -> Result<(), String> {
        match self {
            SchemaNode::String(s) => match (s.min_length, s.max_length) {
                (Some(min), Some(max)) if min > max => Err(format!(
                    "{}: minLength {} exceeds maxLength {}",
                    path, min, max
                )),
                _ => Ok(()),
            },
            SchemaNode::Object(o) => o.validate_structure(path),
            SchemaNode::Array(a) => a.items.validate_structure(&format!("{}[]", path)),
            SchemaNode::Int(_) | SchemaNode::Bool | SchemaNode::Date => Ok(()),
        }
    }
}

impl From<StringSchema> for SchemaNode {
    fn from(s: StringSchema) -> Self {
        SchemaNode::String(s)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(o: ObjectSchema) -> Self {
        SchemaNode::Object(o)
    }
}

/// A fully compiled, immutable collection schema.
///
/// The root is always an object. Built once at startup and shared
/// read-only across all validation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    pub root: ObjectSchema,
    pub description: Option<String>,
}

impl CompiledSchema {
    /// Wraps a root object schema after checking its structure.
    pub fn new(root: ObjectSchema) -> SchemaResult<Self> {
        root.validate_structure("$")
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;
        Ok(Self {
            root,
            description: None,
        })
    }
}
