//! Schema compiler: `$jsonSchema` JSON definition to `CompiledSchema`
//!
//! Accepted keywords per `bsonType`:
//! - all: bsonType, description
//! - string: pattern, minLength, maxLength
//! - int: minimum
//! - object: required, properties, additionalProperties
//! - array: items
//!
//! Anything else is a malformed schema. Malformed schemas are FATAL:
//! setup cannot continue with a schema that cannot validate.

use serde_json::{json, Map, Value as Json};

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    ArraySchema, CompiledSchema, IntSchema, ObjectSchema, Pattern, PropertyDef, SchemaNode,
    StringSchema,
};

const WRAPPER_KEY: &str = "$jsonSchema";
const COMMON_KEYWORDS: &[&str] = &["bsonType", "description"];

/// Compiles schema definitions. Regexes are compiled here, once.
pub struct SchemaCompiler;

impl SchemaCompiler {
    /// Compiles a definition given either as the bare root node or wrapped
    /// as `{"$jsonSchema": {...}}`.
    ///
    /// # Errors
    ///
    /// Returns `CLIENTEDB_SCHEMA_MALFORMED` with the JSON path of the
    /// offending node.
    pub fn compile(definition: &Json) -> SchemaResult<CompiledSchema> {
        let root = match definition.as_object() {
            Some(map) if map.len() == 1 && map.contains_key(WRAPPER_KEY) => &map[WRAPPER_KEY],
            _ => definition,
        };

        let description = root
            .get("description")
            .and_then(Json::as_str)
            .map(str::to_string);

        match compile_node(root, "$")? {
            SchemaNode::Object(obj) => Ok(CompiledSchema {
                root: obj,
                description,
            }),
            other => Err(SchemaError::malformed_schema(
                "$",
                format!("root bsonType must be 'object', got '{}'", other.type_name()),
            )),
        }
    }

    /// Parses and compiles a JSON string.
    pub fn compile_str(source: &str) -> SchemaResult<CompiledSchema> {
        let json: Json = serde_json::from_str(source)
            .map_err(|e| SchemaError::malformed_schema("$", format!("Invalid JSON: {}", e)))?;
        Self::compile(&json)
    }
}

fn compile_node(json: &Json, path: &str) -> SchemaResult<SchemaNode> {
    let map = json
        .as_object()
        .ok_or_else(|| SchemaError::malformed_schema(path, "schema node must be an object"))?;

    let bson_type = match map.get("bsonType") {
        Some(Json::String(t)) => t.as_str(),
        Some(_) => {
            return Err(SchemaError::malformed_schema(path, "bsonType must be a string"));
        }
        None => return Err(SchemaError::malformed_schema(path, "bsonType is missing")),
    };

    match bson_type {
        "string" => {
            check_keywords(map, &["pattern", "minLength", "maxLength"], bson_type, path)?;
            compile_string(map, path).map(SchemaNode::String)
        }
        "int" => {
            check_keywords(map, &["minimum"], bson_type, path)?;
            let minimum = match map.get("minimum") {
                Some(m) => Some(m.as_i64().ok_or_else(|| {
                    SchemaError::malformed_schema(path, "minimum must be an integer")
                })?),
                None => None,
            };
            Ok(SchemaNode::Int(IntSchema { minimum }))
        }
        "bool" => {
            check_keywords(map, &[], bson_type, path)?;
            Ok(SchemaNode::Bool)
        }
        "date" => {
            check_keywords(map, &[], bson_type, path)?;
            Ok(SchemaNode::Date)
        }
        "object" => {
            check_keywords(
                map,
                &["required", "properties", "additionalProperties"],
                bson_type,
                path,
            )?;
            compile_object(map, path).map(SchemaNode::Object)
        }
        "array" => {
            check_keywords(map, &["items"], bson_type, path)?;
            let items = map.get("items").ok_or_else(|| {
                SchemaError::malformed_schema(path, "array schema requires items")
            })?;
            let items = compile_node(items, &format!("{}.items", path))?;
            Ok(SchemaNode::Array(ArraySchema {
                items: Box::new(items),
            }))
        }
        other => Err(SchemaError::malformed_schema(
            path,
            format!("unsupported bsonType '{}'", other),
        )),
    }
}

fn check_keywords(
    map: &Map<String, Json>,
    allowed: &[&str],
    bson_type: &str,
    path: &str,
) -> SchemaResult<()> {
    for key in map.keys() {
        if !COMMON_KEYWORDS.contains(&key.as_str()) && !allowed.contains(&key.as_str()) {
            return Err(SchemaError::malformed_schema(
                path,
                format!("keyword '{}' is not supported for bsonType '{}'", key, bson_type),
            ));
        }
    }
    Ok(())
}

fn compile_string(map: &Map<String, Json>, path: &str) -> SchemaResult<StringSchema> {
    let pattern = match map.get("pattern") {
        Some(Json::String(p)) => Some(Pattern::new(p.as_str()).map_err(|e| {
            SchemaError::malformed_schema(path, format!("invalid pattern: {}", e))
        })?),
        Some(_) => return Err(SchemaError::malformed_schema(path, "pattern must be a string")),
        None => None,
    };

    let min_length = length_keyword(map, "minLength", path)?;
    let max_length = length_keyword(map, "maxLength", path)?;
    if let (Some(min), Some(max)) = (min_length, max_length) {
        if min > max {
            return Err(SchemaError::malformed_schema(
                path,
                format!("minLength {} exceeds maxLength {}", min, max),
            ));
        }
    }

    Ok(StringSchema {
        pattern,
        min_length,
        max_length,
    })
}

fn length_keyword(map: &Map<String, Json>, key: &str, path: &str) -> SchemaResult<Option<usize>> {
    match map.get(key) {
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                SchemaError::malformed_schema(path, format!("{} must be a non-negative integer", key))
            }),
        None => Ok(None),
    }
}

fn compile_object(map: &Map<String, Json>, path: &str) -> SchemaResult<ObjectSchema> {
    let mut properties = Vec::new();
    match map.get("properties") {
        Some(Json::Object(props)) => {
            for (name, node) in props {
                let child = format!("{}.properties.{}", path, name);
                properties.push(PropertyDef {
                    name: name.clone(),
                    node: compile_node(node, &child)?,
                    description: node
                        .get("description")
                        .and_then(Json::as_str)
                        .map(str::to_string),
                });
            }
        }
        Some(_) => {
            return Err(SchemaError::malformed_schema(path, "properties must be an object"));
        }
        None => {}
    }

    let mut required: Vec<String> = Vec::new();
    match map.get("required") {
        Some(Json::Array(names)) => {
            for name in names {
                let name = name.as_str().ok_or_else(|| {
                    SchemaError::malformed_schema(path, "required entries must be strings")
                })?;
                if !properties.iter().any(|p| p.name == name) {
                    return Err(SchemaError::malformed_schema(
                        path,
                        format!("required field '{}' is not declared in properties", name),
                    ));
                }
                if !required.iter().any(|r| r == name) {
                    required.push(name.to_string());
                }
            }
        }
        Some(_) => return Err(SchemaError::malformed_schema(path, "required must be an array")),
        None => {}
    }

    let additional_properties = match map.get("additionalProperties") {
        Some(Json::Bool(b)) => *b,
        Some(_) => {
            return Err(SchemaError::malformed_schema(
                path,
                "additionalProperties must be a boolean",
            ));
        }
        None => true,
    };

    Ok(ObjectSchema {
        required,
        properties,
        additional_properties,
    })
}

impl CompiledSchema {
    /// Serializes back to the definition format accepted by the compiler.
    pub fn to_json(&self) -> Json {
        let mut root = object_to_json(&self.root);
        if let (Some(desc), Some(map)) = (&self.description, root.as_object_mut()) {
            map.insert("description".into(), Json::String(desc.clone()));
        }
        root
    }
}

fn node_to_json(node: &SchemaNode) -> Json {
    match node {
        SchemaNode::String(s) => {
            let mut map = Map::new();
            map.insert("bsonType".into(), json!("string"));
            if let Some(pattern) = &s.pattern {
                map.insert("pattern".into(), json!(pattern.as_str()));
            }
            if let Some(min) = s.min_length {
                map.insert("minLength".into(), json!(min));
            }
            if let Some(max) = s.max_length {
                map.insert("maxLength".into(), json!(max));
            }
            Json::Object(map)
        }
        SchemaNode::Int(i) => match i.minimum {
            Some(minimum) => json!({ "bsonType": "int", "minimum": minimum }),
            None => json!({ "bsonType": "int" }),
        },
        SchemaNode::Bool => json!({ "bsonType": "bool" }),
        SchemaNode::Date => json!({ "bsonType": "date" }),
        SchemaNode::Object(o) => object_to_json(o),
        SchemaNode::Array(a) => json!({ "bsonType": "array", "items": node_to_json(&a.items) }),
    }
}

fn object_to_json(schema: &ObjectSchema) -> Json {
    let mut properties = Map::new();
    for prop in &schema.properties {
        let mut node = node_to_json(&prop.node);
        if let (Some(desc), Some(map)) = (&prop.description, node.as_object_mut()) {
            map.insert("description".into(), Json::String(desc.clone()));
        }
        properties.insert(prop.name.clone(), node);
    }

    let mut map = Map::new();
    map.insert("bsonType".into(), json!("object"));
    if !schema.required.is_empty() {
        map.insert("required".into(), json!(schema.required));
    }
    map.insert("properties".into(), Json::Object(properties));
    if !schema.additional_properties {
        map.insert("additionalProperties".into(), Json::Bool(false));
    }
    Json::Object(map)
}
