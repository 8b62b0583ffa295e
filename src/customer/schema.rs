//! The `clientes` collection schema
//!
//! Declared once as a static definition and compiled lazily on first use.
//! The compiled schema lives for the rest of the process.

use serde_json::{json, Value as Json};
use std::sync::OnceLock;

use crate::collection::{CollectionDefinition, ValidationAction, ValidationLevel};
use crate::schema::{CompiledSchema, SchemaCompiler, SchemaResult};

/// Collection name
pub const CLIENTES: &str = "clientes";

/// Fields carrying a unique index
pub const UNIQUE_FIELDS: &[&str] = &["clienteId", "emailCliente", "cpfCliente"];

pub const CLIENTE_ID_PATTERN: &str =
    "^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
pub const CPF_PATTERN: &str = "^[0-9]{11}$";
pub const TELEFONE_PATTERN: &str = "^[0-9]{10,11}$";
pub const CEP_PATTERN: &str = "^[0-9]{8}$";

/// The `$jsonSchema` definition of a customer document.
pub fn clientes_schema_json() -> Json {
    json!({
        "bsonType": "object",
        "required": [
            "clienteId",
            "nomeCliente",
            "emailCliente",
            "cpfCliente",
            "ativo",
            "dataCadastro",
            "dataUltimaAtualizacao"
        ],
        "properties": {
            "clienteId": {
                "bsonType": "string",
                "description": "Unique customer UUID",
                "pattern": CLIENTE_ID_PATTERN
            },
            "nomeCliente": {
                "bsonType": "string",
                "minLength": 3,
                "maxLength": 100,
                "description": "Customer full name"
            },
            "emailCliente": {
                "bsonType": "string",
                "pattern": EMAIL_PATTERN,
                "description": "Valid e-mail address"
            },
            "cpfCliente": {
                "bsonType": "string",
                "pattern": CPF_PATTERN,
                "description": "CPF with 11 numeric digits"
            },
            "telefone": {
                "bsonType": "string",
                "pattern": TELEFONE_PATTERN,
                "description": "Phone with 10 or 11 digits"
            },
            "endereco": {
                "bsonType": "object",
                "description": "Customer address",
                "properties": {
                    "rua": { "bsonType": "string", "maxLength": 200 },
                    "numero": { "bsonType": "string", "maxLength": 20 },
                    "complemento": { "bsonType": "string", "maxLength": 100 },
                    "bairro": { "bsonType": "string", "maxLength": 100 },
                    "cidade": { "bsonType": "string", "maxLength": 100 },
                    "estado": {
                        "bsonType": "string",
                        "minLength": 2,
                        "maxLength": 2,
                        "description": "State abbreviation (e.g. SP, RJ)"
                    },
                    "cep": {
                        "bsonType": "string",
                        "pattern": CEP_PATTERN,
                        "description": "CEP with 8 digits"
                    }
                }
            },
            "ativo": {
                "bsonType": "bool",
                "description": "Active flag"
            },
            "dataCadastro": {
                "bsonType": "date",
                "description": "Registration date"
            },
            "dataUltimaAtualizacao": {
                "bsonType": "date",
                "description": "Last update date"
            },
            "versao": {
                "bsonType": "int",
                "minimum": 0,
                "description": "Document version for optimistic concurrency"
            },
            "metadata": {
                "bsonType": "object",
                "description": "Additional metadata",
                "properties": {
                    "origem": {
                        "bsonType": "string",
                        "description": "Origin channel (web, mobile, api, migration)"
                    },
                    "canal": {
                        "bsonType": "string",
                        "description": "Specific registration channel"
                    },
                    "tags": {
                        "bsonType": "array",
                        "items": { "bsonType": "string" },
                        "description": "Categorization tags"
                    },
                    "notas": {
                        "bsonType": "string",
                        "maxLength": 500,
                        "description": "Free-form notes"
                    }
                }
            }
        }
    })
}

/// Compiles the customer schema. Fails only if the static definition is
/// broken, which aborts setup.
pub fn compile_clientes_schema() -> SchemaResult<CompiledSchema> {
    SchemaCompiler::compile(&clientes_schema_json())
}

/// The process-wide compiled customer schema.
///
/// # Errors
///
/// Returns the compile error on every call if the definition is malformed.
pub fn clientes_schema() -> SchemaResult<&'static CompiledSchema> {
    static SCHEMA: OnceLock<SchemaResult<CompiledSchema>> = OnceLock::new();
    SCHEMA
        .get_or_init(compile_clientes_schema)
        .as_ref()
        .map_err(Clone::clone)
}

/// Catalog definition for `clientes` with the given level and action.
pub fn clientes_definition(
    level: ValidationLevel,
    action: ValidationAction,
) -> SchemaResult<CollectionDefinition> {
    Ok(CollectionDefinition::new(CLIENTES, clientes_schema()?)
        .with_level(level)
        .with_action(action)
        .with_unique(UNIQUE_FIELDS))
}
