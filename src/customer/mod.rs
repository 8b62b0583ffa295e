//! Customer domain: the `clientes` collection
//!
//! Holds the static schema definition and the entity types whose
//! documents the schema validates.

mod entity;
mod schema;

pub use entity::{Cliente, Endereco, Metadata};
pub use schema::{
    clientes_definition, clientes_schema, clientes_schema_json, compile_clientes_schema,
    CEP_PATTERN, CLIENTES, CLIENTE_ID_PATTERN, CPF_PATTERN, EMAIL_PATTERN, TELEFONE_PATTERN,
    UNIQUE_FIELDS,
};
