//! clientedb - Schema validation for the customer document collection
//!
//! Documents bound for the `clientes` collection are checked against a
//! declarative, recursive schema before they are stored. The validator is
//! pure and deterministic; the collection layer decides whether a
//! rejection refuses the write or only warns.

pub mod cli;
pub mod collection;
pub mod customer;
pub mod document;
pub mod observability;
pub mod schema;
