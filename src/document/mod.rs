//! Document model for clientedb
//!
//! A document is an ordered mapping from field name to a dynamically typed
//! value. Documents are ephemeral: one per write or validation call, owned
//! by the caller.
//!
//! # Type names
//!
//! Values report BSON-style type names (`string`, `int`, `long`, `double`,
//! `bool`, `date`, `object`, `array`, `null`) so that validation messages
//! read the same way as the schema definition.

mod errors;
mod json;
mod value;

pub use errors::{DocumentError, DocumentResult};
pub use value::{Document, Value};
