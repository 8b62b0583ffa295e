//! Validated collections
//!
//! Applies validation level (`strict` / `off`) and action (`error` /
//! `warn`) at the write boundary, enforces unique fields, and keeps
//! collection definitions in an on-disk catalog.

mod catalog;
#[allow(clippy::module_inception)]
mod collection;
mod errors;
mod options;

pub use catalog::{Catalog, CollectionDefinition};
pub use collection::{ValidatedCollection, WriteOutcome};
pub use errors::{CollectionError, CollectionResult};
pub use options::{CollectionOptions, ValidationAction, ValidationLevel};
