//! Catalog of collection definitions persisted on disk
//!
//! - Definitions stored at `<data_dir>/metadata/collections/<name>.json`
//! - One file per collection, never overwritten
//! - Malformed definitions abort loading (FATAL)

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::collection::ValidatedCollection;
use super::errors::{CollectionError, CollectionResult};
use super::options::{CollectionOptions, ValidationAction, ValidationLevel};
use crate::observability::Event;
use crate::schema::{CompiledSchema, SchemaCompiler, SchemaError, ValidatorOptions};

/// Persisted description of a validated collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDefinition {
    pub name: String,
    /// `{"$jsonSchema": {...}}`
    pub validator: Json,
    #[serde(default)]
    pub validation_level: ValidationLevel,
    #[serde(default)]
    pub validation_action: ValidationAction,
    /// Fields with a unique index
    #[serde(default)]
    pub unique: Vec<String>,
}

impl CollectionDefinition {
    pub fn new(name: impl Into<String>, schema: &CompiledSchema) -> Self {
        Self {
            name: name.into(),
            validator: serde_json::json!({ "$jsonSchema": schema.to_json() }),
            validation_level: ValidationLevel::default(),
            validation_action: ValidationAction::default(),
            unique: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: ValidationLevel) -> Self {
        self.validation_level = level;
        self
    }

    pub fn with_action(mut self, action: ValidationAction) -> Self {
        self.validation_action = action;
        self
    }

    pub fn with_unique(mut self, fields: &[&str]) -> Self {
        self.unique = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

struct CatalogEntry {
    definition: CollectionDefinition,
    schema: Arc<CompiledSchema>,
}

/// Registry of collection definitions backed by a directory.
pub struct Catalog {
    /// Directory containing definition files
    dir: PathBuf,
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Creates a catalog for the given data directory.
    ///
    /// Definition files are expected at `<data_dir>/metadata/collections/`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("metadata").join("collections"),
            entries: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every definition file in the catalog directory.
    ///
    /// A missing directory means an empty catalog.
    pub fn load_all(&mut self) -> CollectionResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            self.load_file(&path)?;
        }

        tracing::info!(
            event = Event::CatalogLoaded.as_str(),
            collections = self.entries.len()
        );
        Ok(())
    }

    fn load_file(&mut self, path: &Path) -> CollectionResult<()> {
        let location = path.display().to_string();
        let content = fs::read_to_string(path)?;

        let definition: CollectionDefinition = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(&location, format!("Invalid JSON: {}", e))
        })?;
        let schema = compile_logged(&definition)?;

        self.entries.insert(
            definition.name.clone(),
            CatalogEntry {
                definition,
                schema: Arc::new(schema),
            },
        );
        Ok(())
    }

    /// Compiles, persists and registers a new collection.
    ///
    /// The definition file is created exclusively: an existing file is
    /// never replaced, even by a concurrent writer.
    ///
    /// # Errors
    ///
    /// - `InvalidCollectionName` if the name cannot be a file name
    /// - `CollectionExists` if the name is registered or its file exists
    /// - `Schema` (FATAL) if the validator does not compile
    pub fn create_collection(&mut self, definition: CollectionDefinition) -> CollectionResult<PathBuf> {
        check_name(&definition.name)?;
        if self.entries.contains_key(&definition.name) {
            return Err(CollectionError::CollectionExists(definition.name));
        }

        let schema = compile_logged(&definition)?;
        let content = serde_json::to_string_pretty(&definition)
            .map_err(|e| CollectionError::Io(format!("Failed to serialize definition: {}", e)))?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", definition.name));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(CollectionError::CollectionExists(definition.name));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        tracing::info!(
            event = Event::CollectionCreated.as_str(),
            collection = %definition.name,
            level = %definition.validation_level,
            action = %definition.validation_action
        );

        self.entries.insert(
            definition.name.clone(),
            CatalogEntry {
                definition,
                schema: Arc::new(schema),
            },
        );
        Ok(path)
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDefinition> {
        self.entries.get(name).map(|e| &e.definition)
    }

    /// The compiled schema of a collection, shared.
    pub fn schema(&self, name: &str) -> Option<Arc<CompiledSchema>> {
        self.entries.get(name).map(|e| Arc::clone(&e.schema))
    }

    /// Opens an empty in-memory collection configured from its definition.
    pub fn open(&self, name: &str, validator: ValidatorOptions) -> CollectionResult<ValidatedCollection> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| CollectionError::UnknownCollection(name.to_string()))?;

        let mut options = CollectionOptions::new(Arc::clone(&entry.schema))
            .with_level(entry.definition.validation_level)
            .with_action(entry.definition.validation_action)
            .with_validator(validator);
        options.unique_fields = entry.definition.unique.clone();

        Ok(ValidatedCollection::new(name, options))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collection names become file names: no separators, no dot segments.
fn check_name(name: &str) -> CollectionResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(CollectionError::InvalidCollectionName(name.to_string()));
    }
    Ok(())
}

fn compile_logged(definition: &CollectionDefinition) -> CollectionResult<CompiledSchema> {
    SchemaCompiler::compile(&definition.validator).map_err(|e| {
        tracing::error!(
            event = Event::SchemaCompileFailed.as_str(),
            fatal = true,
            collection = %definition.name,
            error = %e.message()
        );
        CollectionError::from(e)
    })
}
