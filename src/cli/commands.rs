//! CLI command implementations
//!
//! - init: create the data directory and persist the `clientes` definition
//! - validate: check one document against the stored schema
//! - schema: print the stored definition

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::collection::Catalog;
use crate::customer::{clientes_definition, CLIENTES};
use crate::document::Document;
use crate::observability::Event;
use crate::schema::ValidationResult;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_file, read_request, write_lines, write_response};

/// Main CLI entry point
///
/// Parses arguments, installs logging and dispatches to the command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    crate::observability::init_logging(crate::observability::DEFAULT_LOG_FILTER);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Validate { config, file } => validate(&config, file.as_deref()),
        Command::Schema { config } => schema(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    tracing::info!(event = Event::ConfigLoaded.as_str(), data_dir = %config.data_dir);
    Ok(config)
}

fn open_catalog(config: &Config) -> CliResult<Catalog> {
    let mut catalog = Catalog::new(config.data_path());
    catalog.load_all()?;
    if catalog.get(CLIENTES).is_none() {
        return Err(CliError::not_initialized());
    }
    Ok(catalog)
}

/// Create the data directory and the `clientes` collection.
///
/// Prints two confirmation lines on success. Fails if the collection
/// already exists.
pub fn init(config_path: &Path) -> CliResult<()> {
    tracing::info!(event = Event::SetupBegin.as_str());
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::setup_failed(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;

    let definition = clientes_definition(config.validation_level, config.validation_action)
        .map_err(|e| CliError::setup_failed(e.to_string()))?;

    let mut catalog = Catalog::new(data_dir);
    catalog.create_collection(definition)?;

    tracing::info!(event = Event::SetupComplete.as_str());
    write_lines(&[
        "Collection 'clientes' created successfully!",
        "Schema validation configured",
    ])
}

/// Validate one document against `clientes`.
///
/// Checks the schema whatever the collection's validation level: level
/// and action govern writes, and this command writes nothing. A rejection
/// is a successful run: the violations are the output.
pub fn validate(config_path: &Path, file: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let result = validate_input(&config, file)?;
    write_response(result.to_json())
}

fn validate_input(config: &Config, file: Option<&Path>) -> CliResult<ValidationResult> {
    let catalog = open_catalog(config)?;

    let input = match file {
        Some(path) => read_file(path)?,
        None => read_request()?,
    };
    let document = Document::from_json(&input)?;

    let collection = catalog.open(CLIENTES, config.validator_options())?;
    Ok(collection.validate(&document))
}

/// Print the stored `clientes` definition.
pub fn schema(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(stored_definition(&config)?)
}

fn stored_definition(config: &Config) -> CliResult<Value> {
    let catalog = open_catalog(config)?;
    let definition = catalog
        .get(CLIENTES)
        .ok_or_else(CliError::not_initialized)?;
    Ok(serde_json::to_value(definition)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use crate::observability::capture;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &Path, extra: Value) -> std::path::PathBuf {
        let mut config = json!({ "data_dir": dir.join("data").to_string_lossy() });
        if let (Some(base), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let path = dir.join("clientedb.json");
        fs::write(&path, config.to_string()).unwrap();
        path
    }

    fn write_doc(dir: &Path, doc: Value) -> std::path::PathBuf {
        let path = dir.join("doc.json");
        fs::write(&path, doc.to_string()).unwrap();
        path
    }

    fn valid_doc() -> Value {
        json!({
            "clienteId": "0b7c6f1e-5a4d-4c3b-9a2e-1f0e9d8c7b6a",
            "nomeCliente": "Maria Silva",
            "emailCliente": "maria@example.com",
            "cpfCliente": "12345678901",
            "ativo": true,
            "dataCadastro": { "$date": "2024-01-15T10:30:00Z" },
            "dataUltimaAtualizacao": { "$date": "2024-01-15T10:30:00Z" }
        })
    }

    #[test]
    fn test_init_creates_definition() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({}));

        init(&config_path).unwrap();

        let definition = temp_dir
            .path()
            .join("data/metadata/collections/clientes.json");
        let stored: Value = serde_json::from_str(&fs::read_to_string(definition).unwrap()).unwrap();
        assert_eq!(stored["name"], "clientes");
        assert_eq!(stored["validationLevel"], "strict");
        assert_eq!(stored["validationAction"], "error");
        assert_eq!(stored["validator"]["$jsonSchema"]["bsonType"], "object");
    }

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({}));

        init(&config_path).unwrap();
        let err = init(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_init_uses_configured_action() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({ "validation_action": "warn" }));
        init(&config_path).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(stored_definition(&config).unwrap()["validationAction"], "warn");
    }

    #[test]
    fn test_validate_accepts_and_rejects() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({}));
        init(&config_path).unwrap();
        let config = Config::load(&config_path).unwrap();

        let good = write_doc(temp_dir.path(), valid_doc());
        assert!(validate_input(&config, Some(good.as_path())).unwrap().is_accepted());

        let mut doc = valid_doc();
        doc["cpfCliente"] = json!("123.456.789-01");
        let bad = write_doc(temp_dir.path(), doc);
        let result = validate_input(&config, Some(bad.as_path())).unwrap();
        let out = result.to_json();
        assert_eq!(out["result"], "rejected");
        assert_eq!(out["violations"][0]["path"], "cpfCliente");
    }

    #[test]
    fn test_validate_honours_unknown_field_policy() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            write_config(temp_dir.path(), json!({ "unknown_fields": "reject_at_root" }));
        init(&config_path).unwrap();
        let config = Config::load(&config_path).unwrap();

        let mut doc = valid_doc();
        doc["apelido"] = json!("Mari");
        let path = write_doc(temp_dir.path(), doc);
        let result = validate_input(&config, Some(path.as_path())).unwrap();
        assert_eq!(result.violations().len(), 1);
        assert_eq!(result.violations()[0].path, "apelido");
    }

    #[test]
    fn test_validate_before_init_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({}));
        let config = Config::load(&config_path).unwrap();

        let path = write_doc(temp_dir.path(), valid_doc());
        let err = validate_input(&config, Some(path.as_path())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_validate_non_object_input() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({}));
        init(&config_path).unwrap();
        let config = Config::load(&config_path).unwrap();

        let path = write_doc(temp_dir.path(), json!([1, 2, 3]));
        let err = validate_input(&config, Some(path.as_path())).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidDocument);
    }

    #[test]
    fn test_config_event_carries_only_shared_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({ "validation_level": "off" }));

        let events = capture::events(|| {
            load_config(&config_path).unwrap();
        });

        let fields = capture::find(&events, "CONFIG_LOADED").unwrap();
        assert!(fields["data_dir"].as_str().unwrap().ends_with("data"));
        assert!(fields.get("validation_level").is_none());
        assert!(fields.get("validation_action").is_none());
    }

    #[test]
    fn test_validate_ignores_off_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(temp_dir.path(), json!({ "validation_level": "off" }));
        init(&config_path).unwrap();
        let config = Config::load(&config_path).unwrap();

        let mut doc = valid_doc();
        doc["versao"] = json!(-1);
        let path = write_doc(temp_dir.path(), doc);
        let result = validate_input(&config, Some(path.as_path())).unwrap();
        assert_eq!(result.violations()[0].path, "versao");
    }
}
