//! Configuration file
//!
//! Only `data_dir` is required. Level, action, report mode and unknown
//! field policy default to `strict`, `error`, `all` and `as_declared`.
//! Unknown enum values fail deserialization and surface as config errors.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::collection::{ValidationAction, ValidationLevel};
use crate::schema::{ReportMode, UnknownFieldPolicy, ValidatorOptions};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    #[serde(default)]
    pub validation_level: ValidationLevel,

    #[serde(default)]
    pub validation_action: ValidationAction,

    #[serde(default)]
    pub report_mode: ReportMode,

    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            report: self.report_mode,
            unknown_fields: self.unknown_fields,
        }
    }
}
