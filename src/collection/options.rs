//! Validation level and action for a collection
//!
//! - level `strict`: every insert and replace is validated
//! - level `off`: the schema is ignored on writes
//! - action `error`: a rejected document is refused
//! - action `warn`: a rejected document is stored and the violations logged

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::schema::{CompiledSchema, ValidatorOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    #[default]
    Strict,
    Off,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Strict => "strict",
            ValidationLevel::Off => "off",
        }
    }
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ValidationLevel::Strict),
            "off" => Ok(ValidationLevel::Off),
            other => Err(format!(
                "Invalid validation level '{}'. Must be 'strict' or 'off'.",
                other
            )),
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    #[default]
    Error,
    Warn,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationAction::Error => "error",
            ValidationAction::Warn => "warn",
        }
    }
}

impl FromStr for ValidationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(ValidationAction::Error),
            "warn" => Ok(ValidationAction::Warn),
            other => Err(format!(
                "Invalid validation action '{}'. Must be 'error' or 'warn'.",
                other
            )),
        }
    }
}

impl fmt::Display for ValidationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a collection needs to police its writes
#[derive(Debug, Clone)]
pub struct CollectionOptions {
    pub schema: Arc<CompiledSchema>,
    pub level: ValidationLevel,
    pub action: ValidationAction,
    pub validator: ValidatorOptions,
    /// Top-level fields whose values must be unique across documents
    pub unique_fields: Vec<String>,
}

impl CollectionOptions {
    /// `strict` + `error`, default validator options, no unique fields.
    pub fn new(schema: Arc<CompiledSchema>) -> Self {
        Self {
            schema,
            level: ValidationLevel::default(),
            action: ValidationAction::default(),
            validator: ValidatorOptions::default(),
            unique_fields: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: ValidationLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_action(mut self, action: ValidationAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_validator(mut self, validator: ValidatorOptions) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_unique(mut self, field: impl Into<String>) -> Self {
        self.unique_fields.push(field.into());
        self
    }
}
