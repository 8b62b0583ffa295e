//! Validation outcomes
//!
//! A failed check is data, not an error: the validator returns
//! `ValidationResult::Rejected` with the violations it found and leaves it
//! to the caller to refuse the write or merely warn.

use serde_json::{json, Value as Json};
use std::fmt;

/// Which length bound a string broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBound {
    Min(usize),
    Max(usize),
}

impl fmt::Display for LengthBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthBound::Min(n) => write!(f, "at least {} characters", n),
            LengthBound::Max(n) => write!(f, "at most {} characters", n),
        }
    }
}

/// The constraint a field broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingField,
    UnknownField,
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    PatternMismatch {
        pattern: String,
    },
    LengthOutOfRange {
        bound: LengthBound,
        actual: usize,
    },
    ValueBelowMinimum {
        minimum: i64,
        actual: i64,
    },
}

impl ViolationKind {
    /// Stable name of the violation class
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "MissingField",
            ViolationKind::UnknownField => "UnknownField",
            ViolationKind::TypeMismatch { .. } => "TypeMismatch",
            ViolationKind::PatternMismatch { .. } => "PatternMismatch",
            ViolationKind::LengthOutOfRange { .. } => "LengthOutOfRange",
            ViolationKind::ValueBelowMinimum { .. } => "ValueBelowMinimum",
        }
    }
}

/// One violated constraint, located by dot-separated field path.
///
/// Array elements are addressed as `field[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::MissingField)
    }

    pub fn unknown_field(path: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::UnknownField)
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::new(path, ViolationKind::TypeMismatch { expected, actual })
    }

    pub fn pattern_mismatch(path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(
            path,
            ViolationKind::PatternMismatch {
                pattern: pattern.into(),
            },
        )
    }

    pub fn length_out_of_range(path: impl Into<String>, bound: LengthBound, actual: usize) -> Self {
        Self::new(path, ViolationKind::LengthOutOfRange { bound, actual })
    }

    pub fn value_below_minimum(path: impl Into<String>, minimum: i64, actual: i64) -> Self {
        Self::new(path, ViolationKind::ValueBelowMinimum { minimum, actual })
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable reason, without the field path
    pub fn reason(&self) -> String {
        match &self.kind {
            ViolationKind::MissingField => "required field is missing".to_string(),
            ViolationKind::UnknownField => "field is not declared in the schema".to_string(),
            ViolationKind::TypeMismatch { expected, actual } => {
                format!("expected {}, got {}", expected, actual)
            }
            ViolationKind::PatternMismatch { pattern } => {
                format!("value does not match pattern {}", pattern)
            }
            ViolationKind::LengthOutOfRange { bound, actual } => {
                format!("length {} is out of range, expected {}", actual, bound)
            }
            ViolationKind::ValueBelowMinimum { minimum, actual } => {
                format!("value {} is below minimum {}", actual, minimum)
            }
        }
    }

    pub fn to_json(&self) -> Json {
        json!({
            "path": self.path,
            "code": self.code(),
            "reason": self.reason(),
        })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.code(), self.path, self.reason())
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    Rejected(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Accepted => &[],
            ValidationResult::Rejected(v) => v,
        }
    }

    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            ValidationResult::Accepted => Vec::new(),
            ValidationResult::Rejected(v) => v,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            ValidationResult::Accepted => json!({ "result": "accepted" }),
            ValidationResult::Rejected(violations) => json!({
                "result": "rejected",
                "violations": violations.iter().map(Violation::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}
