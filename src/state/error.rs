//! Store error types.

use thiserror::Error;

use super::PanelKey;

/// A token in comma separated numeric input that is not a number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{token}' at position {position} is not a number")]
pub struct ParseError {
    pub token: String,
    pub position: usize,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("Unknown {field} '{value}'")]
    UnknownVariant { field: &'static str, value: String },
    #[error("Unrecognized color '{0}'")]
    InvalidColor(String),
    #[error("Expected {expected} values, got {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("Value at position {position} must be a finite non-negative number, got {value}")]
    InvalidValue { position: usize, value: f64 },
    #[error("Scale factor must be finite and non-negative, got {0}")]
    InvalidFactor(f64),
    #[error("Panel '{panel}' has no field '{field}'")]
    UnknownField { panel: PanelKey, field: String },
    #[error("'{field}' of panel '{panel}' does not accept '{value}'")]
    InvalidFieldValue {
        panel: PanelKey,
        field: String,
        value: String,
    },
    #[error("Panel '{panel}' does not support {operation}")]
    Unsupported {
        panel: PanelKey,
        operation: &'static str,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}
