use thiserror::Error;

use crate::value::ValueType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ValueType,
        actual: ValueType,
    },

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// A text value could not be turned into its target type.
///
/// Conversion failures are recoverable by the caller; the extraction engine
/// wraps them into a positioned extraction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("value contains invalid thousand separator: {0}")]
    InvalidGrouping(String),

    #[error("value contains invalid decimal separator: {0}")]
    InvalidDecimalMark(String),

    #[error("value contains invalid characters: {0}")]
    InvalidCharacters(String),

    #[error("value is not a valid number: {0}")]
    InvalidNumber(String),

    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("value cannot be converted to a temporal with format \"{format}\": {value}")]
    InvalidTemporal { format: String, value: String },
}
