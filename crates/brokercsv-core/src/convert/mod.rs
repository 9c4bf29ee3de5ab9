//! Text-to-value converters.
//!
//! Every converter in this module is a text converter: the input is trimmed,
//! blank input yields `None` without reaching the type-specific step, and a
//! malformed value is reported as a `ConversionError`.

mod currency;
mod decimal;
mod temporal;

use std::fmt::Debug;

use crate::error::{ConversionError, Error, Result};
use crate::value::{Value, ValueType};

pub use currency::CurrencyConverter;
pub use decimal::DecimalConverter;
pub use temporal::TemporalConverter;

/// Stateless value converter attached to a field.
pub trait Converter: Debug + Send + Sync {
    fn source_type(&self) -> ValueType {
        ValueType::Text
    }

    fn target_type(&self) -> ValueType;

    fn convert(&self, source: &str) -> std::result::Result<Option<Value>, ConversionError>;

    /// Check that `source` has the declared source type, then convert it.
    fn cast_and_convert(&self, source: &Value) -> Result<Option<Value>> {
        match source.as_text() {
            Some(text) if self.source_type() == ValueType::Text => Ok(self.convert(text)?),
            _ => Err(Error::TypeMismatch {
                expected: self.source_type(),
                actual: source.value_type(),
            }),
        }
    }
}

/// The type-specific half of a text converter. `parse` only ever sees trimmed,
/// non-empty input.
pub trait TextConverter: Debug + Send + Sync {
    fn target_type(&self) -> ValueType;

    fn parse(&self, trimmed: &str) -> std::result::Result<Value, ConversionError>;
}

impl<C: TextConverter> Converter for C {
    fn target_type(&self) -> ValueType {
        TextConverter::target_type(self)
    }

    fn convert(&self, source: &str) -> std::result::Result<Option<Value>, ConversionError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        self.parse(trimmed).map(Some)
    }
}

/// Plain text column: trimmed, blank becomes `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl TextConverter for StringConverter {
    fn target_type(&self) -> ValueType {
        ValueType::Text
    }

    fn parse(&self, trimmed: &str) -> std::result::Result<Value, ConversionError> {
        Ok(Value::Text(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_string_converter_trims_and_nulls_blank() {
        assert_eq!(
            StringConverter.convert("  abc ").unwrap(),
            Some(Value::from("abc"))
        );
        assert_eq!(StringConverter.convert(" \t ").unwrap(), None);
        assert_eq!(StringConverter.convert("").unwrap(), None);
    }

    #[test]
    fn test_cast_and_convert_text() {
        let out = DecimalConverter::DECIMAL_POINT
            .cast_and_convert(&Value::from("1,234.5"))
            .unwrap();
        assert_eq!(
            out,
            Some(Value::Decimal(BigDecimal::from_str("1234.5").unwrap()))
        );
    }

    #[test]
    fn test_cast_and_convert_rejects_non_text() {
        let err = StringConverter
            .cast_and_convert(&Value::Decimal(BigDecimal::from(1)))
            .unwrap_err();
        match err {
            Error::TypeMismatch { expected, actual } => {
                assert_eq!(expected, ValueType::Text);
                assert_eq!(actual, ValueType::Decimal);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cast_and_convert_propagates_conversion_error() {
        let err = CurrencyConverter
            .cast_and_convert(&Value::from("eur"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Conversion(ConversionError::InvalidCurrency(_))
        ));
    }
}
