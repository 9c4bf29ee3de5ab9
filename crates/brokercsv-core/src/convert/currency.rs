use super::TextConverter;
use crate::error::ConversionError;
use crate::value::{Value, ValueType};

/// ISO 4217 style currency code: exactly three upper-case ASCII letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyConverter;

impl TextConverter for CurrencyConverter {
    fn target_type(&self) -> ValueType {
        ValueType::Text
    }

    fn parse(&self, trimmed: &str) -> Result<Value, ConversionError> {
        if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ConversionError::InvalidCurrency(trimmed.to_string()));
        }
        Ok(Value::Text(trimmed.to_string()))
    }
}
