//! Date, time and date-time columns parsed with `chrono` format patterns.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::TextConverter;
use crate::error::ConversionError;
use crate::value::{Value, ValueType};

/// Parses text against a strftime-style pattern (e.g. `%d-%m-%Y`).
///
/// A value that does not match the pattern is a `ConversionError`, never a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalConverter {
    target: ValueType,
    format: Cow<'static, str>,
}

impl TemporalConverter {
    pub fn date(format: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target: ValueType::Date,
            format: format.into(),
        }
    }

    pub fn time(format: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target: ValueType::Time,
            format: format.into(),
        }
    }

    pub fn date_time(format: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target: ValueType::DateTime,
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl TextConverter for TemporalConverter {
    fn target_type(&self) -> ValueType {
        self.target
    }

    fn parse(&self, trimmed: &str) -> Result<Value, ConversionError> {
        let fmt = self.format.as_ref();
        let parsed = match self.target {
            ValueType::Date => NaiveDate::parse_from_str(trimmed, fmt).map(Value::Date),
            ValueType::Time => NaiveTime::parse_from_str(trimmed, fmt).map(Value::Time),
            _ => NaiveDateTime::parse_from_str(trimmed, fmt).map(Value::DateTime),
        };
        parsed.map_err(|_| ConversionError::InvalidTemporal {
            format: self.format.to_string(),
            value: trimmed.to_string(),
        })
    }
}
