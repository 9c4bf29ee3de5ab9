//! Runtime value model shared by converters, records and the extraction engine.
//!
//! A column's semantic type is carried as a `ValueType` descriptor and the
//! value itself as a `Value` tagged union. Typed access goes through the
//! `FieldValue` trait, which performs a checked cast instead of a coercion.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Text,
    Decimal,
    Date,
    Time,
    DateTime,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Text => "text",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::DateTime => "date-time",
        };
        f.write_str(name)
    }
}

/// A single non-null column value. Absent values are `Option::None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Date(_) => ValueType::Date,
            Value::Time(_) => ValueType::Time,
            Value::DateTime(_) => ValueType::DateTime,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => f.write_str(v),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
        }
    }
}

/// Rust types that can be stored in a `Value` and read back through a typed field.
pub trait FieldValue: Sized + 'static {
    const VALUE_TYPE: ValueType;

    /// Borrow the payload if `value` carries this type.
    fn cast(value: &Value) -> Option<&Self>;
}

macro_rules! impl_field_value {
    ($ty:ty, $variant:ident) => {
        impl FieldValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn cast(value: &Value) -> Option<&Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_field_value!(String, Text);
impl_field_value!(BigDecimal, Decimal);
impl_field_value!(NaiveDate, Date);
impl_field_value!(NaiveTime, Time);
impl_field_value!(NaiveDateTime, DateTime);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cast_matches_variant_only() {
        let v = Value::Decimal(BigDecimal::from_str("1.5").unwrap());
        assert_eq!(v.value_type(), ValueType::Decimal);
        assert!(BigDecimal::cast(&v).is_some());
        assert!(String::cast(&v).is_none());
    }

    #[test]
    fn test_serialize_untagged() {
        let v = Value::Date(NaiveDate::from_ymd_opt(2022, 7, 20).unwrap());
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"2022-07-20\"");
        let v = Value::from("EUR");
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"EUR\"");
    }
}
