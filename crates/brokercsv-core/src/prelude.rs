//! Convenient re-exports for downstream crates.

pub use crate::config::ExtractorConfig;
pub use crate::convert::{
    Converter, CurrencyConverter, DecimalConverter, StringConverter, TemporalConverter,
    TextConverter,
};
pub use crate::error::{ConversionError, Error, Result};
pub use crate::record::Record;
pub use crate::schema::{Field, FieldSchema, RecordSchema};
pub use crate::value::{FieldValue, Value, ValueType};
