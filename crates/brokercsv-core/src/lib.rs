#![forbid(unsafe_code)]
//! brokercsv-core: typed values, converters, field/record schemas and records.
//!
//! Everything in here is immutable once built and safe to share between
//! threads. The extraction engine in `brokercsv-io` consumes these types; this
//! crate itself never touches a stream.

pub mod config;
pub mod convert;
pub mod error;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod value;

pub use config::ExtractorConfig;
pub use error::{ConversionError, Error, Result};
pub use record::Record;
pub use schema::{Field, FieldSchema, RecordSchema};
pub use value::{FieldValue, Value, ValueType};
