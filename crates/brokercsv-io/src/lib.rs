#![forbid(unsafe_code)]
//! brokercsv-io: byte decoding and CSV extraction.
//!
//! `CharReader` turns a byte stream into characters with strict charset
//! decoding. `CsvExtractor` tokenizes a character stream against a
//! `RecordSchema` and yields records lazily, one row per pull.

pub mod csv;
pub mod decode;
pub mod error;

pub use csv::{CsvExtractionError, CsvExtractor, Records};
pub use decode::{CharReader, Charset};
pub use error::{Error, Result};
