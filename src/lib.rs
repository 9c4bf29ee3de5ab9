#![forbid(unsafe_code)]
//! brokercsv: typed extraction of broker CSV exports.
//!
//! - [`core`]: values, converters, field and record schemas, configuration
//! - [`io`]: charset decoding and the CSV extraction engine
//! - [`degiro`]: the DEGIRO transactions export
//!
//! ```no_run
//! use brokercsv::degiro::{fields, DegiroProvider};
//!
//! # fn main() -> brokercsv::io::Result<()> {
//! let file = std::fs::File::open("Transactions.csv")?;
//! for record in DegiroProvider.extractor()?.extract_reader(file) {
//!     let record = record?;
//!     println!("{:?} {:?}", record.value(&fields::ISIN)?, record.value(&fields::TOTAL)?);
//! }
//! # Ok(())
//! # }
//! ```

pub use brokercsv_core as core;
pub use brokercsv_degiro as degiro;
pub use brokercsv_io as io;

pub use brokercsv_core::prelude::*;
pub use brokercsv_io::{CharReader, Charset, CsvExtractionError, CsvExtractor, Records};
