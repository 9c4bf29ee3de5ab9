#![forbid(unsafe_code)]
//! brokercsv-degiro: the DEGIRO transactions export.
//!
//! The export is a comma separated Latin-1 file with one header row and
//! nineteen columns. Decimals use a dot as decimal mark.

pub mod fields;

use std::sync::Arc;

use brokercsv_core::{ExtractorConfig, RecordSchema};
use brokercsv_io::{CsvExtractor, Result};

pub use fields::{fields, schema};

pub const BROKER_ID: &str = "DEGIRO";

/// Hands out extractors preconfigured for the DEGIRO export.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegiroProvider;

impl DegiroProvider {
    pub fn broker_id(&self) -> &'static str {
        BROKER_ID
    }

    pub fn schema(&self) -> brokercsv_core::Result<Arc<RecordSchema>> {
        fields::schema()
    }

    /// Extractor settings of the export: `,` separator, one header row, Latin-1.
    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig {
            field_separator: ',',
            skip_count: 1,
            charset: "ISO-8859-1".to_string(),
            ..ExtractorConfig::default()
        }
    }

    pub fn extractor(&self) -> Result<CsvExtractor> {
        CsvExtractor::new(self.schema()?, &self.config())
    }
}
