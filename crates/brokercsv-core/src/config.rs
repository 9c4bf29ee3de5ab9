//! Extractor configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Column separator. Must not be CR, LF or the quote character.
    pub field_separator: char,

    /// Leading rows (headers) that are tokenized but never converted or emitted.
    pub skip_count: usize,

    /// Hard cap on characters per logical record, line breaks included.
    pub max_record_chars: usize,

    /// Charset label used when the source is a byte stream.
    pub charset: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            field_separator: ',',
            skip_count: 0,
            max_record_chars: 64 * 1024,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `BROKERCSV_FIELD_SEPARATOR`: single separator character
    /// - `BROKERCSV_SKIP_COUNT`: number of header rows
    /// - `BROKERCSV_MAX_RECORD_CHARS`: character cap per record
    /// - `BROKERCSV_CHARSET`: charset label for byte input
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("BROKERCSV_FIELD_SEPARATOR") {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                cfg.field_separator = c;
            }
        }

        if let Ok(s) = std::env::var("BROKERCSV_SKIP_COUNT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.skip_count = v;
            }
        }

        if let Ok(s) = std::env::var("BROKERCSV_MAX_RECORD_CHARS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_record_chars = v;
            }
        }

        if let Ok(s) = std::env::var("BROKERCSV_CHARSET") {
            if !s.trim().is_empty() {
                cfg.charset = s.trim().to_string();
            }
        }

        cfg
    }

    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(self.field_separator, '\n' | '\r' | '"') {
            return Err(Error::Config(format!(
                "Field separator is invalid: {:?}",
                self.field_separator
            )));
        }
        if self.max_record_chars == 0 {
            return Err(Error::Config(
                "max_record_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
