use thiserror::Error;

use crate::csv::CsvExtractionError;

/// Result type local to brokercsv-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The stream or its decoder could not produce characters.
    #[error("error when reading input stream: {0}")]
    DataAccess(#[source] std::io::Error),

    /// Malformed CSV framing or an invalid field value.
    #[error(transparent)]
    Extraction(#[from] Box<CsvExtractionError>),

    #[error(transparent)]
    Core(#[from] brokercsv_core::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::DataAccess(e)
    }
}

impl From<CsvExtractionError> for Error {
    fn from(e: CsvExtractionError) -> Self {
        Error::Extraction(Box::new(e))
    }
}

impl Error {
    /// The positioned extraction failure, if this is one.
    pub fn as_extraction(&self) -> Option<&CsvExtractionError> {
        match self {
            Error::Extraction(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    pub fn is_data_access(&self) -> bool {
        matches!(self, Error::DataAccess(_))
    }
}
