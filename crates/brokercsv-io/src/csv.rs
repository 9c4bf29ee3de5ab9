//! CSV extraction: character stream in, lazily produced `Record`s out.
//!
//! The column layout is fixed by a `RecordSchema`: a row must supply at least
//! `max_ordinal + 1` fields, extra trailing fields are tokenized and dropped.
//! Fields may be enclosed in `"`; inside an enclosure `""` is a literal quote
//! and CR, LF or CRLF become a single `\n`. Outside an enclosure CR, LF or CRLF
//! end the row. A blank line marks the end of data: only further blank lines
//! may follow it.
//!
//! Extraction is pull-based. Nothing is read from the source until the next
//! record is requested, and at most one row is buffered.

use std::fmt;
use std::io::{self, Read};
use std::iter::Map;
use std::str::Chars;
use std::sync::Arc;

use brokercsv_core::{Error as CoreError, ExtractorConfig, Record, RecordSchema, Value};

use crate::decode::{CharReader, Charset};
use crate::error::{Error, Result};

const CR: char = '\r';
const LF: char = '\n';
const QUOTE: char = '"';

/// Character source produced by [`CsvExtractor::extract_str`].
pub type StrChars<'a> = Map<Chars<'a>, fn(char) -> io::Result<char>>;

/// Structural or content failure with its position in the input.
#[derive(Debug)]
pub struct CsvExtractionError {
    record_no: usize,
    line_no: usize,
    field_no: usize,
    line_pos: usize,
    invalid_value: Option<String>,
    message: String,
    cause: Option<CoreError>,
}

impl CsvExtractionError {
    /// One-based logical record number. Every row started counts, skipped
    /// header rows and blank lines included, so the number matches the row's
    /// position in the file.
    pub fn record_no(&self) -> usize {
        self.record_no
    }

    /// One-based physical line number.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// One-based field number within the record.
    pub fn field_no(&self) -> usize {
        self.field_no
    }

    /// One-based character position within the line.
    pub fn line_pos(&self) -> usize {
        self.line_pos
    }

    /// Raw text of the offending field, if a field value caused the failure.
    pub fn invalid_value(&self) -> Option<&str> {
        self.invalid_value.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CsvExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at record number {} at line number {} at field number {} at line position {}",
            self.record_no, self.line_no, self.field_no, self.line_pos
        )?;
        if let Some(v) = &self.invalid_value {
            write!(f, " with invalid value \"{v}\"")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for CsvExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Immutable extractor; cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct CsvExtractor {
    schema: Arc<RecordSchema>,
    field_separator: char,
    skip_count: usize,
    max_record_chars: usize,
    charset: Charset,
}

impl CsvExtractor {
    pub fn new(schema: impl Into<Arc<RecordSchema>>, config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let charset = Charset::for_label(&config.charset).ok_or_else(|| {
            CoreError::Config(format!("Unsupported charset: {}", config.charset))
        })?;
        let schema = schema.into();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            separator = ?config.field_separator,
            skip = config.skip_count,
            max_record_chars = config.max_record_chars,
            %charset,
            fields = schema.field_count(),
            "csv extractor configured"
        );

        Ok(Self {
            schema,
            field_separator: config.field_separator,
            skip_count: config.skip_count,
            max_record_chars: config.max_record_chars,
            charset,
        })
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn field_separator(&self) -> char {
        self.field_separator
    }

    pub fn skip_count(&self) -> usize {
        self.skip_count
    }

    pub fn max_record_chars(&self) -> usize {
        self.max_record_chars
    }

    /// Extract from any character source. I/O errors from the source are
    /// reported as `Error::DataAccess`.
    pub fn extract_chars<I>(&self, chars: I) -> Records<I::IntoIter>
    where
        I: IntoIterator<Item = io::Result<char>>,
    {
        Records::new(self, chars.into_iter())
    }

    pub fn extract_str<'a>(&self, input: &'a str) -> Records<StrChars<'a>> {
        let to_ok: fn(char) -> io::Result<char> = Ok;
        self.extract_chars(input.chars().map(to_ok))
    }

    /// Extract from bytes, decoded strictly with the configured charset.
    pub fn extract_reader<R: Read>(&self, reader: R) -> Records<CharReader<R>> {
        self.extract_chars(CharReader::new(reader, self.charset))
    }
}

/// Per-row tokenizer state; reset at the start of every row and after a blank line.
#[derive(Debug, Default)]
struct RowState {
    enclosed: bool,
    /// The previous character was a quote inside an enclosure.
    closing_quote: bool,
    record_pos: usize,
    line_pos: usize,
    field_index: usize,
    field_pos: usize,
    /// Line position of the last line break taken as data.
    break_pos: usize,
}

/// Forward-only sequence of records. Ends after end of input or the first error.
pub struct Records<I> {
    source: I,
    schema: Arc<RecordSchema>,
    field_separator: char,
    skip_count: usize,
    max_record_chars: usize,
    slot_count: usize,

    value: String,
    values: Vec<Option<Value>>,

    eof: bool,
    /// A blank line was seen; no more data rows are allowed.
    finished: bool,
    /// The last consumed character was a line-breaking CR.
    pending_cr: bool,
    done: bool,
    skipped: usize,
    line_no: usize,
    record_no: usize,
}

impl<I> Records<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    fn new(extractor: &CsvExtractor, source: I) -> Self {
        let slot_count = extractor.schema.slot_count();
        Self {
            source,
            schema: Arc::clone(&extractor.schema),
            field_separator: extractor.field_separator,
            skip_count: extractor.skip_count,
            max_record_chars: extractor.max_record_chars,
            slot_count,
            value: String::new(),
            values: vec![None; slot_count],
            eof: false,
            finished: false,
            pending_cr: false,
            done: false,
            skipped: 0,
            line_no: 0,
            record_no: 0,
        }
    }

    /// Physical lines started so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Logical rows started so far, header rows included.
    pub fn record_no(&self) -> usize {
        self.record_no
    }

    fn advance(&mut self) -> Result<Option<Record>> {
        while self.skipped < self.skip_count {
            if !self.read_row(false)? {
                return Ok(None);
            }
            self.skipped += 1;

            #[cfg(feature = "tracing")]
            tracing::trace!(record_no = self.record_no, "skipped header row");
        }
        if !self.read_row(true)? {
            return Ok(None);
        }
        let record = Record::new(Arc::clone(&self.schema), &self.values)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(record_no = self.record_no, line_no = self.line_no, "extracted record");

        Ok(Some(record))
    }

    /// Tokenize one row. Returns `false` when the input holds no further row.
    /// With `data == false` the row is validated structurally but not converted.
    fn read_row(&mut self, data: bool) -> Result<bool> {
        let mut row = RowState::default();
        self.value.clear();
        if data {
            self.values.fill(None);
        }

        loop {
            let c = match self.next_char()? {
                Some(c) => c,
                None => return self.end_of_input(data, &row),
            };
            if c == LF && self.pending_cr {
                // Second half of CRLF: no new line, but it still counts toward
                // the cap when the break was data inside an enclosure.
                self.pending_cr = false;
                if row.record_pos > 0 {
                    row.record_pos += 1;
                    if row.record_pos > self.max_record_chars {
                        row.line_pos = row.break_pos + 1;
                        return Err(self.error(
                            &row,
                            format!("Record exceeds {} characters", self.max_record_chars),
                        ));
                    }
                }
                continue;
            }
            self.pending_cr = false;

            if row.line_pos == 0 {
                if row.record_pos == 0 {
                    self.record_no += 1;
                }
                self.line_no += 1;
            }
            row.line_pos += 1;
            row.field_pos += 1;
            row.record_pos += 1;
            if row.record_pos > self.max_record_chars {
                return Err(self.error(
                    &row,
                    format!("Record exceeds {} characters", self.max_record_chars),
                ));
            }

            if c == CR || c == LF {
                self.pending_cr = c == CR;
                if row.enclosed && !row.closing_quote {
                    self.value.push(LF);
                    row.break_pos = row.line_pos;
                    row.line_pos = 0;
                } else if self.is_blank_line(&row) {
                    self.finished = true;
                    row = RowState::default();
                    self.value.clear();
                } else {
                    self.check_field_count(&row)?;
                    self.store_field(data, &row)?;
                    return Ok(true);
                }
            } else if c == QUOTE && (row.enclosed || row.field_pos == 1) {
                if row.field_pos == 1 {
                    row.enclosed = true;
                } else if row.closing_quote {
                    self.value.push(QUOTE);
                    row.closing_quote = false;
                } else {
                    row.closing_quote = true;
                }
            } else if c == self.field_separator && (!row.enclosed || row.closing_quote) {
                self.store_field(data, &row)?;
                row.enclosed = false;
                row.closing_quote = false;
                row.field_index += 1;
                row.field_pos = 0;
            } else {
                if row.enclosed && row.closing_quote {
                    return Err(self.error(&row, "Field has not been enclosed properly"));
                }
                self.value.push(c);
            }
        }
    }

    fn end_of_input(&mut self, data: bool, row: &RowState) -> Result<bool> {
        if self.is_blank_line(row) {
            return Ok(false);
        }
        if row.enclosed && !row.closing_quote {
            return Err(self.error(row, "Field has not been enclosed properly"));
        }
        self.check_field_count(row)?;
        self.store_field(data, row)?;
        Ok(true)
    }

    fn is_blank_line(&self, row: &RowState) -> bool {
        row.field_index == 0 && self.value.trim().is_empty()
    }

    fn check_field_count(&self, row: &RowState) -> Result<()> {
        if self.finished {
            return Err(self.error(
                row,
                format!("No more data expected in line {}", self.line_no),
            ));
        }
        let supplied = row.field_index + 1;
        if supplied < self.slot_count {
            return Err(self.error(
                row,
                format!(
                    "Record contains {} instead of {} fields",
                    supplied, self.slot_count
                ),
            ));
        }
        Ok(())
    }

    /// Convert the pending field text into its slot (if the schema declares
    /// a field at this position) and clear it.
    fn store_field(&mut self, data: bool, row: &RowState) -> Result<()> {
        if data && row.field_index < self.slot_count {
            let schema = Arc::clone(&self.schema);
            if let Some(field) = schema.field_at_ordinal(row.field_index) {
                let field_no = row.field_index + 1;
                let value = match field.convert(&self.value) {
                    Ok(v) => v,
                    Err(e) => {
                        let message = format!(
                            "Field {} in record {} contains invalid value: {}",
                            field_no, self.record_no, self.value
                        );
                        return Err(self.value_error(row, message, Some(e)));
                    }
                };
                if value.is_none() && !field.is_nullable() {
                    let message = format!(
                        "Non-nullable field {} in record {} contains null value",
                        field_no, self.record_no
                    );
                    return Err(self.value_error(row, message, None));
                }
                self.values[row.field_index] = value;
            }
        }
        self.value.clear();
        Ok(())
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        if self.eof {
            return Ok(None);
        }
        match self.source.next() {
            Some(Ok(c)) => Ok(Some(c)),
            Some(Err(e)) => Err(Error::DataAccess(e)),
            None => {
                self.eof = true;
                Ok(None)
            }
        }
    }

    fn error(&self, row: &RowState, message: impl Into<String>) -> Error {
        self.positioned(row, None, message.into(), None)
    }

    fn value_error(&self, row: &RowState, message: String, cause: Option<CoreError>) -> Error {
        self.positioned(row, Some(self.value.clone()), message, cause)
    }

    fn positioned(
        &self,
        row: &RowState,
        invalid_value: Option<String>,
        message: String,
        cause: Option<CoreError>,
    ) -> Error {
        CsvExtractionError {
            record_no: self.record_no,
            line_no: self.line_no,
            field_no: row.field_index + 1,
            line_pos: row.line_pos,
            invalid_value,
            message,
            cause,
        }
        .into()
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = io::Result<char>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;

                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, "csv extraction failed");

                Some(Err(e))
            }
        }
    }
}

impl<I> std::iter::FusedIterator for Records<I> where I: Iterator<Item = io::Result<char>> {}

impl<I> fmt::Debug for Records<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Records")
            .field("record_no", &self.record_no)
            .field("line_no", &self.line_no)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
