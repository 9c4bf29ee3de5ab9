//! Strict, buffered byte-to-character decoding.
//!
//! The in-flight buffer is bounded by the `BufReader` capacity; characters are
//! decoded one buffer at a time and handed out individually. Malformed input
//! is never replaced: it surfaces as an `io::ErrorKind::InvalidData` error.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};

use encoding_rs::{DecoderResult, Encoding};

const DEFAULT_CAPACITY: usize = 8 * 1024;

// encoding_rs maps these labels to windows-1252, which is not byte-transparent.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso88591",
    "latin1",
    "l1",
    "cp819",
    "ibm819",
    "iso-ir-100",
];

/// Character set used to decode byte input.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// ISO-8859-1: every byte is the code point of the same value.
    #[default]
    Latin1,
    Encoding(&'static Encoding),
}

impl Charset {
    /// Resolve a charset label (case-insensitive, WHATWG labels plus Latin-1 aliases).
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            return Some(Charset::Latin1);
        }
        Encoding::for_label(label.as_bytes()).map(Charset::Encoding)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Charset::Latin1 => "ISO-8859-1",
            Charset::Encoding(e) => e.name(),
        }
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({})", self.name())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_unicode(encoding: &'static Encoding) -> bool {
    encoding == encoding_rs::UTF_8
        || encoding == encoding_rs::UTF_16LE
        || encoding == encoding_rs::UTF_16BE
}

/// Iterator of characters decoded from a byte stream.
pub struct CharReader<R: Read> {
    inner: BufReader<R>,
    charset: Charset,
    decoder: Option<encoding_rs::Decoder>,
    decoded: String,
    pos: usize,
    offset: u64,
    eof: bool,
}

impl<R: Read> CharReader<R> {
    pub fn new(reader: R, charset: Charset) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, reader, charset)
    }

    /// Create a reader whose byte buffer never exceeds `capacity`.
    pub fn with_capacity(capacity: usize, reader: R, charset: Charset) -> Self {
        let decoder = match charset {
            Charset::Latin1 => None,
            // A UTF-8/UTF-16 BOM overrides a Unicode label and is dropped.
            Charset::Encoding(e) if is_unicode(e) => Some(e.new_decoder()),
            Charset::Encoding(e) => Some(e.new_decoder_without_bom_handling()),
        };
        Self {
            inner: BufReader::with_capacity(capacity.max(1), reader),
            charset,
            decoder,
            decoded: String::new(),
            pos: 0,
            offset: 0,
            eof: false,
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    fn refill(&mut self) -> io::Result<()> {
        self.decoded.clear();
        self.pos = 0;

        let len = loop {
            match self.inner.fill_buf() {
                Ok(buf) => break buf.len(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        let last = len == 0;
        let buf = self.inner.buffer();

        let consumed = match self.decoder.as_mut() {
            None => {
                self.decoded.extend(buf.iter().map(|&b| char::from(b)));
                len
            }
            Some(decoder) => {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(len)
                    .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "decode buffer overflow"))?;
                self.decoded.reserve(needed);
                let (result, read) =
                    decoder.decode_to_string_without_replacement(buf, &mut self.decoded, last);
                if let DecoderResult::Malformed(_, _) = result {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "malformed input for charset {} near byte offset {}",
                            self.charset.name(),
                            self.offset + read as u64
                        ),
                    ));
                }
                read
            }
        };

        self.inner.consume(consumed);
        self.offset += consumed as u64;
        if last {
            self.eof = true;
        }
        Ok(())
    }
}

impl<R: Read> Iterator for CharReader<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.decoded[self.pos..].chars().next() {
                self.pos += c.len_utf8();
                return Some(Ok(c));
            }
            if self.eof {
                return None;
            }
            if let Err(e) = self.refill() {
                self.decoded.clear();
                self.pos = 0;
                self.eof = true;
                return Some(Err(e));
            }
        }
    }
}
