//! Decimal numbers with locale-style grouping, e.g. `1.456.789,23` or `1,456,789.23`.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::TextConverter;
use crate::error::ConversionError;
use crate::value::{Value, ValueType};

/// Parses grouped decimal text into an arbitrary-precision `BigDecimal`.
///
/// Grouping marks (the configured grouping character or a plain space) are
/// validated while they are removed: the first group holds 1 to 3 digits
/// (after an optional sign) and every following group exactly 3. Validation
/// stops at the first decimal mark; everything after it is the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalConverter {
    decimal_mark: char,
    grouping_mark: char,
}

impl DecimalConverter {
    /// `1,234.5`
    pub const DECIMAL_POINT: DecimalConverter = DecimalConverter {
        decimal_mark: '.',
        grouping_mark: ',',
    };

    /// `1.234,5`
    pub const DECIMAL_COMMA: DecimalConverter = DecimalConverter {
        decimal_mark: ',',
        grouping_mark: '.',
    };

    pub fn decimal_mark(&self) -> char {
        self.decimal_mark
    }

    pub fn grouping_mark(&self) -> char {
        self.grouping_mark
    }

    /// Drop grouping marks up to the first decimal mark, validating group sizes.
    fn remove_grouping(&self, source: &str) -> Result<Vec<char>, ConversionError> {
        let chars: Vec<char> = source.chars().collect();
        let lead = usize::from(matches!(chars.first(), Some('+' | '-')));
        let invalid = || ConversionError::InvalidGrouping(source.to_string());

        let mut out = Vec::with_capacity(chars.len());
        let mut last_mark: Option<usize> = None;
        let mut fraction_at = None;

        for (i, &c) in chars.iter().enumerate() {
            if c == self.decimal_mark {
                fraction_at = Some(i);
                break;
            }
            if c != self.grouping_mark && c != ' ' {
                out.push(c);
                continue;
            }
            let pos = out.len();
            match last_mark {
                None if pos == lead || pos > lead + 3 => return Err(invalid()),
                Some(last) if pos - last != 3 => return Err(invalid()),
                _ => {}
            }
            if i + 1 == chars.len() {
                return Err(invalid());
            }
            last_mark = Some(pos);
        }

        if let Some(last) = last_mark {
            if out.len() - last != 3 {
                return Err(invalid());
            }
        }
        if let Some(at) = fraction_at {
            out.extend_from_slice(&chars[at..]);
        }
        Ok(out)
    }
}

impl TextConverter for DecimalConverter {
    fn target_type(&self) -> ValueType {
        ValueType::Decimal
    }

    fn parse(&self, trimmed: &str) -> Result<Value, ConversionError> {
        let chars = self.remove_grouping(trimmed)?;

        let mut normalized = String::with_capacity(chars.len());
        let mut seen_mark = false;
        for (i, &c) in chars.iter().enumerate() {
            if c == self.decimal_mark {
                if seen_mark {
                    return Err(ConversionError::InvalidDecimalMark(trimmed.to_string()));
                }
                seen_mark = true;
                normalized.push('.');
            } else if c.is_ascii_digit() {
                normalized.push(c);
            } else if i == 0 && (c == '+' || c == '-') {
                if c == '-' {
                    normalized.push(c);
                }
            } else {
                return Err(ConversionError::InvalidCharacters(trimmed.to_string()));
            }
        }

        BigDecimal::from_str(&normalized)
            .map(Value::Decimal)
            .map_err(|_| ConversionError::InvalidNumber(trimmed.to_string()))
    }
}
