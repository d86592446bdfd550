//! Row parser
//!
//! Splits a raw line of delimited text into its fields. Tokenizing is done by
//! the `csv` crate configured with the job's delimiter and quote character;
//! a pre-scan rejects lines whose quoted span never closes, which `csv` would
//! otherwise accept by running the field to the end of input.

use crate::error::ErrorCode;
use thiserror::Error;

/// Row-level parse failure
///
/// Recovered by the key extractor and counted as a bad row, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated quoted field starting in column {column}")]
    UnterminatedQuote { column: usize },

    #[error("line break inside unquoted field in column {column}")]
    LineBreakInUnquotedField { column: usize },

    #[error("malformed row: {0}")]
    Malformed(String),
}

impl ParseError {
    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::UnterminatedQuote { .. } => ErrorCode::PARSE_UNTERMINATED_QUOTE,
            Self::LineBreakInUnquotedField { .. } => ErrorCode::PARSE_LINE_BREAK,
            Self::Malformed(_) => ErrorCode::PARSE_MALFORMED_ROW,
        }
    }
}

/// Fields of one line, in left-to-right column order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    fields: Vec<String>,
}

impl ParsedRow {
    pub fn new(fields: Vec<String>) -> Self {
        debug_assert!(!fields.is_empty(), "a parsed row always has one field");
        Self { fields }
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Splits lines on a single-byte delimiter, honoring a single-byte quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowParser {
    delimiter: u8,
    quote: u8,
}

impl Default for RowParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl RowParser {
    /// Both bytes are expected to be validated ASCII (see `PipelineOptions::validate`)
    pub fn new(delimiter: u8, quote: u8) -> Self {
        Self { delimiter, quote }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn quote(&self) -> u8 {
        self.quote
    }

    /// Parse one raw line into its fields
    pub fn parse(&self, line: &str) -> Result<ParsedRow, ParseError> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        // csv skips blank records entirely; a blank line is one empty field
        if line.is_empty() {
            return Ok(ParsedRow::new(vec![String::new()]));
        }

        self.check_quoting(line)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(true)
            .from_reader(line.as_bytes());

        let mut record = csv::StringRecord::new();
        match reader.read_record(&mut record) {
            Ok(true) => Ok(ParsedRow::new(
                record.iter().map(str::to_string).collect(),
            )),
            Ok(false) => Ok(ParsedRow::new(vec![String::new()])),
            Err(e) => Err(ParseError::Malformed(e.to_string())),
        }
    }

    /// Walk the line with the same quoting rules as the tokenizer and fail if
    /// it ends inside a quoted span or breaks outside one. `csv` would treat
    /// such a break as a record terminator and drop the rest of the line.
    fn check_quoting(&self, line: &str) -> Result<(), ParseError> {
        let mut state = QuoteState::FieldStart;
        let mut column = 0;

        for &b in line.as_bytes() {
            if (b == b'\r' || b == b'\n') && !matches!(state, QuoteState::Quoted) {
                return Err(ParseError::LineBreakInUnquotedField { column });
            }
            state = match state {
                QuoteState::FieldStart if b == self.quote => QuoteState::Quoted,
                QuoteState::FieldStart | QuoteState::Unquoted | QuoteState::QuoteInQuoted
                    if b == self.delimiter =>
                {
                    column += 1;
                    QuoteState::FieldStart
                }
                QuoteState::FieldStart | QuoteState::Unquoted => QuoteState::Unquoted,
                QuoteState::Quoted if b == self.quote => QuoteState::QuoteInQuoted,
                QuoteState::Quoted => QuoteState::Quoted,
                QuoteState::QuoteInQuoted if b == self.quote => QuoteState::Quoted,
                QuoteState::QuoteInQuoted => QuoteState::Unquoted,
            };
        }

        match state {
            QuoteState::Quoted => Err(ParseError::UnterminatedQuote { column }),
            _ => Ok(()),
        }
    }
}
