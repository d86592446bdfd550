//! Key extraction
//!
//! Reads the key column out of each parsed row and filters rows that cannot
//! contribute to aggregation. Every row is counted once in `rows_in`; dropped
//! rows are additionally counted as either bad (parse failure) or empty-key.

use super::metrics::ExtractCounters;
use super::parser::{ParseError, ParsedRow};
use tracing::trace;

/// Why a row was dropped before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    /// The line could not be parsed
    BadRow,
    /// The key column was empty or beyond the end of the row
    EmptyKey,
}

/// Outcome of looking at one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Key(String),
    Dropped(Dropped),
}

impl Extracted {
    pub fn into_key(self) -> Option<String> {
        match self {
            Self::Key(key) => Some(key),
            Self::Dropped(_) => None,
        }
    }
}

/// Pure classification of a row against a key column
pub fn classify(row: Result<&ParsedRow, &ParseError>, key_col: usize) -> Extracted {
    let row = match row {
        Ok(row) => row,
        Err(_) => return Extracted::Dropped(Dropped::BadRow),
    };
    match row.get(key_col) {
        Some(key) if !key.is_empty() => Extracted::Key(key.to_string()),
        _ => Extracted::Dropped(Dropped::EmptyKey),
    }
}

/// Stateful extractor for one partition; owns its counters
#[derive(Debug, Clone, Default)]
pub struct KeyExtractor {
    key_col: usize,
    counters: ExtractCounters,
}

impl KeyExtractor {
    pub fn new(key_col: usize) -> Self {
        Self {
            key_col,
            counters: ExtractCounters::default(),
        }
    }

    pub fn key_col(&self) -> usize {
        self.key_col
    }

    /// Extract the key of one row, or `None` if the row is dropped
    pub fn extract(&mut self, row: Result<ParsedRow, ParseError>) -> Option<String> {
        self.counters.rows_in += 1;

        let outcome = classify(row.as_ref(), self.key_col);
        match &outcome {
            Extracted::Key(_) => {}
            Extracted::Dropped(Dropped::BadRow) => {
                self.counters.rows_bad += 1;
                if let Err(e) = &row {
                    trace!("Dropping row {} [E{:04}]: {}", self.counters.rows_in, e.code(), e);
                }
            }
            Extracted::Dropped(Dropped::EmptyKey) => {
                self.counters.rows_empty_key += 1;
                trace!(
                    "Dropping row {}: no key in column {}",
                    self.counters.rows_in,
                    self.key_col
                );
            }
        }
        outcome.into_key()
    }

    pub fn counters(&self) -> ExtractCounters {
        self.counters
    }

    pub fn into_counters(self) -> ExtractCounters {
        self.counters
    }
}
