//! Row-to-record processing core
//!
//! Raw lines flow through the [`RowParser`], the [`KeyExtractor`] (which drops
//! bad and key-less rows), into per-partition [`KeyCounts`]. Partials are
//! merged with [`Semigroup::combine`] and every finalized entry goes through
//! [`HashBurn`] to become one output record.
//!
//! Nothing in here does I/O or knows about threads; see `crate::runner` for
//! the local runtime that drives these stages.

pub mod aggregate;
pub mod key;
pub mod metrics;
pub mod parser;
pub mod transform;

#[cfg(test)]
mod aggregate_property_tests;

pub use aggregate::{combine_all, parallel_combine, AggregateEntry, KeyCounts, Monoid, Semigroup};
pub use key::{classify, Dropped, Extracted, KeyExtractor};
pub use metrics::{ExtractCounters, PipelineCounters, TransformCounters};
pub use parser::{ParseError, ParsedRow, RowParser};
pub use transform::{digest, HashBurn, DEFAULT_ITERATIONS};

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options that shape parsing and the transform
///
/// None of these affect merge correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub delimiter: char,
    pub quotechar: char,
    pub key_col: usize,
    pub iterations: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quotechar: '"',
            key_col: 0,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PipelineOptions {
    /// Reject options the tokenizer cannot honor
    pub fn validate(&self) -> Result<()> {
        check_separator("delimiter", self.delimiter)?;
        check_separator("quotechar", self.quotechar)?;
        if self.delimiter == self.quotechar {
            return Err(PipelineError::invalid_option(
                "quotechar",
                format!("must differ from the delimiter {:?}", self.delimiter),
            ));
        }
        Ok(())
    }
}

fn check_separator(field: &str, c: char) -> Result<()> {
    if !c.is_ascii() {
        return Err(PipelineError::invalid_option(
            field,
            format!("{c:?} is not a single-byte ASCII character"),
        ));
    }
    if c == '\n' || c == '\r' {
        return Err(PipelineError::invalid_option(
            field,
            "line breaks cannot separate or quote fields",
        ));
    }
    Ok(())
}

/// Counts and extractor counters computed from one partition of the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialResult {
    pub counts: KeyCounts,
    pub counters: ExtractCounters,
}

impl Semigroup for PartialResult {
    fn combine(self, other: Self) -> Self {
        Self {
            counts: self.counts.combine(other.counts),
            counters: self.counters.combine(other.counters),
        }
    }
}

impl Monoid for PartialResult {
    fn empty() -> Self {
        Self::default()
    }
}

/// Output records plus every counter, for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    pub records: Vec<String>,
    pub counters: PipelineCounters,
    pub distinct_keys: usize,
}

/// Validated, immutable processing core shared by every partition
#[derive(Debug, Clone)]
pub struct Pipeline {
    parser: RowParser,
    key_col: usize,
    iterations: u32,
}

impl Pipeline {
    pub fn new(options: &PipelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            parser: RowParser::new(options.delimiter as u8, options.quotechar as u8),
            key_col: options.key_col,
            iterations: options.iterations,
        })
    }

    pub fn parser(&self) -> &RowParser {
        &self.parser
    }

    pub fn key_col(&self) -> usize {
        self.key_col
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Fresh transform instance carrying this pipeline's iteration count
    pub fn hash_burn(&self) -> HashBurn {
        HashBurn::new(self.iterations)
    }

    /// Parse, key, and count one partition of lines
    pub fn process_partition<I, S>(&self, lines: I) -> PartialResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extractor = KeyExtractor::new(self.key_col);
        let mut counts = KeyCounts::new();

        for line in lines {
            if let Some(key) = extractor.extract(self.parser.parse(line.as_ref())) {
                counts.add(key);
            }
        }

        let counters = extractor.into_counters();
        debug!(
            "Partition done: {} rows, {} keys, {} bad, {} empty-key",
            counters.rows_in,
            counts.len(),
            counters.rows_bad,
            counters.rows_empty_key
        );
        PartialResult { counts, counters }
    }

    /// Transform every finalized entry into its output record
    pub fn transform_all(&self, entries: &[AggregateEntry]) -> (Vec<String>, TransformCounters) {
        let mut burn = self.hash_burn();
        let records = entries.iter().map(|e| burn.transform_entry(e)).collect();
        (records, burn.into_counters())
    }

    /// Single-partition run over in-memory lines
    pub fn run<I, S>(&self, lines: I) -> PipelineOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let partial = self.process_partition(lines);
        self.finish(partial)
    }

    /// Finalize merged partials: transform each key and gather all counters
    pub fn finish(&self, merged: PartialResult) -> PipelineOutput {
        self.finish_with(merged, |entries| self.transform_all(entries))
    }

    /// Finalize merged partials using the given transform driver
    pub fn finish_with<F>(&self, merged: PartialResult, transform_all: F) -> PipelineOutput
    where
        F: FnOnce(&[AggregateEntry]) -> (Vec<String>, TransformCounters),
    {
        let entries = merged.counts.finalize();
        let distinct_keys = entries.len();
        let (records, transform) = transform_all(&entries);
        PipelineOutput {
            records,
            counters: PipelineCounters::new(merged.counters, transform),
            distinct_keys,
        }
    }
}
