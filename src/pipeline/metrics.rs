//! Stage counters
//!
//! Every stage instance owns its counters; nothing is global. Per-partition
//! values are merged by the runtime with [`Semigroup::combine`], which is a
//! plain field-wise sum.

use super::aggregate::{Monoid, Semigroup};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters owned by a key extractor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractCounters {
    /// Every row handed to the extractor
    pub rows_in: u64,
    /// Rows that failed to parse
    pub rows_bad: u64,
    /// Rows whose key column was empty or missing
    pub rows_empty_key: u64,
}

impl ExtractCounters {
    /// Rows that made it into aggregation
    pub fn rows_keyed(&self) -> u64 {
        self.rows_in
            .saturating_sub(self.rows_bad)
            .saturating_sub(self.rows_empty_key)
    }
}

impl Semigroup for ExtractCounters {
    fn combine(self, other: Self) -> Self {
        Self {
            rows_in: self.rows_in.saturating_add(other.rows_in),
            rows_bad: self.rows_bad.saturating_add(other.rows_bad),
            rows_empty_key: self.rows_empty_key.saturating_add(other.rows_empty_key),
        }
    }
}

impl Monoid for ExtractCounters {
    fn empty() -> Self {
        Self::default()
    }
}

/// Counters owned by a transform instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformCounters {
    /// Output records produced
    pub rows_out: u64,
}

impl Semigroup for TransformCounters {
    fn combine(self, other: Self) -> Self {
        Self {
            rows_out: self.rows_out.saturating_add(other.rows_out),
        }
    }
}

impl Monoid for TransformCounters {
    fn empty() -> Self {
        Self::default()
    }
}

/// All four job counters, as reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineCounters {
    #[serde(flatten)]
    pub extract: ExtractCounters,
    #[serde(flatten)]
    pub transform: TransformCounters,
}

impl PipelineCounters {
    pub fn new(extract: ExtractCounters, transform: TransformCounters) -> Self {
        Self { extract, transform }
    }

    pub fn rows_in(&self) -> u64 {
        self.extract.rows_in
    }

    pub fn rows_bad(&self) -> u64 {
        self.extract.rows_bad
    }

    pub fn rows_empty_key(&self) -> u64 {
        self.extract.rows_empty_key
    }

    pub fn rows_out(&self) -> u64 {
        self.transform.rows_out
    }

    /// Counter values keyed by their reported names
    pub fn named(&self) -> [(&'static str, u64); 4] {
        [
            ("rows_in", self.rows_in()),
            ("rows_bad", self.rows_bad()),
            ("rows_empty_key", self.rows_empty_key()),
            ("rows_out", self.rows_out()),
        ]
    }
}

impl Semigroup for PipelineCounters {
    fn combine(self, other: Self) -> Self {
        Self {
            extract: self.extract.combine(other.extract),
            transform: self.transform.combine(other.transform),
        }
    }
}

impl Monoid for PipelineCounters {
    fn empty() -> Self {
        Self::default()
    }
}

impl fmt::Display for PipelineCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.named() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}
