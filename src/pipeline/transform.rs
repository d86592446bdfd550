//! Deterministic per-key transform
//!
//! Burns a fixed, configurable amount of CPU for every aggregated key by
//! chaining SHA-256 over a seed built from the key and its count. The digest
//! is thrown away: the emitted record is always `"<key>,<count>"`, whatever
//! the iteration count. This stage exists to load the runtime, not to
//! change the data.

use super::aggregate::AggregateEntry;
use super::metrics::TransformCounters;
use sha2::{Digest, Sha256};
use std::hint::black_box;

pub const DEFAULT_ITERATIONS: u32 = 500;

/// Seed bytes for a (key, count) pair: UTF-8 of `"<key>:<count>"`
pub fn seed(key: &str, count: u64) -> Vec<u8> {
    format!("{key}:{count}").into_bytes()
}

/// Apply SHA-256 to its own output `iterations` times, starting from the seed.
///
/// With zero iterations the seed is returned unchanged.
pub fn digest(key: &str, count: u64, iterations: u32) -> Vec<u8> {
    let mut data = seed(key, count);
    for _ in 0..iterations {
        data = Sha256::digest(&data).to_vec();
    }
    data
}

/// Format an output record
pub fn format_record(key: &str, count: u64) -> String {
    format!("{key},{count}")
}

/// Transform stage instance; owns its counter
#[derive(Debug, Clone)]
pub struct HashBurn {
    iterations: u32,
    counters: TransformCounters,
}

impl Default for HashBurn {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl HashBurn {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            counters: TransformCounters::default(),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Run the hash chain for one pair and emit its record
    pub fn transform(&mut self, key: &str, count: u64) -> String {
        if self.iterations > 0 {
            black_box(digest(key, count, self.iterations));
        }
        self.counters.rows_out += 1;
        format_record(key, count)
    }

    pub fn transform_entry(&mut self, entry: &AggregateEntry) -> String {
        self.transform(&entry.key, entry.count)
    }

    pub fn counters(&self) -> TransformCounters {
        self.counters
    }

    pub fn into_counters(self) -> TransformCounters {
        self.counters
    }
}
