//! Per-key aggregation
//!
//! Counting is expressed as a monoid so partial results computed on separate
//! partitions can be merged in any order or grouping. The `combine`
//! operations here are associative and commutative; `empty` is the identity.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};

/// An associative binary operation: `a.combine(b).combine(c) == a.combine(b.combine(c))`
pub trait Semigroup: Sized {
    fn combine(self, other: Self) -> Self;
}

/// A semigroup with an identity element
pub trait Monoid: Semigroup {
    fn empty() -> Self;
}

/// Fold any number of partial values, starting from the identity
pub fn combine_all<T, I>(parts: I) -> T
where
    T: Monoid,
    I: IntoIterator<Item = T>,
{
    parts.into_iter().fold(T::empty(), T::combine)
}

/// Tree-reduce partial values across the rayon pool
pub fn parallel_combine<T>(parts: Vec<T>) -> T
where
    T: Monoid + Send,
{
    parts.into_par_iter().reduce(T::empty, T::combine)
}

/// One finalized (key, count) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: String,
    pub count: u64,
}

/// Running count per key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyCounts {
    counts: HashMap<String, u64>,
}

impl KeyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one valid row for `key`
    pub fn add(&mut self, key: impl Into<String>) {
        self.add_count(key, 1);
    }

    /// Record `count` rows for `key` at once
    pub fn add_count(&mut self, key: impl Into<String>, count: u64) {
        let slot = self.counts.entry(key.into()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u64> {
        self.counts.iter()
    }

    /// Consume the map into its final entries (order unspecified)
    pub fn finalize(self) -> Vec<AggregateEntry> {
        self.counts
            .into_iter()
            .map(|(key, count)| AggregateEntry { key, count })
            .collect()
    }

    pub fn into_map(self) -> HashMap<String, u64> {
        self.counts
    }
}

impl Semigroup for KeyCounts {
    fn combine(self, other: Self) -> Self {
        // Fold the smaller map into the larger one
        let (mut into, from) = if self.counts.len() >= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        for (key, count) in from.counts {
            into.add_count(key, count);
        }
        into
    }
}

impl Monoid for KeyCounts {
    fn empty() -> Self {
        Self::default()
    }
}

impl From<HashMap<String, u64>> for KeyCounts {
    fn from(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }
}

impl<K: Into<String>> FromIterator<K> for KeyCounts {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut counts = Self::new();
        for key in keys {
            counts.add(key);
        }
        counts
    }
}

impl<K: Into<String>> Extend<K> for KeyCounts {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.add(key);
        }
    }
}
