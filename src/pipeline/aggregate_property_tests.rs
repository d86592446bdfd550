//! Property-based tests for the aggregation monoid
//!
//! These check that merging partial counts is associative and commutative,
//! and that the final counts do not depend on how rows were partitioned.

use super::aggregate::{combine_all, parallel_combine, KeyCounts, Monoid, Semigroup};
use super::metrics::ExtractCounters;
use super::{Pipeline, PipelineOptions};
use proptest::prelude::*;
use std::collections::HashMap;

fn arb_key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]).prop_map(str::to_string)
}

fn arb_counts() -> impl Strategy<Value = KeyCounts> {
    prop::collection::hash_map(arb_key(), 0u64..1_000, 0..6).prop_map(KeyCounts::from)
}

fn arb_extract_counters() -> impl Strategy<Value = ExtractCounters> {
    (0u64..1_000, 0u64..1_000, 0u64..1_000).prop_map(|(rows_in, rows_bad, rows_empty_key)| {
        ExtractCounters {
            rows_in,
            rows_bad,
            rows_empty_key,
        }
    })
}

fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (arb_key(), 0u32..100).prop_map(|(k, v)| format!("{k},{v}")),
        1 => (0u32..100).prop_map(|v| format!(",{v}")),
        1 => arb_key().prop_map(|k| format!("\"{k}")),
        1 => Just(String::new()),
    ]
}

proptest! {
    #[test]
    fn prop_combine_is_associative(a in arb_counts(), b in arb_counts(), c in arb_counts()) {
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_combine_is_commutative(a in arb_counts(), b in arb_counts()) {
        prop_assert_eq!(a.clone().combine(b.clone()), b.combine(a));
    }

    #[test]
    fn prop_empty_is_identity(a in arb_counts()) {
        prop_assert_eq!(a.clone().combine(KeyCounts::empty()), a.clone());
        prop_assert_eq!(KeyCounts::empty().combine(a.clone()), a);
    }

    #[test]
    fn prop_merged_count_is_sum_of_partials(parts in prop::collection::vec(arb_counts(), 0..8)) {
        let mut expected: HashMap<String, u64> = HashMap::new();
        for part in &parts {
            for (key, count) in part.iter() {
                *expected.entry(key.clone()).or_insert(0) += count;
            }
        }
        let merged = parallel_combine(parts);
        prop_assert_eq!(merged.into_map(), expected);
    }

    #[test]
    fn prop_counters_combine_is_associative(
        a in arb_extract_counters(),
        b in arb_extract_counters(),
        c in arb_extract_counters(),
    ) {
        prop_assert_eq!(a.combine(b).combine(c), a.combine(b.combine(c)));
    }

    #[test]
    fn prop_partitioning_does_not_change_result(
        lines in prop::collection::vec(arb_line(), 0..60),
        chunk in 1usize..10,
    ) {
        let pipeline = Pipeline::new(&PipelineOptions::default()).unwrap();
        let whole = pipeline.process_partition(&lines);
        let partials: Vec<_> = lines
            .chunks(chunk)
            .map(|c| pipeline.process_partition(c))
            .collect();
        let merged = combine_all(partials.into_iter().rev());
        prop_assert_eq!(whole, merged);
    }
}
