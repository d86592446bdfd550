//! Local execution runtime
//!
//! Drives the pipeline stages over an in-memory batch on the rayon pool:
//! contiguous partitions are keyed and counted independently, partials are
//! tree-reduced, and finalized keys are transformed in parallel with one
//! transform instance (and counter) per worker split.

pub mod job;

pub use job::{run_job, JobReport};

use crate::pipeline::{
    parallel_combine, AggregateEntry, Monoid, PartialResult, Pipeline, PipelineOutput, Semigroup,
    TransformCounters,
};
use rayon::prelude::*;
use tracing::debug;

/// Runs a [`Pipeline`] across `partitions` slices of the input
#[derive(Debug, Clone)]
pub struct LocalRunner {
    pipeline: Pipeline,
    partitions: usize,
}

impl LocalRunner {
    pub fn new(pipeline: Pipeline, partitions: usize) -> Self {
        Self {
            pipeline,
            partitions: partitions.max(1),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Count keys in each partition and merge the partials
    pub fn aggregate<S>(&self, lines: &[S]) -> PartialResult
    where
        S: AsRef<str> + Sync,
    {
        let chunk_size = lines.len().div_ceil(self.partitions).max(1);
        let partials: Vec<PartialResult> = lines
            .par_chunks(chunk_size)
            .map(|chunk| self.pipeline.process_partition(chunk))
            .collect();
        debug!(
            "Merging {} partials ({} lines, chunk size {})",
            partials.len(),
            lines.len(),
            chunk_size
        );
        parallel_combine(partials)
    }

    /// Transform finalized entries in parallel
    pub fn transform(&self, entries: &[AggregateEntry]) -> (Vec<String>, TransformCounters) {
        entries
            .par_iter()
            .fold(
                || (Vec::new(), self.pipeline.hash_burn()),
                |(mut records, mut burn), entry| {
                    records.push(burn.transform_entry(entry));
                    (records, burn)
                },
            )
            .map(|(records, burn)| (records, burn.into_counters()))
            .reduce(
                || (Vec::new(), TransformCounters::empty()),
                |(mut left, lc), (right, rc)| {
                    left.extend(right);
                    (left, lc.combine(rc))
                },
            )
    }

    /// Full in-memory run: aggregate, finalize, transform
    pub fn execute<S>(&self, lines: &[S]) -> PipelineOutput
    where
        S: AsRef<str> + Sync,
    {
        let merged = self.aggregate(lines);
        self.pipeline
            .finish_with(merged, |entries| self.transform(entries))
    }
}
