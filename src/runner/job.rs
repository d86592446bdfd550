//! One complete batch run: read, process, write shards, report

use super::LocalRunner;
use crate::config::{JobConfig, OUTPUT_SUFFIX};
use crate::error::Result;
use crate::io::{read_lines, write_json_report, ShardSummary, ShardedWriter};
use crate::pipeline::{Pipeline, PipelineCounters};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_name: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub iterations: u32,
    pub partitions: usize,
    /// Whether a header line was dropped before processing
    pub header_skipped: bool,
    pub distinct_keys: usize,
    pub counters: PipelineCounters,
    pub shards: Vec<ShardSummary>,
}

/// Execute the job described by `config`
///
/// Per-row problems never fail the run; only I/O and configuration do.
pub fn run_job(config: &JobConfig) -> Result<JobReport> {
    config.validate()?;
    let started_at = Utc::now();
    let clock = Instant::now();

    info!(
        "Starting job {} ({} -> {}-*-of-{:05}{})",
        config.job_name,
        config.input.display(),
        config.output.display(),
        config.out_shards,
        OUTPUT_SUFFIX
    );

    let pipeline = Pipeline::new(&config.pipeline)?;
    let runner = LocalRunner::new(pipeline, config.partitions);

    let input = read_lines(&config.input, config.has_header)?;
    if config.has_header && !input.header_skipped {
        warn!(
            "Header skip requested but {} is empty",
            config.input.display()
        );
    }
    let output = runner.execute(&input.lines);

    let mut writer = ShardedWriter::create(&config.output, config.out_shards, OUTPUT_SUFFIX)?;
    writer.write_all(&output.records)?;
    let shards = writer.finish()?;

    let counters = output.counters;
    if counters.rows_in() > 0 && counters.rows_out() == 0 {
        warn!(
            "Job {} produced no records from {} rows ({} bad, {} empty-key)",
            config.job_name,
            counters.rows_in(),
            counters.rows_bad(),
            counters.rows_empty_key()
        );
    }

    let report = JobReport {
        job_name: config.job_name.clone(),
        started_at,
        elapsed_ms: clock.elapsed().as_millis(),
        iterations: config.pipeline.iterations,
        partitions: runner.partitions(),
        header_skipped: input.header_skipped,
        distinct_keys: output.distinct_keys,
        counters,
        shards,
    };

    info!(
        "Job {} finished in {} ms: {}",
        report.job_name, report.elapsed_ms, report.counters
    );

    if let Some(path) = &config.metrics_out {
        write_json_report(&report, path)?;
    }

    Ok(report)
}
