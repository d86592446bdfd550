//! Command-line entry
//!
//! Parses arguments, layers them over an optional config file, and runs the
//! job.

pub mod args;

pub use args::Cli;

use crate::config::{load_file_config, ConfigLayer, JobConfig};
use crate::runner::{run_job, JobReport};
use anyhow::{Context, Result};

/// Resolve the job configuration from the command line and optional file
pub fn resolve_config(cli: &Cli) -> Result<JobConfig> {
    let file_layer = match &cli.config {
        Some(path) => load_file_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => ConfigLayer::default(),
    };
    let config = JobConfig::resolve(file_layer.merge(cli.to_layer()))?;
    Ok(config)
}

/// Run the job the command line describes
pub fn execute(cli: &Cli) -> Result<JobReport> {
    let config = resolve_config(cli)?;
    let report = run_job(&config).with_context(|| format!("Job {} failed", config.job_name))?;
    Ok(report)
}
