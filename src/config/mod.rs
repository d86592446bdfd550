//! Job configuration
//!
//! Options come from three layers: built-in defaults, an optional TOML file,
//! and command-line flags. Later layers win. The resolved [`JobConfig`] is
//! validated once at startup; an invalid configuration never runs.

pub mod loader;

pub use loader::load_file_config;

use crate::error::{ErrorCode, PipelineError, Result};
use crate::pipeline::PipelineOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OUT_SHARDS: usize = 8;
pub const OUTPUT_SUFFIX: &str = ".csv";

/// One layer of optional settings, as read from a file or the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub has_header: Option<bool>,
    pub iterations: Option<u32>,
    pub delimiter: Option<char>,
    pub quotechar: Option<char>,
    pub key_col: Option<usize>,
    pub out_shards: Option<usize>,
    pub partitions: Option<usize>,
    pub job_name: Option<String>,
    pub metrics_out: Option<PathBuf>,
}

impl ConfigLayer {
    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: Self) -> Self {
        Self {
            input: other.input.or(self.input),
            output: other.output.or(self.output),
            has_header: other.has_header.or(self.has_header),
            iterations: other.iterations.or(self.iterations),
            delimiter: other.delimiter.or(self.delimiter),
            quotechar: other.quotechar.or(self.quotechar),
            key_col: other.key_col.or(self.key_col),
            out_shards: other.out_shards.or(self.out_shards),
            partitions: other.partitions.or(self.partitions),
            job_name: other.job_name.or(self.job_name),
            metrics_out: other.metrics_out.or(self.metrics_out),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub has_header: bool,
    pub pipeline: PipelineOptions,
    pub out_shards: usize,
    pub partitions: usize,
    pub job_name: String,
    pub metrics_out: Option<PathBuf>,
}

impl JobConfig {
    /// Fill defaults into a merged layer and validate the result
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let defaults = PipelineOptions::default();
        let input = layer.input.ok_or_else(|| missing("input"))?;
        let output = layer.output.ok_or_else(|| missing("output"))?;

        let config = Self {
            input,
            output,
            has_header: layer.has_header.unwrap_or(false),
            pipeline: PipelineOptions {
                delimiter: layer.delimiter.unwrap_or(defaults.delimiter),
                quotechar: layer.quotechar.unwrap_or(defaults.quotechar),
                key_col: layer.key_col.unwrap_or(defaults.key_col),
                iterations: layer.iterations.unwrap_or(defaults.iterations),
            },
            out_shards: layer.out_shards.unwrap_or(DEFAULT_OUT_SHARDS),
            partitions: layer
                .partitions
                .unwrap_or_else(rayon::current_num_threads),
            job_name: layer.job_name.unwrap_or_else(default_job_name),
            metrics_out: layer.metrics_out,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        if self.out_shards == 0 {
            return Err(PipelineError::invalid_option(
                "out_shards",
                "must be at least 1",
            ));
        }
        if self.partitions == 0 {
            return Err(PipelineError::invalid_option(
                "partitions",
                "must be at least 1",
            ));
        }
        if self.job_name.trim().is_empty() {
            return Err(PipelineError::invalid_option(
                "job_name",
                "must not be blank",
            ));
        }
        Ok(())
    }
}

fn missing(field: &str) -> PipelineError {
    PipelineError::config_with_code(
        ErrorCode::CONFIG_MISSING_REQUIRED,
        format!("`{field}` is required (pass --{field} or set it in the config file)"),
    )
}

/// `mba-pipeline-<unix seconds>`
pub fn default_job_name() -> String {
    format!("mba-pipeline-{}", chrono::Utc::now().timestamp())
}
