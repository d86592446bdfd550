//! # mba-pipeline
//!
//! A batch job that counts rows per key in a delimited text file, runs a
//! fixed number of SHA-256 rounds per key to simulate CPU-bound work, and
//! writes `key,count` records across a set of output shards.
//!
//! ## Usage
//!
//! ```bash
//! mba-pipeline --input rows.csv --output out/counts [--has-header] [--iterations 500] [--out-shards 8]
//! ```
//!
//! ## Modules
//!
//! - `pipeline` - Row parsing, key extraction, aggregation, and the hash transform
//! - `runner` - Local parallel runtime and the end-to-end job
//! - `io` - Input lines, sharded output files, JSON report
//! - `config` - Layered job configuration (defaults, TOML file, flags)
//! - `error` - Error types with stable codes
//! - `app` - Logging and fatal error handling for the binary
//! - `cli` - Command-line arguments
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod runner;

pub use error::{PipelineError, Result};
