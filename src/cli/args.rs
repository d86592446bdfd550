//! CLI argument structures

use crate::config::ConfigLayer;
use clap::Parser;
use std::path::PathBuf;

/// Count rows per key in a delimited text file and burn CPU per key
#[derive(Parser, Debug)]
#[command(name = "mba-pipeline")]
#[command(about = "mba-pipeline - Count rows per key in delimited text, sharded output", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Input file of delimited text, one record per line
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output path prefix; shards are written as <PREFIX>-SSSSS-of-NNNNN.csv
    #[arg(long, value_name = "PREFIX")]
    pub output: Option<PathBuf>,

    /// Skip the first line of the input
    #[arg(long)]
    pub has_header: bool,

    /// SHA-256 rounds per output record [default: 500]
    #[arg(long, value_name = "N")]
    pub iterations: Option<u32>,

    /// Field delimiter [default: ,]
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Quote character [default: "]
    #[arg(long, value_name = "CHAR")]
    pub quotechar: Option<char>,

    /// Zero-based column holding the key [default: 0]
    #[arg(long, value_name = "N")]
    pub key_col: Option<usize>,

    /// Number of output shard files [default: 8]
    #[arg(long, value_name = "N")]
    pub out_shards: Option<usize>,

    /// Job name used in logs and the report [default: mba-pipeline-<unix time>]
    #[arg(long, value_name = "NAME")]
    pub job_name: Option<String>,

    /// Number of input partitions processed in parallel [default: thread count]
    #[arg(long, value_name = "N")]
    pub partitions: Option<usize>,

    /// TOML file with job options; command-line flags override it
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the job report (counters, shards, timing) as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub metrics_out: Option<PathBuf>,
}

impl Cli {
    /// Options given explicitly on the command line
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            input: self.input.clone(),
            output: self.output.clone(),
            has_header: self.has_header.then_some(true),
            iterations: self.iterations,
            delimiter: self.delimiter,
            quotechar: self.quotechar,
            key_col: self.key_col,
            out_shards: self.out_shards,
            partitions: self.partitions,
            job_name: self.job_name.clone(),
            metrics_out: self.metrics_out.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "mba-pipeline",
            "--input",
            "in.csv",
            "--output",
            "out/part",
            "--has-header",
            "--iterations",
            "0",
            "--delimiter",
            ";",
            "--key-col",
            "2",
            "--out-shards",
            "4",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let layer = cli.to_layer();
        assert_eq!(layer.input, Some(PathBuf::from("in.csv")));
        assert_eq!(layer.has_header, Some(true));
        assert_eq!(layer.iterations, Some(0));
        assert_eq!(layer.delimiter, Some(';'));
        assert_eq!(layer.key_col, Some(2));
        assert_eq!(layer.out_shards, Some(4));
        assert_eq!(layer.quotechar, None);
    }

    #[test]
    fn test_absent_header_flag_does_not_override_file() {
        let cli = Cli::try_parse_from(["mba-pipeline"]).unwrap();
        assert_eq!(cli.to_layer().has_header, None);
    }

    #[test]
    fn test_negative_iterations_rejected() {
        assert!(Cli::try_parse_from(["mba-pipeline", "--iterations", "-5"]).is_err());
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        assert!(Cli::try_parse_from(["mba-pipeline", "--delimiter", "ab"]).is_err());
    }
}
