//! File plumbing around the pipeline: line input, sharded text output, and
//! the JSON job report.

pub mod input;
pub mod output;

pub use input::{read_lines, InputLines};
pub use output::{shard_path, write_json_report, ShardSummary, ShardedWriter};
