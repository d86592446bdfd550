use crate::error::{ErrorCode, PipelineError, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Path of one shard: `<prefix>-SSSSS-of-NNNNN<suffix>`
pub fn shard_path(prefix: &Path, shard: usize, shard_count: usize, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("-{shard:05}-of-{shard_count:05}{suffix}"));
    PathBuf::from(name)
}

fn write_failed(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::io_with_code(ErrorCode::IO_WRITE_FAILED, "failed to write output", path)
        .with_source(e)
}

/// Writes records as lines, spread round-robin over a fixed set of shard files.
///
/// Every shard file is created up front, so a run with no records still leaves
/// `shard_count` empty files behind.
pub struct ShardedWriter {
    shards: Vec<(PathBuf, BufWriter<File>)>,
    records_per_shard: Vec<u64>,
    next: usize,
}

impl ShardedWriter {
    pub fn create(prefix: &Path, shard_count: usize, suffix: &str) -> Result<Self> {
        if shard_count == 0 {
            return Err(PipelineError::invalid_option(
                "out_shards",
                "must be at least 1",
            ));
        }

        if let Some(parent) = prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
        }

        let mut shards = Vec::with_capacity(shard_count);
        for shard in 0..shard_count {
            let path = shard_path(prefix, shard, shard_count, suffix);
            let file = File::create(&path).map_err(|e| write_failed(&path, e))?;
            shards.push((path, BufWriter::new(file)));
        }
        debug!("Created {} output shards for {}", shard_count, prefix.display());

        Ok(Self {
            shards,
            records_per_shard: vec![0; shard_count],
            next: 0,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Append one record as a line to the next shard
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        let index = self.next;
        let (path, writer) = &mut self.shards[index];
        writeln!(writer, "{record}").map_err(|e| write_failed(path, e))?;
        self.records_per_shard[index] += 1;
        self.next = (index + 1) % self.shards.len();
        Ok(())
    }

    pub fn write_all<I, S>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for record in records {
            self.write_record(record.as_ref())?;
        }
        Ok(())
    }

    /// Flush every shard and return the written paths with their record counts
    pub fn finish(self) -> Result<Vec<ShardSummary>> {
        let mut summaries = Vec::with_capacity(self.shards.len());
        for ((path, mut writer), records) in self.shards.into_iter().zip(self.records_per_shard) {
            writer.flush().map_err(|e| write_failed(&path, e))?;
            summaries.push(ShardSummary { path, records });
        }
        Ok(summaries)
    }
}

/// One finished output shard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardSummary {
    pub path: PathBuf,
    pub records: u64,
}

/// Serialize `report` as pretty JSON to `path`
pub fn write_json_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
    }
    fs::write(path, json).map_err(|e| write_failed(path, e))?;
    info!("Wrote job report to {}", path.display());
    Ok(())
}
