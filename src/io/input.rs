use crate::error::{ErrorCode, PipelineError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Lines read from an input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLines {
    pub lines: Vec<String>,
    /// Whether a header line was present and dropped
    pub header_skipped: bool,
}

/// Read every line of `path`, dropping the first one when `skip_header` is set.
///
/// Line terminators (`\n` or `\r\n`) are removed. A skipped header is never
/// handed to the pipeline and so never counted.
pub fn read_lines(path: &Path, skip_header: bool) -> Result<InputLines> {
    let file = File::open(path).map_err(|e| {
        PipelineError::io_with_code(ErrorCode::IO_READ_FAILED, "failed to open input", path)
            .with_source(e)
    })?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    let mut header_skipped = false;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            PipelineError::io_with_code(ErrorCode::IO_READ_FAILED, "failed to read input", path)
                .with_source(e)
                .with_context(format!("line {}", index + 1))
        })?;
        if index == 0 && skip_header {
            header_skipped = true;
            continue;
        }
        lines.push(line);
    }

    debug!(
        "Read {} lines from {} (header skipped: {})",
        lines.len(),
        path.display(),
        header_skipped
    );
    Ok(InputLines {
        lines,
        header_skipped,
    })
}
