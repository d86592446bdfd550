//! Error handling utilities

use crate::error::PipelineError;
use tracing::error;

/// Exit status for an error that reached the top of the binary
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}

/// Report a fatal error and exit with its status code
///
/// - For `PipelineError`: user message always, code description and source
///   chain in verbose mode
/// - For other errors: the message, plus the `anyhow` chain in verbose mode
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {:#}", error);

    if let Some(pipeline_err) = error.downcast_ref::<PipelineError>() {
        eprintln!("Error: {}", pipeline_err.user_message());
        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", pipeline_err.developer_message());
        }
    } else {
        eprintln!("Error: {error}");
        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }
    }

    std::process::exit(exit_code_for(&error))
}
