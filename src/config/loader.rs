use super::ConfigLayer;
use crate::error::{ErrorCode, PipelineError, Result};
use std::path::Path;
use tracing::debug;

/// Read a TOML job file into a [`ConfigLayer`]
pub fn load_file_config(path: &Path) -> Result<ConfigLayer> {
    if !path.exists() {
        return Err(PipelineError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Configuration file not found: {}", path.display()),
        ));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::io_with_code(ErrorCode::IO_READ_FAILED, "failed to read config file", path)
            .with_source(e)
    })?;
    let layer = parse_config(&content)
        .map_err(|e| e.with_context(path.display()))?;

    debug!("Loaded job configuration from {}", path.display());
    Ok(layer)
}

/// Parse TOML text into a [`ConfigLayer`]
pub fn parse_config(content: &str) -> Result<ConfigLayer> {
    Ok(toml::from_str(content)?)
}
