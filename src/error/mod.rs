use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// Fatal errors for a pipeline run
///
/// Per-row problems never surface here; they are counted and dropped by the
/// pipeline stages. What remains is configuration, I/O, and report plumbing.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] I/O error: {message}")]
    Io {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PipelineError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    /// Create an error for a configuration option holding an unusable value
    pub fn invalid_option(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_INVALID_VALUE,
            message: message.into(),
            field: Some(field.into()),
            source: None,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    /// Create an I/O error with specific code, tied to a path
    pub fn io_with_code(code: u16, message: impl Into<String>, path: &Path) -> Self {
        Self::Io {
            code,
            message: message.into(),
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Io { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Io { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } | Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. } | Self::Io { code, .. } | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config {
                message, field, ..
            } => match field {
                Some(field) => format!("Invalid option `{}`: {}", field, message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Io { message, path, .. } => match path {
                Some(p) => format!("{} ({})", message, p.display()),
                None => message.clone(),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Get a detailed developer message including the source chain
    pub fn developer_message(&self) -> String {
        let mut out = format!("{} ({})", self, describe_error_code(self.code()));
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {}", cause));
            source = std::error::Error::source(cause);
        }
        out
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "invalid configuration file")
            .with_source(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other {
            code: ErrorCode::IO_SERIALIZATION_FAILED,
            message: "failed to serialize job report".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = PipelineError::invalid_option("out_shards", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "[E1005] Configuration error: must be at least 1"
        );
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.user_message(), "Invalid option `out_shards`: must be at least 1");
    }

    #[test]
    fn test_io_error_user_message_mentions_path() {
        let err = PipelineError::io_with_code(
            ErrorCode::IO_READ_FAILED,
            "failed to read input",
            Path::new("/tmp/in.csv"),
        );
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_message().contains("/tmp/in.csv"));
    }

    #[test]
    fn test_developer_message_walks_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PipelineError::io_with_code(
            ErrorCode::IO_WRITE_FAILED,
            "failed to write output",
            Path::new("/tmp/out"),
        )
        .with_context("shard 3")
        .with_source(io);
        let message = err.developer_message();
        assert!(message.contains("failed to write output: shard 3"));
        assert!(message.contains("caused by: no such file"));
    }
}
