//! Application configuration
//!
//! Settings that concern the process rather than the job itself.

/// Application configuration structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    /// Get the log filter string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Show module targets for -vv and above
    pub fn show_targets(&self) -> bool {
        self.verbose >= 2
    }

    /// Show thread ids and line numbers for -vvv
    pub fn show_threads(&self) -> bool {
        self.verbose >= 3
    }
}
