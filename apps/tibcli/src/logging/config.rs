//! Logging configuration from CLI flags and environment

use super::level::LogLevel;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Environment variable enabling verbose output
pub const VERBOSE_ENV: &str = "TIBCLI_VERBOSE";
/// Environment variable enabling debug output
pub const DEBUG_ENV: &str = "TIBCLI_DEBUG";
/// Environment variable enabling trace output
pub const TRACE_ENV: &str = "TIBCLI_TRACE";

/// Resolved logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbosity level
    pub level: LogLevel,
    /// Suppress all diagnostic output
    pub quiet: bool,
    /// Optional file receiving a copy of every entry
    pub log_file: Option<PathBuf>,
    /// Colorize terminal output
    pub color: bool,
    /// Leave secrets unredacted
    pub sensitive: bool,
}

impl LogConfig {
    /// Build the configuration from CLI flags, then environment.
    ///
    /// Flags and environment variables combine; the highest level wins.
    /// `TASCLI_DBG` turns on trace output with secrets left visible.
    pub fn from_args_and_env(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_file: Option<PathBuf>,
    ) -> Self {
        let sensitive = env_flag(crate::config::SENSITIVE_DEBUG_ENV);

        let level = LogLevel::from_flags(
            verbose || env_flag(VERBOSE_ENV),
            debug || env_flag(DEBUG_ENV),
            trace || env_flag(TRACE_ENV) || sensitive,
        );

        let color = std::env::var("NO_COLOR").is_err() && std::io::stderr().is_terminal();

        Self {
            level,
            quiet,
            log_file,
            color,
            sensitive,
        }
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        !self.quiet && self.level.is_verbose()
    }

    /// Check if debug output is enabled
    pub fn is_debug(&self) -> bool {
        !self.quiet && self.level.is_debug()
    }

    /// Check if trace output is enabled
    pub fn is_trace(&self) -> bool {
        !self.quiet && self.level.is_trace()
    }
}

/// Set and not "0"/"false"
fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => {
            let value = value.trim();
            !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
        }
        Err(_) => false,
    }
}
