//! Diagnostic output for the tibcli CLI
//!
//! Levels are cumulative (Normal, Verbose, Debug, Trace) and can be raised
//! with `--verbose`/`--debug`/`--trace` or `TIBCLI_VERBOSE`, `TIBCLI_DEBUG`,
//! `TIBCLI_TRACE`. Everything goes to stderr and, with `--log-file`, to a
//! timestamped file. Secrets are masked unless `TASCLI_DBG` is set.
//!
//! A single [`Logger`] is built in `main` and handed to components as an
//! `Arc<Logger>`.

pub mod config;
pub mod level;
pub mod output;
pub mod redaction;

pub use config::LogConfig;
pub use level::LogLevel;
pub use output::{FileWriter, HttpDirection, HttpLogEntry, LogEntry, TerminalWriter};
pub use redaction::{Redactor, REDACTED};

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Logger for verbose, debug and trace output
pub struct Logger {
    config: LogConfig,
    terminal: TerminalWriter,
    file: Option<FileWriter>,
    redactor: Redactor,
    trace_warned: AtomicBool,
}

impl Logger {
    /// Create a logger, opening the log file if one is configured
    pub fn new(config: LogConfig) -> io::Result<Self> {
        let terminal = TerminalWriter::new(config.color);
        let file = config
            .log_file
            .as_deref()
            .map(FileWriter::new)
            .transpose()?;
        let redactor = if config.sensitive {
            Redactor::disabled()
        } else {
            Redactor::new()
        };

        Ok(Self {
            config,
            terminal,
            file,
            redactor,
            trace_warned: AtomicBool::new(false),
        })
    }

    /// A logger that prints nothing
    pub fn silent() -> Self {
        Self {
            config: LogConfig {
                quiet: true,
                ..LogConfig::default()
            },
            terminal: TerminalWriter::new(false),
            file: None,
            redactor: Redactor::new(),
            trace_warned: AtomicBool::new(false),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.config.is_verbose()
    }

    pub fn is_debug(&self) -> bool {
        self.config.is_debug()
    }

    pub fn is_trace(&self) -> bool {
        self.config.is_trace()
    }

    /// Whether secrets may appear in output
    pub fn is_sensitive(&self) -> bool {
        self.config.sensitive
    }

    fn emit(&self, entry: LogEntry) {
        self.terminal.write(&entry);
        if let Some(file) = &self.file {
            let _ = file.write(&entry);
        }
    }

    fn maybe_show_trace_warning(&self) {
        if !self.trace_warned.swap(true, Ordering::SeqCst) {
            eprintln!("{}", self.terminal.format_trace_warning());
        }
    }

    /// Progress message
    pub fn verbose(&self, message: impl Into<String>) {
        if self.is_verbose() {
            self.emit(LogEntry::new(LogLevel::Verbose, message));
        }
    }

    /// Progress message tagged with a context such as `login`
    pub fn verbose_with_context(&self, context: &str, message: impl Into<String>) {
        if self.is_verbose() {
            self.emit(LogEntry::new(LogLevel::Verbose, message).with_context(context));
        }
    }

    /// Internal decision or value, redacted
    pub fn debug(&self, message: impl Into<String>) {
        if self.is_debug() {
            let message = self.redactor.redact(&message.into()).into_owned();
            self.emit(LogEntry::new(LogLevel::Debug, message));
        }
    }

    /// Non-fatal problem; shown unless `--quiet`
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        if !self.config.quiet {
            self.terminal.warn(&message);
        }
        if let Some(file) = &self.file {
            let _ = file.write(&LogEntry::new(LogLevel::Normal, message).with_context("warning"));
        }
    }

    pub fn debug_request(&self, method: &str, url: &str) {
        if self.is_debug() && !self.is_trace() {
            self.emit_http(HttpLogEntry::request(method, url));
        }
    }

    pub fn debug_response(&self, status: u16, reason: &str, timing_ms: u64) {
        if self.is_debug() && !self.is_trace() {
            self.emit_http(HttpLogEntry::response(status, reason, timing_ms));
        }
    }

    /// Request with headers and body
    pub fn trace_request_body(
        &self,
        method: &str,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<&str>,
    ) {
        if !self.is_trace() {
            return;
        }
        let mut entry = HttpLogEntry::request(method, url).with_headers(headers);
        if let Some(body) = body {
            entry = entry.with_body(body);
        }
        self.emit_http(entry);
    }

    /// Response with headers and body
    pub fn trace_response_body(
        &self,
        status: u16,
        reason: &str,
        timing_ms: u64,
        headers: Vec<(String, String)>,
        body: Option<&str>,
    ) {
        if !self.is_trace() {
            return;
        }
        let mut entry = HttpLogEntry::response(status, reason, timing_ms).with_headers(headers);
        if let Some(body) = body {
            entry = entry.with_body(body);
        }
        self.emit_http(entry);
    }

    fn emit_http(&self, entry: HttpLogEntry) {
        let text = if self.is_trace() {
            if self.is_sensitive() {
                self.maybe_show_trace_warning();
            }
            entry.format_trace(&self.redactor)
        } else {
            entry.summary.clone()
        };
        self.terminal.write_http(&text, &entry);
        if let Some(file) = &self.file {
            let _ = file.write_http(&entry, &self.redactor);
        }
    }
}
