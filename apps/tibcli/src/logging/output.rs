//! Terminal and file sinks for diagnostic output

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use super::level::LogLevel;
use super::redaction::Redactor;

/// One diagnostic message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Short tag shown in brackets, e.g. `session`
    pub context: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Direction of a logged HTTP exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpDirection {
    Request,
    Response,
}

/// An HTTP request or response line, with headers and body at trace level
#[derive(Debug, Clone)]
pub struct HttpLogEntry {
    pub direction: HttpDirection,
    /// `METHOD url` for requests, `status reason (Nms)` for responses
    pub summary: String,
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpLogEntry {
    pub fn request(method: &str, url: &str) -> Self {
        Self {
            direction: HttpDirection::Request,
            summary: format!("→ {} {}", method, url),
            status: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn response(status: u16, reason: &str, timing_ms: u64) -> Self {
        Self {
            direction: HttpDirection::Response,
            summary: format!("← {} {} ({}ms)", status, reason, timing_ms),
            status: Some(status),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Summary plus headers and body, secrets masked by `redactor`
    pub fn format_trace(&self, redactor: &Redactor) -> String {
        let mut output = self.summary.clone();

        if !self.headers.is_empty() {
            output.push_str("\n  Headers:");
            for (name, value) in &self.headers {
                output.push_str(&format!(
                    "\n    {}: {}",
                    name,
                    redactor.redact_header(name, value)
                ));
            }
        }

        if let Some(body) = &self.body {
            let body = redactor.redact(body);
            if body.is_empty() {
                output.push_str("\n  Body: (empty)");
            } else {
                output.push_str(&format!("\n  Body:\n    {}", body));
            }
        }

        output
    }
}

/// Writes diagnostics to stderr
pub struct TerminalWriter {
    color: bool,
}

impl TerminalWriter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub(crate) fn format_entry(&self, entry: &LogEntry) -> String {
        let context = entry
            .context
            .as_deref()
            .unwrap_or_else(|| match entry.level {
                LogLevel::Debug | LogLevel::Trace => "debug",
                _ => "verbose",
            });

        if self.color {
            format!("\x1b[36m[{}]\x1b[0m {}", context, entry.message)
        } else {
            format!("[{}] {}", context, entry.message)
        }
    }

    pub fn write(&self, entry: &LogEntry) {
        eprintln!("{}", self.format_entry(entry));
    }

    /// Print a warning regardless of verbosity
    pub fn warn(&self, message: &str) {
        if self.color {
            eprintln!("\x1b[33mWarning:\x1b[0m {}", message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    pub fn write_http(&self, text: &str, entry: &HttpLogEntry) {
        if !self.color {
            eprintln!("{}", text);
            return;
        }
        let code = match (entry.direction, entry.status) {
            (HttpDirection::Response, Some(status)) if (200..300).contains(&status) => "32",
            (HttpDirection::Response, Some(status)) if status >= 400 => "31",
            _ => "33",
        };
        eprintln!("\x1b[{}m{}\x1b[0m", code, text);
    }

    pub fn format_trace_warning(&self) -> &'static str {
        if self.color {
            "\x1b[33mTRACE MODE: output may contain sensitive information\x1b[0m"
        } else {
            "WARNING: TRACE MODE - output may contain sensitive information"
        }
    }
}

/// Appends timestamped diagnostics to a file
pub struct FileWriter {
    file: Mutex<File>,
}

impl FileWriter {
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Failed to lock log file"))?;
        writeln!(file, "{}", line)?;
        file.flush()
    }

    pub fn write(&self, entry: &LogEntry) -> io::Result<()> {
        let context = entry
            .context
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        self.append(&format!(
            "[{}] [{}]{} {}",
            entry.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            entry.level,
            context,
            entry.message
        ))
    }

    /// HTTP entries are always written with headers and body, redacted
    pub fn write_http(&self, entry: &HttpLogEntry, redactor: &Redactor) -> io::Result<()> {
        self.append(&format!(
            "[{}] [HTTP] {}",
            Local::now().format("%Y-%m-%dT%H:%M:%S"),
            entry.format_trace(redactor)
        ))
    }
}
