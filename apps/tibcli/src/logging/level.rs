//! Verbosity levels

use std::fmt;

/// How much diagnostic output to produce
///
/// Each level includes everything below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Command output only
    #[default]
    Normal,
    /// Progress of the login state machine
    Verbose,
    /// Request lines, response status and internal decisions
    Debug,
    /// Request and response headers and bodies
    Trace,
}

impl LogLevel {
    /// Highest level selected by the flags
    pub fn from_flags(verbose: bool, debug: bool, trace: bool) -> Self {
        match (trace, debug, verbose) {
            (true, _, _) => Self::Trace,
            (_, true, _) => Self::Debug,
            (_, _, true) => Self::Verbose,
            _ => Self::Normal,
        }
    }

    pub fn is_verbose(self) -> bool {
        self >= Self::Verbose
    }

    pub fn is_debug(self) -> bool {
        self >= Self::Debug
    }

    pub fn is_trace(self) -> bool {
        self >= Self::Trace
    }

    /// Tag written in front of file entries
    pub fn tag(self) -> &'static str {
        match self {
            Self::Normal => "INFO",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_precedence() {
        assert_eq!(LogLevel::from_flags(false, false, false), LogLevel::Normal);
        assert_eq!(LogLevel::from_flags(true, false, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(true, true, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(true, true, true), LogLevel::Trace);
        assert_eq!(LogLevel::from_flags(false, false, true), LogLevel::Trace);
    }

    #[test]
    fn test_levels_are_cumulative() {
        assert!(LogLevel::Trace.is_debug());
        assert!(LogLevel::Trace.is_verbose());
        assert!(LogLevel::Debug.is_verbose());
        assert!(!LogLevel::Debug.is_trace());
        assert!(!LogLevel::Normal.is_verbose());
    }

    #[test]
    fn test_display() {
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
        assert_eq!(LogLevel::Normal.to_string(), "INFO");
    }
}
