//! CLI error types and exit codes

use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General, configuration or persistence error
/// - 2: Authentication required or rejected
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("No session cookies, no access token; need to log in.")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Session cookies rejected by the Domain Server: {0}")]
    SessionExpired(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}\n\nTroubleshooting:\n  - Check your internet connection\n  - Verify the server URL is correct\n  - Try again in a few moments")]
    ConnectionFailed(String),

    #[error("Unexpected content: {0}")]
    Protocol(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The place holder '{name}' is empty.")]
    PlaceholderEmpty { name: &'static str },

    #[error("The place holder '{name}' is not replaced.")]
    PlaceholderNotReplaced { name: &'static str },

    #[error("Settings storage error: {0}")]
    Storage(String),

    #[error("Settings file '{file}' is corrupt: {message}")]
    CorruptSettings { file: &'static str, message: String },

    #[error("Platform services api version {platform} mismatched with tibcli version {cli}, please download a new tibcli command line tool from web page.")]
    IncompatibleVersion { platform: String, cli: String },

    #[error("Platform services api version validating failed with error: {0}")]
    PlatformCheck(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotAuthenticated
            | CliError::AuthenticationFailed(_)
            | CliError::SessionExpired(_) => 2,
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::Validation(_) => 4,
            CliError::Server(_) | CliError::Protocol(_) => 5,
            CliError::Api { status, .. } => {
                if *status >= 500 {
                    5
                } else if *status == 401 || *status == 403 || *status == 419 {
                    2
                } else {
                    4
                }
            }
            CliError::Config(_)
            | CliError::PlaceholderEmpty { .. }
            | CliError::PlaceholderNotReplaced { .. } => 1,
            CliError::Storage(_) | CliError::CorruptSettings { .. } => 1,
            CliError::IncompatibleVersion { .. } | CliError::PlatformCheck(_) => 1,
            CliError::InputError(_) => 1,
        }
    }

    /// True when the persisted session itself cannot be understood, which
    /// calls for wiping it rather than aborting.
    pub fn is_structurally_invalid_session(&self) -> bool {
        matches!(self, CliError::CorruptSettings { file, .. } if *file == "session")
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::NotAuthenticated | CliError::SessionExpired(_) => {
                Some("Run 'tibcli login' to authenticate.")
            }
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::IncompatibleVersion { .. } => {
                Some("Download the latest tibcli from the platform web page.")
            }
            CliError::CorruptSettings { .. } => {
                Some("Run 'tibcli logout' and log in again to rebuild local settings.")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CliError::ConnectionFailed(e.to_string())
        } else if e.is_timeout() {
            CliError::Network("Request timed out".to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Storage(format!("I/O error: {}", e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Storage(format!("JSON error: {}", e))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::InputError(format!("Dialog error: {}", e))
    }
}
