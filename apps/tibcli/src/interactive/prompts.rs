//! Username and password prompts

use std::io::IsTerminal;

use dialoguer::{Input, Password};

use crate::error::{CliError, CliResult};
use crate::interactive::terminal::PromptGuard;

/// Checks if both stdin and stdout are connected to a terminal.
pub fn is_interactive_terminal() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Source of credentials typed by the user
pub trait CredentialPrompt: Send + Sync {
    /// Ask for a username, offering `default` when non-empty
    fn username(&self, default: &str) -> CliResult<String>;

    /// Ask for a password without echo
    fn password(&self) -> CliResult<String>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn require_terminal() -> CliResult<()> {
        if !is_interactive_terminal() {
            return Err(CliError::InputError(
                "Credentials are required but no terminal is attached.\n\
                 Run 'tibcli login --username <email> --password <password>' first."
                    .into(),
            ));
        }
        Ok(())
    }
}

impl CredentialPrompt for TerminalPrompt {
    fn username(&self, default: &str) -> CliResult<String> {
        Self::require_terminal()?;

        let mut input = Input::<String>::new().with_prompt("Username");
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let username = input.interact_text()?;
        Ok(username.trim().to_string())
    }

    fn password(&self) -> CliResult<String> {
        Self::require_terminal()?;

        let _guard = PromptGuard::new();
        let password = Password::new().with_prompt("Password").interact()?;
        Ok(password)
    }
}
