//! Interactive prompts and terminal handling

pub mod prompts;
pub mod terminal;

pub use prompts::{is_interactive_terminal, CredentialPrompt, TerminalPrompt};
pub use terminal::{install_interrupt_handler, PromptGuard, INTERRUPTED_EXIT_CODE};
