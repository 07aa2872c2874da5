//! Terminal echo restore on interrupt
//!
//! A password prompt turns echo off. If the process is interrupted while one
//! is active, the handler turns echo back on before exiting with status 130.

use std::io::IsTerminal;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

/// Exit status after SIGINT/SIGTERM
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);
static INSTALL: Once = Once::new();

/// Marks a guarded prompt as active for its lifetime
pub struct PromptGuard {
    _private: (),
}

impl PromptGuard {
    pub fn new() -> Self {
        PROMPT_ACTIVE.store(true, Ordering::SeqCst);
        Self { _private: () }
    }
}

impl Default for PromptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Whether a guarded prompt is currently on screen
pub fn prompt_active() -> bool {
    PROMPT_ACTIVE.load(Ordering::SeqCst)
}

/// Install the process-wide interrupt handler; later calls do nothing.
///
/// Returns an error message if the handler could not be registered.
pub fn install_interrupt_handler() -> Result<(), String> {
    let mut result = Ok(());
    INSTALL.call_once(|| {
        result = ctrlc::set_handler(|| {
            if prompt_active() && std::io::stdout().is_terminal() {
                restore_echo();
                eprintln!();
            }
            std::process::exit(INTERRUPTED_EXIT_CODE);
        })
        .map_err(|e| e.to_string());
    });
    result
}

fn restore_echo() {
    let _ = Command::new("stty")
        .arg("echo")
        .stdin(Stdio::inherit())
        .status();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_scoped() {
        assert!(!prompt_active());
        {
            let _guard = PromptGuard::new();
            assert!(prompt_active());
        }
        assert!(!prompt_active());
    }
}
