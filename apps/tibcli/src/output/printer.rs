//! Terminal output helpers for consistent CLI formatting

use serde::Serialize;

use crate::error::CliResult;

/// Check if color output is enabled
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Plain status line on stdout
pub fn print_message(message: &str) {
    println!("{}", message);
}

/// Print a success message (green checkmark)
pub fn print_success(message: &str) {
    if use_color() {
        println!("\x1b[32m✓\x1b[0m {}", message);
    } else {
        println!("OK: {}", message);
    }
}

/// Print an info message (blue)
pub fn print_info(message: &str) {
    if use_color() {
        println!("\x1b[34mℹ\x1b[0m {}", message);
    } else {
        println!("Info: {}", message);
    }
}

/// Print a key-value pair, skipping empty values
pub fn print_key_value(key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("{}", format_key_value(key, value, use_color()));
}

fn format_key_value(key: &str, value: &str, color: bool) -> String {
    if color {
        format!("  \x1b[1m{:<14}\x1b[0m {}", format!("{}:", key), value)
    } else {
        format!("  {:<14} {}", format!("{}:", key), value)
    }
}

/// Pretty-printed JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
