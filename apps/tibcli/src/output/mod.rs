//! Terminal output helpers

mod printer;

pub use printer::{print_info, print_json, print_key_value, print_message, print_success};
