//! Reversible obfuscation of secret values written to disk
//!
//! This keeps cookie and token values from being readable at a glance. It is
//! not encryption. The version prefix lets a later scheme recognise and
//! upgrade values written by this one.

/// Prefix marking a value written by this scheme
pub const OBFUSCATION_PREFIX: &str = "obfus_v1.";

/// Obfuscate a value, tagging it with the version prefix
pub fn obfuscate(value: &str) -> String {
    let mut out = String::with_capacity(OBFUSCATION_PREFIX.len() + value.len());
    out.push_str(OBFUSCATION_PREFIX);
    out.push_str(&swap_case(value));
    out
}

/// Reverse [`obfuscate`]. Values without the prefix are returned unchanged.
pub fn deobfuscate(value: &str) -> String {
    match value.strip_prefix(OBFUSCATION_PREFIX) {
        Some(rest) => swap_case(rest),
        None => value.to_string(),
    }
}

/// Swap the case of ASCII letters, leaving everything else alone
fn swap_case(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}
