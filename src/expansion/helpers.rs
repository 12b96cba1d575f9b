//! Expansion Helpers
//!
//! Name validation and positional-argument lookup shared by the scanner and
//! the interpolation resolver.

use regex_lite::Regex;

use super::errors::{ExpansionError, Result};

lazy_static::lazy_static! {
    /// Shape of a variable name
    static ref VARIABLE_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

/// Check if a string is a valid variable name
pub fn is_valid_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

/// Characters that continue a bare `$NAME` reference
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse a positional index such as the `1` in `$1`.
pub fn positional_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Look up a positional argument, failing when the index is out of range.
pub fn positional_argument(args: &[String], index: usize) -> Result<String> {
    args.get(index).cloned().ok_or_else(|| {
        ExpansionError::bad_interpolation(format!(
            "positional argument {} is out of range ({} available)",
            index,
            args.len()
        ))
    })
}
