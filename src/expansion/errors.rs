//! Expansion Errors
//!
//! Every failure of the expansion engine is a "bad input" condition:
//! - BadInterpolation: unterminated token, empty/invalid name, unset bare variable
//! - BadSubstitution: empty command body, unsupported token in a command
//! - UnsupportedFeature: command substitution used while disabled
//! - CommandFailed: a substituted command exited with a non-zero status
//!
//! None of them is fatal to the process; callers decide what to do with them.

use thiserror::Error;

/// Errors raised while expanding a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("bad interpolation: {0}")]
    BadInterpolation(String),

    #[error("bad substitution: {0}")]
    BadSubstitution(String),

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("command failed with exit code {exit_code}: {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },
}

impl ExpansionError {
    pub fn bad_interpolation(message: impl Into<String>) -> Self {
        Self::BadInterpolation(message.into())
    }

    pub fn bad_substitution(message: impl Into<String>) -> Self {
        Self::BadSubstitution(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFeature(message.into())
    }

    pub fn missing_closing_token(token: char) -> Self {
        Self::BadInterpolation(format!("missing closing token '{}'", token))
    }

    pub fn name_not_provided() -> Self {
        Self::BadInterpolation("variable name not provided".to_string())
    }

    pub fn not_set(name: &str) -> Self {
        Self::BadInterpolation(format!("variable {} is not set", name))
    }

    pub fn invalid_name(name: &str) -> Self {
        Self::BadInterpolation(format!("invalid variable name '{}'", name))
    }
}

/// Result type used throughout the expansion engine.
pub type Result<T> = std::result::Result<T, ExpansionError>;
