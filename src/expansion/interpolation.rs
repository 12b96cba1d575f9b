//! Variable Interpolation
//!
//! Resolves the body of a `${...}` reference:
//! - `${NAME}`            value of NAME (unset is an error)
//! - `${NAME:-default}`   default when NAME is unset or empty
//! - `${NAME:default}`    same as `:-`
//! - `${NAME:=default}`   default when unset or empty, also assigned to NAME
//! - `${NAME:?message}`   error carrying `message` when unset or empty
//!
//! Defaults and messages containing `$` are expanded before use.
//!
//! The body is split at its first `:`, and the character after it picks the
//! modifier. `${B:x:-y}` is therefore `B` with the bare default `x:-y`, not
//! a name `B:x` split at the later `:-`.

use super::errors::{ExpansionError, Result};
use super::helpers::{is_valid_name, positional_argument, positional_index};
use super::state_machine::Expander;

/// Modifier following the variable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier<'a> {
    /// `:-word` or `:word`
    Default(&'a str),
    /// `:=word`
    Assign(&'a str),
    /// `:?message`
    Error(&'a str),
}

/// Split an interpolation body at its first `:` into name and modifier.
pub fn split_body(body: &str) -> (&str, Option<Modifier<'_>>) {
    let Some(colon) = body.find(':') else {
        return (body, None);
    };
    let name = &body[..colon];
    let rest = &body[colon + 1..];
    let modifier = if let Some(word) = rest.strip_prefix('-') {
        Modifier::Default(word)
    } else if let Some(word) = rest.strip_prefix('=') {
        Modifier::Assign(word)
    } else if let Some(message) = rest.strip_prefix('?') {
        Modifier::Error(message)
    } else {
        Modifier::Default(rest)
    };
    (name, Some(modifier))
}

impl Expander<'_> {
    /// Resolve the text between `${` and `}`.
    pub fn resolve_interpolation(&mut self, body: &str) -> Result<String> {
        let (name, modifier) = split_body(body);
        if name.is_empty() {
            return Err(ExpansionError::name_not_provided());
        }

        let positional = if self.options.unix_args_expansion {
            positional_index(name)
        } else {
            None
        };

        let current = match positional {
            // out of range is an error whatever the modifier
            Some(index) => Some(positional_argument(&self.options.args, index)?),
            None => {
                if !is_valid_name(name) {
                    return Err(ExpansionError::invalid_name(name));
                }
                self.store.get(name)
            }
        };

        let Some(modifier) = modifier else {
            return current.ok_or_else(|| ExpansionError::not_set(name));
        };

        if let Some(value) = current.filter(|v| !v.is_empty()) {
            return Ok(value);
        }

        match modifier {
            Modifier::Default(word) => self.expand_word(word),
            Modifier::Assign(word) => {
                if positional.is_some() {
                    return Err(ExpansionError::bad_interpolation(format!(
                        "cannot assign to positional argument {}",
                        name
                    )));
                }
                let value = self.expand_word(word)?;
                tracing::debug!(name, value = %value, "assigning default");
                self.store.set(name, &value);
                Ok(value)
            }
            Modifier::Error(message) => {
                let message = if message.is_empty() {
                    format!("variable {} is not set or empty", name)
                } else {
                    self.expand_word(message)?
                };
                Err(ExpansionError::BadInterpolation(message))
            }
        }
    }

    /// Expand a default value or message that may itself hold references.
    fn expand_word(&mut self, word: &str) -> Result<String> {
        if word.contains('$') {
            self.expand(word)
        } else {
            Ok(word.to_string())
        }
    }
}
