//! Expansion State Machine
//!
//! Scans a template once, left to right, replacing variable references:
//! - Windows style `%NAME%`
//! - Bare `$NAME` (and `$0`, `$1`, ... when positional arguments are enabled)
//! - Braced `${NAME}` with `:-`, `:=`, `:?` and `:` modifiers
//! - Command substitution `$(command)`
//!
//! `$$` and `\$` produce a literal `$`. Every state has its own transition
//! function; the scanner must be back in `ScanState::None` at end of input,
//! except for a bare `$NAME`, which the end of input terminates.

use crate::env::VariableStore;
use crate::process::{ProcessExecutor, SystemExecutor};

use super::errors::{ExpansionError, Result};
use super::helpers::{is_name_char, is_valid_name, positional_argument, positional_index};
use super::types::{ExpansionOptions, ScanState};

/// Expands templates against a variable store.
///
/// Holds no state between calls; each `expand` gets fresh scratch buffers.
pub struct Expander<'a> {
    pub(crate) options: &'a ExpansionOptions,
    pub(crate) store: &'a mut dyn VariableStore,
    pub(crate) executor: &'a dyn ProcessExecutor,
}

impl<'a> Expander<'a> {
    /// Create an expander that spawns substitutions as real processes.
    pub fn new(options: &'a ExpansionOptions, store: &'a mut dyn VariableStore) -> Self {
        Self {
            options,
            store,
            executor: &SystemExecutor,
        }
    }

    /// Use a different process executor for `$(...)`.
    pub fn with_executor(mut self, executor: &'a dyn ProcessExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn options(&self) -> &ExpansionOptions {
        self.options
    }

    /// Expand `template`, failing on the first malformed reference.
    pub fn expand(&mut self, template: &str) -> Result<String> {
        if !template.contains(|c: char| c == '$' || c == '%') {
            return Ok(template.to_string());
        }
        Scanner::new(template).run(self)
    }

    /// Expand `template`, returning `None` instead of an error.
    ///
    /// A convenience wrapper over [`Expander::expand`] that drops the
    /// `ExpansionError`; use `expand` when the caller needs to know why.
    pub fn try_expand(&mut self, template: &str) -> Option<String> {
        match self.expand(template) {
            Ok(expanded) => Some(expanded),
            Err(e) => {
                tracing::debug!(error = %e, "expansion failed");
                None
            }
        }
    }

    /// Resolve a bare `$NAME` reference. Unset is always an error here.
    pub(crate) fn resolve_variable(&mut self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(ExpansionError::name_not_provided());
        }
        if self.options.unix_args_expansion {
            if let Some(index) = positional_index(name) {
                return positional_argument(&self.options.args, index);
            }
        }
        if !is_valid_name(name) {
            return Err(ExpansionError::invalid_name(name));
        }
        self.store
            .get(name)
            .ok_or_else(|| ExpansionError::not_set(name))
    }
}

/// Expand `template` with the given options and store.
pub fn expand(
    template: &str,
    options: &ExpansionOptions,
    store: &mut dyn VariableStore,
) -> Result<String> {
    Expander::new(options, store).expand(template)
}

/// Expand `template`, returning `None` if it is malformed or a lookup fails.
///
/// The error is discarded (it is logged at debug level). Call [`expand`] to
/// get the `ExpansionError` itself.
pub fn try_expand(
    template: &str,
    options: &ExpansionOptions,
    store: &mut dyn VariableStore,
) -> Option<String> {
    Expander::new(options, store).try_expand(template)
}

/// One scan over one template.
struct Scanner {
    input: Vec<char>,
    pos: usize,
    state: ScanState,
    /// Text of the reference being read
    token: String,
    output: String,
    /// Open quote inside `$(...)`
    sub_quote: Option<char>,
    /// Unbalanced `(` inside `$(...)`
    sub_depth: usize,
}

impl Scanner {
    fn new(template: &str) -> Self {
        Self {
            input: template.chars().collect(),
            pos: 0,
            state: ScanState::None,
            token: String::new(),
            output: String::with_capacity(template.len()),
            sub_quote: None,
            sub_depth: 0,
        }
    }

    fn run(mut self, expander: &mut Expander<'_>) -> Result<String> {
        while let Some(c) = self.current() {
            match self.state {
                ScanState::None => self.on_none(c, expander)?,
                ScanState::WindowsToken => self.on_windows_token(c, expander),
                ScanState::BashVariable => self.on_bash_variable(c, expander)?,
                ScanState::BashInterpolation => self.on_bash_interpolation(c, expander)?,
                ScanState::CommandSubstitution => self.on_command_substitution(c, expander)?,
            }
        }
        self.finish(expander)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn transition(&mut self, next: ScanState) {
        tracing::trace!(from = ?self.state, to = ?next, pos = self.pos, "scan state");
        self.state = next;
    }

    /// Append resolved text, clear the token and go back to `None`.
    fn complete(&mut self, value: &str) {
        self.output.push_str(value);
        self.token.clear();
        self.transition(ScanState::None);
    }

    fn on_none(&mut self, c: char, expander: &Expander<'_>) -> Result<()> {
        match c {
            '%' if expander.options.windows_expansion => {
                self.transition(ScanState::WindowsToken);
                self.pos += 1;
            }
            '\\' if self.peek(1) == Some('$') => {
                self.output.push('$');
                self.pos += 2;
            }
            '$' => self.on_dollar(expander)?,
            _ => {
                self.output.push(c);
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn on_dollar(&mut self, expander: &Expander<'_>) -> Result<()> {
        match self.peek(1) {
            Some('$') => {
                self.output.push('$');
                self.pos += 2;
            }
            Some('(') => {
                if !expander.options.command_substitution {
                    return Err(ExpansionError::unsupported("command substitution is disabled"));
                }
                self.sub_quote = None;
                self.sub_depth = 0;
                self.transition(ScanState::CommandSubstitution);
                self.pos += 2;
            }
            Some('{') => {
                match self.peek(2) {
                    Some('}') => return Err(ExpansionError::name_not_provided()),
                    None => return Err(ExpansionError::missing_closing_token('}')),
                    Some(_) => {}
                }
                self.transition(ScanState::BashInterpolation);
                self.pos += 2;
            }
            Some(next) if next.is_alphanumeric() => {
                self.transition(ScanState::BashVariable);
                self.pos += 1;
            }
            _ => return Err(ExpansionError::name_not_provided()),
        }
        Ok(())
    }

    fn on_windows_token(&mut self, c: char, expander: &Expander<'_>) {
        self.pos += 1;
        if c != '%' {
            self.token.push(c);
            return;
        }
        if self.token.is_empty() {
            self.complete("%%");
            return;
        }
        // Unset Windows variables expand to nothing.
        let value = expander.store.get(&self.token).unwrap_or_default();
        self.complete(&value);
    }

    fn on_bash_variable(&mut self, c: char, expander: &mut Expander<'_>) -> Result<()> {
        if is_name_char(c) {
            self.token.push(c);
            self.pos += 1;
            return Ok(());
        }

        let value = expander.resolve_variable(&self.token)?;
        self.complete(&value);
        match c {
            // `$FOO\_BAR`: the backslash only marks the end of the name
            '\\' => self.pos += 1,
            // reprocess as the start of the next reference
            '$' => {}
            _ => {
                self.output.push(c);
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn on_bash_interpolation(&mut self, c: char, expander: &mut Expander<'_>) -> Result<()> {
        self.pos += 1;
        if c != '}' {
            self.token.push(c);
            return Ok(());
        }
        let body = std::mem::take(&mut self.token);
        let value = expander.resolve_interpolation(&body)?;
        self.complete(&value);
        Ok(())
    }

    fn on_command_substitution(&mut self, c: char, expander: &mut Expander<'_>) -> Result<()> {
        self.pos += 1;
        if let Some(quote) = self.sub_quote {
            if c == quote {
                self.sub_quote = None;
            }
            self.token.push(c);
            return Ok(());
        }

        match c {
            '\\' => {
                self.token.push(c);
                if let Some(escaped) = self.current() {
                    self.token.push(escaped);
                    self.pos += 1;
                }
            }
            '\'' | '"' => {
                self.sub_quote = Some(c);
                self.token.push(c);
            }
            '(' => {
                self.sub_depth += 1;
                self.token.push(c);
            }
            ')' if self.sub_depth > 0 => {
                self.sub_depth -= 1;
                self.token.push(c);
            }
            ')' => {
                let command = std::mem::take(&mut self.token);
                let value = expander.execute_substitution(&command)?;
                self.complete(&value);
            }
            _ => self.token.push(c),
        }
        Ok(())
    }

    fn finish(mut self, expander: &mut Expander<'_>) -> Result<String> {
        match self.state {
            ScanState::None => Ok(self.output),
            ScanState::BashVariable => {
                let value = expander.resolve_variable(&self.token)?;
                self.complete(&value);
                Ok(self.output)
            }
            state => {
                let closing = state.closing_token().unwrap_or('}');
                Err(ExpansionError::missing_closing_token(closing))
            }
        }
    }
}
