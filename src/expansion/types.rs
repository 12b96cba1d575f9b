//! Expansion Types
//!
//! Options controlling an expansion call and the scanner's state set.

use serde::{Deserialize, Serialize};

/// Options for one expansion call.
///
/// Read-only while an expansion runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionOptions {
    /// Recognize Windows-style `%NAME%` references
    pub windows_expansion: bool,
    /// Allow `$(command)`; off unless asked for, since it runs programs
    pub command_substitution: bool,
    /// Run substitutions through this shell instead of tokenizing them
    pub use_shell: Option<String>,
    /// Resolve `$0`, `$1`, ... from `args`
    pub unix_args_expansion: bool,
    /// Positional arguments for `$0`, `$1`, ... (the process arguments by default)
    #[serde(skip, default = "process_args")]
    pub args: Vec<String>,
}

fn process_args() -> Vec<String> {
    std::env::args().collect()
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            windows_expansion: true,
            command_substitution: false,
            use_shell: None,
            unix_args_expansion: false,
            args: process_args(),
        }
    }
}

impl ExpansionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows_expansion(mut self, enabled: bool) -> Self {
        self.windows_expansion = enabled;
        self
    }

    pub fn with_command_substitution(mut self, enabled: bool) -> Self {
        self.command_substitution = enabled;
        self
    }

    /// Route substitutions through `shell`. An empty name clears it.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        let shell = shell.into();
        self.use_shell = if shell.is_empty() { None } else { Some(shell) };
        self
    }

    pub fn with_unix_args(mut self, enabled: bool) -> Self {
        self.unix_args_expansion = enabled;
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The configured shell, treating an empty string as unset.
    pub fn shell(&self) -> Option<&str> {
        self.use_shell.as_deref().filter(|s| !s.is_empty())
    }
}

/// Scanner mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    None,
    /// Inside `%...%`
    WindowsToken,
    /// Inside a bare `$NAME`
    BashVariable,
    /// Inside `${...}`
    BashInterpolation,
    /// Inside `$(...)`
    CommandSubstitution,
}

impl ScanState {
    /// Closing delimiter a scan must see before ending in this state.
    pub fn closing_token(&self) -> Option<char> {
        match self {
            Self::WindowsToken => Some('%'),
            Self::BashInterpolation => Some('}'),
            Self::CommandSubstitution => Some(')'),
            Self::None | Self::BashVariable => None,
        }
    }
}
