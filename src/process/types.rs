//! Process Execution Types
//!
//! The process-spawning collaborator used by command substitution.

use std::io;

use crate::env::VariableMap;

/// A request to run one executable to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessRequest {
    /// Executable name or path
    pub executable: String,
    /// Arguments, not including the executable
    pub args: Vec<String>,
    /// Full replacement environment; `None` inherits the parent's
    pub env: Option<VariableMap>,
}

impl ProcessRequest {
    pub fn new(executable: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
            env: None,
        }
    }

    pub fn with_env(mut self, env: Option<VariableMap>) -> Self {
        self.env = env;
        self
    }
}

/// Captured result of a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs processes synchronously, capturing their output.
///
/// Implementations block until the child exits. There is no timeout.
pub trait ProcessExecutor {
    fn run(&self, request: &ProcessRequest) -> io::Result<ProcessOutput>;
}
