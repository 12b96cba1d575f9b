//! System Process Executor
//!
//! Spawns real child processes with `std::process::Command`.

use std::io;
use std::process::{Command, Stdio};

use super::types::{ProcessExecutor, ProcessOutput, ProcessRequest};

/// Exit code reported when a child is terminated by a signal.
const SIGNALED_EXIT_CODE: i32 = -1;

/// Executor backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessExecutor for SystemExecutor {
    fn run(&self, request: &ProcessRequest) -> io::Result<ProcessOutput> {
        let mut cmd = Command::new(&request.executable);
        cmd.args(&request.args);
        if let Some(ref env) = request.env {
            cmd.env_clear();
            cmd.envs(env);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output()?;
        Ok(ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code().unwrap_or(SIGNALED_EXIT_CODE),
        })
    }
}
