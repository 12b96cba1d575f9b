//! Command Substitution
//!
//! Runs the body of a `$(...)` reference and returns its standard output
//! with trailing whitespace removed. Without a configured shell the body is
//! split by the command lexer into an argument vector; with one, the whole
//! body is handed to the shell as a single argument.

use std::path::Path;

use crate::parser::{tokenize, TokenKind};
use crate::process::ProcessRequest;

use super::errors::{ExpansionError, Result};
use super::state_machine::Expander;

/// Exit code reported when the executable could not be started.
const SPAWN_FAILED_EXIT_CODE: i32 = 127;

const POWERSHELL_PREAMBLE: &[&str] = &[
    "-NoLogo",
    "-NoProfile",
    "-NonInteractive",
    "-ExecutionPolicy",
    "Bypass",
    "-Command",
];
const BASH_PREAMBLE: &[&str] = &["--noprofile", "--norc", "-e", "-o", "pipefail", "-c"];
const SH_PREAMBLE: &[&str] = &["-e", "-c"];

/// Flags placed before the command for a known shell.
///
/// Matches on the lowercase file stem, so `/bin/bash` and `pwsh.exe` are
/// recognized. Unknown shells get no flags.
pub fn shell_preamble(shell: &str) -> &'static [&'static str] {
    let stem = Path::new(shell)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match stem.as_str() {
        "powershell" | "pwsh" => POWERSHELL_PREAMBLE,
        "bash" => BASH_PREAMBLE,
        "sh" => SH_PREAMBLE,
        _ => &[],
    }
}

/// Build the request that runs `command` through `shell`.
pub fn shell_request(shell: &str, command: &str) -> ProcessRequest {
    let mut args: Vec<String> = shell_preamble(shell).iter().map(|s| s.to_string()).collect();
    args.push(command.to_string());
    ProcessRequest::new(shell, args)
}

impl Expander<'_> {
    /// Run a captured `$(...)` body and return its trimmed output.
    pub fn execute_substitution(&mut self, command: &str) -> Result<String> {
        if !self.options.command_substitution {
            return Err(ExpansionError::unsupported("command substitution is disabled"));
        }
        if command.trim().is_empty() {
            return Err(ExpansionError::bad_substitution("command not provided"));
        }

        let request = match self.options.shell() {
            Some(shell) => shell_request(shell, command),
            None => self.argv_request(command)?,
        };
        let request = request.with_env(self.store.all());

        tracing::debug!(
            executable = %request.executable,
            args = request.args.len(),
            isolated = request.env.is_some(),
            "running command substitution"
        );

        let output = self.executor.run(&request).map_err(|e| ExpansionError::CommandFailed {
            exit_code: SPAWN_FAILED_EXIT_CODE,
            stderr: format!("{}: {}", request.executable, e),
        })?;

        if !output.success() {
            return Err(ExpansionError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr_text().trim_end().to_string(),
            });
        }

        Ok(output.stdout_text().trim_end().to_string())
    }

    /// Tokenize `command` into executable and arguments.
    fn argv_request(&mut self, command: &str) -> Result<ProcessRequest> {
        let mut argv = Vec::new();
        for token in tokenize(command) {
            if !token.kind.is_argument() {
                return Err(ExpansionError::bad_substitution(format!(
                    "unsupported token '{}' of kind {}",
                    token.text, token.kind
                )));
            }
            if token.kind == TokenKind::DoubleQuotedArg && token.text.contains('$') {
                argv.push(self.expand(&token.text)?);
            } else {
                argv.push(token.text);
            }
        }

        let mut argv = argv.into_iter();
        let executable = argv
            .next()
            .ok_or_else(|| ExpansionError::bad_substitution("command not provided"))?;
        Ok(ProcessRequest::new(executable, argv.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnv;
    use crate::expansion::types::ExpansionOptions;
    use crate::process::{ProcessExecutor, ProcessOutput};
    use std::cell::RefCell;
    use std::io;

    /// Replays a fixed result and records every request.
    struct FakeExecutor {
        result: fn(&ProcessRequest) -> io::Result<ProcessOutput>,
        requests: RefCell<Vec<ProcessRequest>>,
    }

    impl FakeExecutor {
        fn new(result: fn(&ProcessRequest) -> io::Result<ProcessOutput>) -> Self {
            Self {
                result,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn ok(_: &ProcessRequest) -> io::Result<ProcessOutput> {
            Ok(ProcessOutput::new("hello world \n\n", "", 0))
        }

        /// Echoes its arguments, one per line.
        fn echo(request: &ProcessRequest) -> io::Result<ProcessOutput> {
            Ok(ProcessOutput::new(request.args.join("\n"), "", 0))
        }

        fn failing(_: &ProcessRequest) -> io::Result<ProcessOutput> {
            Ok(ProcessOutput::new("partial", "bad thing\n", 2))
        }

        fn missing(_: &ProcessRequest) -> io::Result<ProcessOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
        }

        fn last(&self) -> ProcessRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl ProcessExecutor for FakeExecutor {
        fn run(&self, request: &ProcessRequest) -> io::Result<ProcessOutput> {
            self.requests.borrow_mut().push(request.clone());
            (self.result)(request)
        }
    }

    fn enabled() -> ExpansionOptions {
        ExpansionOptions::default().with_command_substitution(true)
    }

    #[test]
    fn test_shell_preambles() {
        assert_eq!(shell_preamble("bash"), BASH_PREAMBLE);
        assert_eq!(shell_preamble("/usr/bin/bash"), BASH_PREAMBLE);
        assert_eq!(shell_preamble("sh"), SH_PREAMBLE);
        assert_eq!(shell_preamble("pwsh"), POWERSHELL_PREAMBLE);
        assert_eq!(shell_preamble("PowerShell.exe"), POWERSHELL_PREAMBLE);
        assert!(shell_preamble("fish").is_empty());
    }

    #[test]
    fn test_shell_request() {
        let request = shell_request("sh", "echo a | tr a b");
        assert_eq!(request.executable, "sh");
        assert_eq!(request.args, vec!["-e", "-c", "echo a | tr a b"]);

        let request = shell_request("zsh", "ls");
        assert_eq!(request.args, vec!["ls"]);
    }

    #[test]
    fn test_output_is_trimmed() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::ok);
        let result = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("Say: $(greet --loud 'a b')!")
            .unwrap();
        assert_eq!(result, "Say: hello world!");

        let request = executor.last();
        assert_eq!(request.executable, "greet");
        assert_eq!(request.args, vec!["--loud", "a b"]);
        assert_eq!(request.env, None);
    }

    #[test]
    fn test_uses_configured_shell() {
        let mut env = InMemoryEnv::new();
        let options = enabled().with_shell("bash");
        let executor = FakeExecutor::new(FakeExecutor::ok);
        Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(echo a && echo b)")
            .unwrap();

        let request = executor.last();
        assert_eq!(request.executable, "bash");
        assert_eq!(
            request.args,
            vec!["--noprofile", "--norc", "-e", "-o", "pipefail", "-c", "echo a && echo b"]
        );
    }

    #[test]
    fn test_isolated_environment() {
        let mut env = InMemoryEnv::with_vars([("ONLY", "1")]).isolated(true);
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::ok);
        Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(env)")
            .unwrap();

        let request_env = executor.last().env.unwrap();
        assert_eq!(request_env.len(), 1);
        assert_eq!(request_env.get("ONLY").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_double_quoted_args_are_expanded() {
        let mut env = InMemoryEnv::with_vars([("NAME", "alice")]);
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::echo);
        let result = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(echo \"hi $NAME\" '$NAME')")
            .unwrap();
        assert_eq!(result, "hi alice\n$NAME");
    }

    #[test]
    fn test_nested_substitution_in_quotes() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::echo);
        let result = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(outer \"$(inner x)\")")
            .unwrap();
        assert_eq!(result, "x");

        let requests = executor.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].executable, "inner");
        assert_eq!(requests[1].executable, "outer");
        assert_eq!(requests[1].args, vec!["x"]);
    }

    #[test]
    fn test_rejects_operators() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::ok);
        let err = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(a | b)")
            .unwrap_err();
        assert!(matches!(err, ExpansionError::BadSubstitution(_)));
        assert!(err.to_string().contains("PIPE"));
        assert!(executor.requests.borrow().is_empty());
    }

    #[test]
    fn test_rejects_invalid_tokens() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::ok);
        for template in ["$(a & b)", "$(a ; b)", "$(a && b)"] {
            let err = Expander::new(&options, &mut env)
                .with_executor(&executor)
                .expand(template)
                .unwrap_err();
            assert!(matches!(err, ExpansionError::BadSubstitution(_)), "{}", template);
        }
        let err = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(a & b)")
            .unwrap_err();
        assert!(err.to_string().contains("INVALID"));
        assert!(executor.requests.borrow().is_empty());
    }

    #[test]
    fn test_empty_command() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::ok);
        let err = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("x$( )y")
            .unwrap_err();
        assert_eq!(err, ExpansionError::bad_substitution("command not provided"));
    }

    #[test]
    fn test_non_zero_exit() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::failing);
        let err = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(false)")
            .unwrap_err();
        assert_eq!(
            err,
            ExpansionError::CommandFailed {
                exit_code: 2,
                stderr: "bad thing".to_string()
            }
        );
    }

    #[test]
    fn test_spawn_failure() {
        let mut env = InMemoryEnv::new();
        let options = enabled();
        let executor = FakeExecutor::new(FakeExecutor::missing);
        let err = Expander::new(&options, &mut env)
            .with_executor(&executor)
            .expand("$(nope)")
            .unwrap_err();
        match err {
            ExpansionError::CommandFailed { exit_code, stderr } => {
                assert_eq!(exit_code, 127);
                assert!(stderr.starts_with("nope:"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_disabled() {
        let mut env = InMemoryEnv::new();
        let options = ExpansionOptions::default();
        let err = Expander::new(&options, &mut env)
            .execute_substitution("echo hi")
            .unwrap_err();
        assert!(matches!(err, ExpansionError::UnsupportedFeature(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_process() {
        let mut env = InMemoryEnv::new();
        let options = enabled().with_shell("sh");
        let result = Expander::new(&options, &mut env)
            .expand("v=$(printf '%s\\n' one)")
            .unwrap();
        assert_eq!(result, "v=one");
    }
}
