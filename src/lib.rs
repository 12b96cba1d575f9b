//! env-expand - Environment variable expansion for templates
//!
//! This library expands variable references inside arbitrary text. It
//! understands Windows `%NAME%` references, POSIX-shell `$NAME` and
//! `${NAME...}` references with default/assign/error modifiers, and
//! `$(command)` substitution, which runs a process and splices in its
//! output.
//!
//! ```
//! use env_expand::{expand, ExpansionOptions, InMemoryEnv};
//!
//! let mut env = InMemoryEnv::with_vars([("USER", "alice")]);
//! let text = expand("Hello, ${USER:-stranger}", &ExpansionOptions::default(), &mut env).unwrap();
//! assert_eq!(text, "Hello, alice");
//! ```

pub mod config;
pub mod env;
pub mod expansion;
pub mod parser;
pub mod process;

pub use env::{InMemoryEnv, ProcessEnv, VariableMap, VariableStore};
pub use expansion::{expand, try_expand, Expander, ExpansionError, ExpansionOptions, ScanState};
pub use parser::{tokenize, Lexer, Token, TokenKind};
pub use process::{ProcessExecutor, ProcessOutput, ProcessRequest, SystemExecutor};
