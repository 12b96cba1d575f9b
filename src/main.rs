use clap::Parser;
use std::io::Read;
use std::process::ExitCode;

use env_expand::config::{load_config, ExpandConfig};
use env_expand::{expand, InMemoryEnv, ProcessEnv, VariableStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_EXPANSION_FAILED: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "env-expand")]
#[command(about = "Expand environment variable references in text")]
#[command(version)]
struct Cli {
    /// Expand this template instead of reading a file or stdin
    #[arg(short = 'c')]
    template: Option<String>,

    /// Do not recognize %NAME% references
    #[arg(long = "no-windows")]
    no_windows: bool,

    /// Allow $(command) substitution
    #[arg(long = "command-substitution")]
    command_substitution: bool,

    /// Run substitutions through this shell (bash, sh, pwsh, ...)
    #[arg(long = "shell")]
    shell: Option<String>,

    /// Resolve $0, $1, ... from the arguments after `--`
    #[arg(long = "unix-args")]
    unix_args: bool,

    /// Set a variable before expanding (repeatable)
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Expand against the -e/config variables only, and give substituted
    /// commands exactly those variables
    #[arg(long = "isolated")]
    isolated: bool,

    /// TOML configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Output results as JSON (output, error)
    #[arg(long = "json")]
    json: bool,

    /// Template file to expand
    #[arg()]
    file: Option<String>,

    /// Positional arguments for $1, $2, ...
    #[arg(last = true)]
    positional: Vec<String>,
}

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("env_expand=warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_BAD_INPUT);
            }
        },
        None => ExpandConfig::default(),
    };

    for pair in &cli.env {
        let Some((key, value)) = pair.split_once('=') else {
            eprintln!("Error: expected KEY=VALUE, got '{}'", pair);
            return ExitCode::from(EXIT_BAD_INPUT);
        };
        config.env.insert(key.to_string(), value.to_string());
    }

    let template = match read_template(&cli) {
        Ok(template) => template,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    // CLI flags override the config file
    let mut options = config.options;
    if cli.no_windows {
        options.windows_expansion = false;
    }
    if cli.command_substitution {
        options.command_substitution = true;
    }
    if let Some(shell) = cli.shell {
        options = options.with_shell(shell);
    }
    if cli.unix_args {
        options.unix_args_expansion = true;
    }
    let program = cli.file.clone().unwrap_or_else(|| "env-expand".to_string());
    options = options.with_args(std::iter::once(program).chain(cli.positional));

    let mut in_memory;
    let mut process_env;
    let store: &mut dyn VariableStore = if cli.isolated {
        in_memory = InMemoryEnv::with_vars(config.env).isolated(true);
        &mut in_memory
    } else {
        process_env = ProcessEnv::new();
        for (key, value) in &config.env {
            process_env.set(key, value);
        }
        &mut process_env
    };

    let result = expand(&template, &options, store);

    if cli.json {
        let (output, error) = match &result {
            Ok(output) => (Some(output.as_str()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        println!("{}", serde_json::json!({ "output": output, "error": error }));
    } else {
        match &result {
            Ok(output) => print!("{}", output),
            Err(e) => eprintln!("env-expand: {}", e),
        }
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_EXPANSION_FAILED)
    }
}

/// Determine the template source: -c, file, or stdin
fn read_template(cli: &Cli) -> Result<String, String> {
    if let Some(ref template) = cli.template {
        return Ok(template.clone());
    }
    if let Some(ref file) = cli.file {
        return std::fs::read_to_string(file)
            .map_err(|e| format!("Cannot read template file: {}: {}", file, e));
    }

    use std::io::IsTerminal;
    if std::io::stdin().is_terminal() {
        return Err("No template provided. Use -c 'template', provide a file, or pipe via stdin.".to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("Cannot read stdin: {}", e))?;
    Ok(buf)
}
