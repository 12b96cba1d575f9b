//! Configuration Files
//!
//! Expansion options can be kept in a TOML file:
//!
//! ```toml
//! windows_expansion = false
//! command_substitution = true
//! use_shell = "bash"
//!
//! [env]
//! GREETING = "hello"
//! ```
//!
//! Keys mirror `ExpansionOptions`; the optional `[env]` table seeds variables.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::expansion::ExpansionOptions;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    #[serde(flatten)]
    pub options: ExpansionOptions,
    /// Variables seeded into the store before expanding
    pub env: IndexMap<String, String>,
}

/// Parse a configuration document.
pub fn parse_config(text: &str) -> Result<ExpandConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Read and parse a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ExpandConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parse only the expansion options from a configuration document.
pub fn parse_options(text: &str) -> Result<ExpansionOptions, ConfigError> {
    parse_config(text).map(|config| config.options)
}

/// Read only the expansion options from a configuration file.
pub fn load_options(path: impl AsRef<Path>) -> Result<ExpansionOptions, ConfigError> {
    load_config(path).map(|config| config.options)
}
