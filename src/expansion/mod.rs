//! Expansion module
//!
//! This module contains the template expansion engine: the scanner state
//! machine, the `${...}` resolver and the `$(...)` executor.

pub mod command_substitution;
pub mod errors;
pub mod helpers;
pub mod interpolation;
pub mod state_machine;
pub mod types;

pub use errors::*;
pub use state_machine::{expand, try_expand, Expander};
pub use types::*;
