//! Variable Store Module
//!
//! Provides the variable stores the expansion engine reads from and writes to:
//! - ProcessEnv: the real process environment (default)
//! - InMemoryEnv: an ordered in-memory map, optionally isolated

pub mod types;
pub mod process_env;
pub mod in_memory_env;

pub use types::*;
pub use process_env::ProcessEnv;
pub use in_memory_env::InMemoryEnv;
