//! Process Module
//!
//! Process execution behind an injectable interface, so the expansion
//! engine can be exercised without spawning real processes.

pub mod types;
pub mod system;

pub use types::*;
pub use system::SystemExecutor;
