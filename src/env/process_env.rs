//! Process Environment Store
//!
//! Reads and writes the real environment of the current process.

use super::types::VariableStore;

/// The ambient process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        Self
    }
}

impl VariableStore for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }
}
