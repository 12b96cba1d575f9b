//! In-Memory Variable Store
//!
//! An ordered map of variables, detached from the process environment.

use super::types::{VariableMap, VariableStore};

/// In-memory variable store.
///
/// When `isolated`, spawned processes see exactly these variables and
/// nothing inherited from the parent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InMemoryEnv {
    vars: VariableMap,
    isolated: bool,
}

impl InMemoryEnv {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            isolated: false,
        }
    }

    /// Hand this store to child processes as their whole environment.
    pub fn isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.vars.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl VariableStore for InMemoryEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn all(&self) -> Option<VariableMap> {
        if self.isolated {
            Some(self.vars.clone())
        } else {
            None
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InMemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_vars(iter)
    }
}
