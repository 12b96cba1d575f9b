//! Variable Store Types
//!
//! The expansion engine never touches the process environment directly;
//! it reads and writes variables through a `VariableStore`.

use indexmap::IndexMap;

/// Ordered name/value pairs handed to child processes.
pub type VariableMap = IndexMap<String, String>;

/// Source and sink of variables for one expansion.
///
/// `get` must return the same answer for the same name for the duration of
/// an expansion call, apart from writes the engine itself makes via `set`.
/// The engine does no locking; stores shared across threads must do their own.
pub trait VariableStore {
    /// Look up a variable. `None` means unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Assign a variable (used by `${NAME:=default}`).
    fn set(&mut self, name: &str, value: &str);

    /// The complete environment for spawned processes.
    ///
    /// `Some` replaces the child's environment entirely; `None` lets the
    /// child inherit the ambient process environment.
    fn all(&self) -> Option<VariableMap> {
        None
    }
}
