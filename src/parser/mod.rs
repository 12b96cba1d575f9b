//! Parser module for command lines
//!
//! This module contains the lexer used to split `$(...)` bodies into
//! argument vectors.

pub mod lexer;

// Re-exports
pub use lexer::{tokenize, Lexer, Token, TokenKind};
