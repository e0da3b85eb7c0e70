//! Lexical analysis module.
//!
//! This module converts a byte stream into a stream of tokens. It handles:
//!
//! - Block reads from the underlying source (`source`)
//! - Double-buffered read-ahead on a background worker (`buffer`)
//! - Line/column tracking over the buffered bytes (`cursor`)
//! - Recognition of keywords, identifiers, literals, operators and comments (`lexer`)
//! - Interning of identifiers and constants (`table`)

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod lexer;
pub mod source;
pub mod table;
pub mod tokens;

#[cfg(test)]
mod tests;
