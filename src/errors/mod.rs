//! Error types and error handling for the lexer.
//!
//! This module defines the error types returned by every fallible lexing
//! operation. It includes:
//!
//! - Error structures carrying the line/column where lexing stopped
//! - Specific error variants for I/O, literal and character failures
//! - Error formatting matching the `Line <L>, Column <C>: <message>` contract
//! - Helpful suggestions for the command-line driver

pub mod errors;
