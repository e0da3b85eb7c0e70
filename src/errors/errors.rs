use std::{fmt::Display, io};

use thiserror::Error;

use crate::Position;

#[derive(Debug)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Io(_) => "Io",
            ErrorImpl::IllegalNumber { .. } => "IllegalNumber",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::ConstantParseError { .. } => "ConstantParseError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Io(_) => ErrorTip::None,
            ErrorImpl::IllegalNumber { literal } => ErrorTip::Suggestion(format!(
                "Number `{}` must be followed by whitespace or a line break",
                literal
            )),
            ErrorImpl::NumberParseError { literal } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                literal
            )),
            ErrorImpl::UnrecognisedCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Add a closing `\"` to the string literal"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Add a closing `*/` to the block comment"))
            }
            ErrorImpl::ConstantParseError { literal } => ErrorTip::Suggestion(format!(
                "Constant `{}` is not a 64-bit integer",
                literal
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.internal_error {
            ErrorImpl::Io(err) => Some(err),
            _ => None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug)]
pub enum ErrorImpl {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("illegal number")]
    IllegalNumber { literal: String },
    #[error("error parsing number: {literal:?}")]
    NumberParseError { literal: String },
    #[error("Unrecognized character '{}'", .byte.escape_ascii())]
    UnrecognisedCharacter { byte: u8 },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid integer constant: {literal:?}")]
    ConstantParseError { literal: String },
}
