use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("switch", TokenKind::Switch);
        map.insert("case", TokenKind::Case);
        map.insert("int", TokenKind::TypeInt);
        map.insert("float", TokenKind::TypeFloat);
        map.insert("string", TokenKind::TypeString);
        map.insert("bool", TokenKind::TypeBool);
        map.insert("byte", TokenKind::TypeByte);
        map.insert("func", TokenKind::Func);
        map.insert("var", TokenKind::Var);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("return", TokenKind::Return);
        map.insert("type", TokenKind::Type);
        map.insert("struct", TokenKind::Struct);
        map.insert("package", TokenKind::Package);
        map.insert("len", TokenKind::Len);
        map.insert("make", TokenKind::Make);
        map.insert("import", TokenKind::Import);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Illegal,

    Identifier,
    Int,
    Float,
    String,
    Bool,
    Byte,

    TypeInt,
    TypeFloat,
    TypeString,
    TypeBool,
    TypeByte,

    Plus,
    Minus,
    Multiply,
    Divide,
    Assign, // =
    Create, // :=
    LessThan,
    LessEquals,
    GreaterThan,
    GreaterEquals,
    Equals,    // ==
    NotEquals, // !=
    Addr,      // &
    And,       // &&
    Pipe,      // |
    Or,        // ||

    Comma,
    Semicolon,
    Colon,
    Newline,
    Dot,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,

    // Reserved
    Func,
    Var,
    True,
    False,
    If,
    Else,
    Return,
    Switch,
    Case,
    Type,
    Struct,
    Package,
    Len,
    Import,
    Make,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        RESERVED_LOOKUP.values().any(|kind| kind == self)
    }

    /// Kinds whose tokens carry a [`TokenValue`] other than `None`.
    pub fn carries_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::Byte
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Payload of a token. Identifiers hold their index in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Int(i64),
    Float(f64),
    String(String),
    Byte(u8),
    Symbol(usize),
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Int(value) => write!(f, "{}", value),
            TokenValue::Float(value) => write!(f, "{}", value),
            TokenValue::String(value) => write!(f, "{:?}", value),
            TokenValue::Byte(value) => write!(f, "'{}'", value.escape_ascii()),
            TokenValue::Symbol(index) => write!(f, "#{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, position: Position) -> Self {
        Token {
            kind,
            value,
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }

    pub fn debug(&self) {
        println!("{}", self);
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.carries_value() {
            write!(f, "{}:{} {} ({})", self.line, self.column, self.kind, self.value)
        } else {
            write!(f, "{}:{} {} ()", self.line, self.column, self.kind)
        }
    }
}
