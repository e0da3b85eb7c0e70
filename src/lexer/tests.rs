//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String and byte literals
//! - Operators and punctuation, including two-byte lookahead
//! - Comments
//! - Positions across lines and buffer boundaries
//! - Error cases

use std::io::{self, Cursor, Read};

use pretty_assertions::assert_eq;

use super::{
    config::{EndOfInputPolicy, LexerConfig, NumberTerminators},
    lexer::{tokenize, Lexer},
    table::Table,
    tokens::{Token, TokenKind, TokenValue},
};
use crate::Position;

fn lex_with(source: &str, config: LexerConfig) -> (Vec<Token>, Table) {
    tokenize(Cursor::new(source.as_bytes().to_vec()), config).unwrap()
}

fn lex(source: &str) -> Vec<Token> {
    lex_with(source, LexerConfig::default()).0
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|token| token.kind).collect()
}

/// Yields `source`, then fails every read after it.
struct FailingReader {
    source: Cursor<Vec<u8>>,
}

impl FailingReader {
    fn new(source: &[u8]) -> Self {
        FailingReader {
            source: Cursor::new(source.to_vec()),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.source.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::Other, "disk on fire")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_tokenize_keywords() {
    let source =
        "func var true false if else return switch case type struct package len import make";
    let tokens = lex(source);

    assert_eq!(tokens[0].kind, TokenKind::Func);
    assert_eq!(tokens[1].kind, TokenKind::Var);
    assert_eq!(tokens[2].kind, TokenKind::True);
    assert_eq!(tokens[3].kind, TokenKind::False);
    assert_eq!(tokens[4].kind, TokenKind::If);
    assert_eq!(tokens[5].kind, TokenKind::Else);
    assert_eq!(tokens[6].kind, TokenKind::Return);
    assert_eq!(tokens[7].kind, TokenKind::Switch);
    assert_eq!(tokens[8].kind, TokenKind::Case);
    assert_eq!(tokens[9].kind, TokenKind::Type);
    assert_eq!(tokens[10].kind, TokenKind::Struct);
    assert_eq!(tokens[11].kind, TokenKind::Package);
    assert_eq!(tokens[12].kind, TokenKind::Len);
    assert_eq!(tokens[13].kind, TokenKind::Import);
    assert_eq!(tokens[14].kind, TokenKind::Make);
    assert_eq!(tokens[15].kind, TokenKind::EOF);
    assert!(tokens[..15].iter().all(|token| token.value == TokenValue::None));
}

#[test]
fn test_tokenize_type_keywords() {
    assert_eq!(
        kinds("int float string bool byte"),
        vec![
            TokenKind::TypeInt,
            TokenKind::TypeFloat,
            TokenKind::TypeString,
            TokenKind::TypeBool,
            TokenKind::TypeByte,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let (tokens, table) =
        lex_with("foo bar baz_123 _underscore CamelCase iff", LexerConfig::default());
    let names = ["foo", "bar", "baz_123", "_underscore", "CamelCase", "iff"];

    for (index, name) in names.iter().enumerate() {
        assert_eq!(tokens[index].kind, TokenKind::Identifier);
        assert_eq!(tokens[index].value, TokenValue::Symbol(index));
        assert_eq!(table.symbols.get(index).unwrap().name, *name);
    }
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_identifier_occurrences_get_separate_entries() {
    let (tokens, table) = lex_with("foo foo", LexerConfig::default());

    assert_eq!(tokens[0].value, TokenValue::Symbol(0));
    assert_eq!(tokens[1].value, TokenValue::Symbol(1));
    assert_eq!(table.symbols.len(), 2);
    assert_eq!(table.symbols.get(0).unwrap().name, "foo");
    assert_eq!(table.symbols.get(1).unwrap().name, "foo");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 3.14 0 100.5");

    assert_eq!(tokens[0].kind, TokenKind::Int);
    assert_eq!(tokens[0].value, TokenValue::Int(42));
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, TokenValue::Float("3.14".parse().unwrap()));
    assert_eq!(tokens[2].kind, TokenKind::Int);
    assert_eq!(tokens[2].value, TokenValue::Int(0));
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].value, TokenValue::Float(100.5));
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_number_followed_by_letter_is_illegal() {
    let err = tokenize(Cursor::new(b"42x".to_vec()), LexerConfig::default()).unwrap_err();

    assert_eq!(err.get_error_name(), "IllegalNumber");
    assert_eq!(err.to_string(), "Line 1, Column 3: illegal number");
}

#[test]
fn test_number_terminators() {
    let strict = tokenize(Cursor::new(b"5+3".to_vec()), LexerConfig::default());
    assert!(strict.is_err());

    let relaxed = LexerConfig::default().with_number_terminators(NumberTerminators::Relaxed);
    let tokens = lex_with("5+3 f(1, 2.5)", relaxed).0;
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Int,
            TokenKind::Plus,
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Int,
            TokenKind::Comma,
            TokenKind::Float,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );

    let err = tokenize(Cursor::new(b"42x".to_vec()), relaxed).unwrap_err();
    assert_eq!(err.get_error_name(), "IllegalNumber");
}

#[test]
fn test_malformed_numbers() {
    let err = tokenize(Cursor::new(b"1.2.3 ".to_vec()), LexerConfig::default()).unwrap_err();
    assert_eq!(err.get_error_name(), "NumberParseError");

    let err = tokenize(
        Cursor::new(b"99999999999999999999".to_vec()),
        LexerConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.get_error_name(), "NumberParseError");
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "world" "multiple words" """#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, TokenValue::String(String::from("hello")));
    assert_eq!(tokens[1].value, TokenValue::String(String::from("world")));
    assert_eq!(tokens[2].value, TokenValue::String(String::from("multiple words")));
    assert_eq!(tokens[3].value, TokenValue::String(String::new()));
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_escaped_quote_does_not_close_string() {
    let tokens = lex(r#""quote\"test" "tab\t""#);

    assert_eq!(tokens[0].value, TokenValue::String(String::from(r#"quote\"test"#)));
    assert_eq!(tokens[1].value, TokenValue::String(String::from(r"tab\t")));
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_unterminated_string() {
    let tokens = lex("\"never closed");
    assert_eq!(tokens[0].value, TokenValue::String(String::from("never closed")));
    assert_eq!(tokens[1].kind, TokenKind::EOF);

    let strict = LexerConfig::default().with_end_of_input(EndOfInputPolicy::Strict);
    let err = tokenize(Cursor::new(b"x := \"never closed".to_vec()), strict).unwrap_err();
    assert_eq!(err.get_error_name(), "UnterminatedString");
    assert_eq!(*err.get_position(), Position::new(1, 6));
}

#[test]
fn test_tokenize_byte_literals() {
    let tokens = lex(r"'a' '\n' '\'' '\\'");

    assert_eq!(tokens[0].kind, TokenKind::Byte);
    assert_eq!(tokens[0].value, TokenValue::Byte(b'a'));
    assert_eq!(tokens[1].value, TokenValue::Byte(b'\n'));
    assert_eq!(tokens[2].value, TokenValue::Byte(b'\''));
    assert_eq!(tokens[3].value, TokenValue::Byte(b'\\'));
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_malformed_byte_literals_are_illegal_tokens() {
    assert_eq!(kinds("''"), vec![TokenKind::Illegal, TokenKind::EOF]);
    assert_eq!(
        kinds("'ab'"),
        vec![
            TokenKind::Illegal,
            TokenKind::Identifier,
            TokenKind::Illegal,
            TokenKind::EOF,
        ]
    );
    assert_eq!(kinds("'a"), vec![TokenKind::Illegal, TokenKind::EOF]);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / = == != < <= > >= & && | || : :="),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Multiply,
            TokenKind::Divide,
            TokenKind::Assign,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::LessThan,
            TokenKind::LessEquals,
            TokenKind::GreaterThan,
            TokenKind::GreaterEquals,
            TokenKind::Addr,
            TokenKind::And,
            TokenKind::Pipe,
            TokenKind::Or,
            TokenKind::Colon,
            TokenKind::Create,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_create_versus_colon() {
    assert_eq!(kinds(":="), vec![TokenKind::Create, TokenKind::EOF]);
    assert_eq!(
        kinds(":x"),
        vec![TokenKind::Colon, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(
        kinds(": ="),
        vec![TokenKind::Colon, TokenKind::Assign, TokenKind::EOF]
    );
}

#[test]
fn test_lone_bang_is_illegal() {
    assert_eq!(
        kinds("!x"),
        vec![TokenKind::Illegal, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] . , ;"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("1 // comment\n2");

    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].value, TokenValue::Int(1));
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].value, TokenValue::Int(2));
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_block_comments() {
    let tokens = lex("a /* one\ntwo */ b /**/ c");

    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    // Lines inside the comment are still counted.
    assert_eq!((tokens[1].line, tokens[1].column), (2, 8));
    assert_eq!((tokens[2].line, tokens[2].column), (2, 15));
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(kinds("x /* open"), vec![TokenKind::Identifier, TokenKind::EOF]);
    assert_eq!(kinds("x /*/"), vec![TokenKind::Identifier, TokenKind::EOF]);

    let strict = LexerConfig::default().with_end_of_input(EndOfInputPolicy::Strict);
    let err = tokenize(Cursor::new(b"x /* open".to_vec()), strict).unwrap_err();
    assert_eq!(err.get_error_name(), "UnterminatedComment");
    assert_eq!(err.to_string(), "Line 1, Column 3: unterminated block comment");
}

#[test]
fn test_positions() {
    let tokens = lex("ab\ncd");

    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
    assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
    assert_eq!(tokens[3].kind, TokenKind::EOF);
    assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
}

#[test]
fn test_two_byte_operator_position_is_its_first_byte() {
    let tokens = lex("x  := 1");

    assert_eq!(tokens[1].kind, TokenKind::Create);
    assert_eq!((tokens[1].line, tokens[1].column), (1, 4));
    assert_eq!((tokens[2].line, tokens[2].column), (1, 7));
}

#[test]
fn test_whitespace_handling() {
    assert_eq!(
        kinds("  var \t x\r\n"),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_unrecognized_character() {
    let err = tokenize(Cursor::new(b"x := @".to_vec()), LexerConfig::default()).unwrap_err();

    assert_eq!(err.get_error_name(), "UnrecognisedCharacter");
    assert_eq!(err.to_string(), "Line 1, Column 6: Unrecognized character '@'");
}

#[test]
fn test_unrecognized_non_ascii_byte() {
    let err = tokenize(Cursor::new("x := é".as_bytes().to_vec()), LexerConfig::default())
        .unwrap_err();

    assert_eq!(err.to_string(), "Line 1, Column 6: Unrecognized character '\\xc3'");
}

#[test]
fn test_eof_is_idempotent() {
    let mut lex = Lexer::from_bytes("x", LexerConfig::default()).unwrap();

    assert_eq!(lex.next_token().unwrap().kind, TokenKind::Identifier);
    let eof = lex.next_token().unwrap();
    assert_eq!(eof.kind, TokenKind::EOF);
    for _ in 0..3 {
        assert_eq!(lex.next_token().unwrap(), eof);
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
    assert_eq!(kinds(" \t "), vec![TokenKind::EOF]);
}

#[test]
fn test_iterator_stops_after_error() {
    let lex = Lexer::from_bytes("a # b", LexerConfig::default()).unwrap();
    let results: Vec<_> = lex.collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[test]
fn test_read_error_reports_position() {
    let config = LexerConfig::default().with_buffer_capacity(4);
    let err = tokenize(FailingReader::new(b"ab cd ef"), config).unwrap_err();

    assert_eq!(err.get_error_name(), "Io");
    assert_eq!(*err.get_position(), Position::new(1, 8));
    assert_eq!(err.to_string(), "Line 1, Column 8: disk on fire");
}

#[test]
fn test_read_error_is_not_followed_by_tokens() {
    let config = LexerConfig::default().with_buffer_capacity(4);
    let mut lex = Lexer::with_config(FailingReader::new(b"ab cd ef"), config).unwrap();

    assert_eq!(lex.next_token().unwrap().position(), Position::new(1, 1));
    assert_eq!(lex.next_token().unwrap().position(), Position::new(1, 4));
    for _ in 0..3 {
        let err = lex.next_token().unwrap_err();
        assert_eq!(err.to_string(), "Line 1, Column 8: disk on fire");
    }
}

#[test]
fn test_lexer_debug() {
    let mut lex = Lexer::from_bytes("foo bar", LexerConfig::default()).unwrap();
    lex.next_token().unwrap();

    let debug = format!("{:?}", lex);
    assert!(debug.starts_with("Lexer {"));
    assert!(debug.contains("symbols: 1"));
}

#[test]
fn test_observer_sees_every_token() {
    use std::{cell::RefCell, rc::Rc};

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut lex = Lexer::from_bytes("foo := 1", LexerConfig::default())
        .unwrap()
        .with_observer(move |token, table| {
            let name = match token.value {
                TokenValue::Symbol(index) => {
                    table.symbols.get(index).map(|symbol| symbol.name.clone())
                }
                _ => None,
            };
            sink.borrow_mut().push((token.kind, name));
        });

    while !lex.next_token().unwrap().is_eof() {}

    assert_eq!(
        *seen.borrow(),
        vec![
            (TokenKind::Identifier, Some(String::from("foo"))),
            (TokenKind::Create, None),
            (TokenKind::Int, None),
            (TokenKind::EOF, None),
        ]
    );
}

#[test]
fn test_tokenize_simple_program() {
    let source = "package main\n\nfunc add(a int, b int) int {\n    return a + b\n}\n";
    let kinds = kinds(source);

    assert_eq!(
        kinds,
        vec![
            TokenKind::Package,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Func,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::TypeInt,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::TypeInt,
            TokenKind::CloseParen,
            TokenKind::TypeInt,
            TokenKind::OpenCurly,
            TokenKind::Newline,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::CloseCurly,
            TokenKind::Newline,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_small_buffers_match_large_buffer() {
    let source =
        "if a == b && c != d {\n    x := 3.25 // note\n    s := \"str\" /* c */ y >= 10\n}\n";
    let expected = lex(source);

    for capacity in 1..=8 {
        let config = LexerConfig::default().with_buffer_capacity(capacity);
        assert_eq!(lex_with(source, config).0, expected, "capacity {}", capacity);
    }
}

#[test]
fn test_operator_straddling_block_boundary() {
    // With 4-byte blocks the `==` starts at the end of the first block.
    let config = LexerConfig::default().with_buffer_capacity(4);
    let tokens = lex_with("abc==d", config).0;

    assert_eq!(tokens[1].kind, TokenKind::Equals);
    assert_eq!(tokens[1].column, 4);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);

    let tokens = lex_with("ab :=", config).0;
    assert_eq!(tokens[1].kind, TokenKind::Create);

    let tokens = lex_with("abc return", config).0;
    assert_eq!(tokens[1].kind, TokenKind::Return);
}

#[test]
fn test_token_kind_helpers() {
    assert!(TokenKind::Func.is_keyword());
    assert!(TokenKind::TypeInt.is_keyword());
    assert!(!TokenKind::Identifier.is_keyword());
    assert!(TokenKind::Identifier.carries_value());
    assert!(TokenKind::Byte.carries_value());
    assert!(!TokenKind::Create.carries_value());
}

#[test]
fn test_token_display() {
    let tokens = lex("x := 'a'");

    assert_eq!(tokens[0].to_string(), "1:1 Identifier (#0)");
    assert_eq!(tokens[1].to_string(), "1:3 Create ()");
    assert_eq!(tokens[2].to_string(), "1:6 Byte ('a')");
}
