use std::{fmt, fs::File, io::Read, path::Path};

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::{
    config::{EndOfInputPolicy, LexerConfig, NumberTerminators},
    cursor::Cursor,
    table::Table,
    tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP},
};

/// Called with every token produced, together with the table as it stands
/// after that token.
pub type TokenObserver = Box<dyn FnMut(&Token, &Table)>;

pub struct Lexer {
    cursor: Cursor,
    table: Table,
    config: LexerConfig,
    observer: Option<TokenObserver>,
    finished: bool,
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.cursor.position())
            .field("config", &self.config)
            .field("symbols", &self.table.symbols.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Lexer {
    pub fn new<R>(reader: R) -> Result<Lexer, Error>
    where
        R: Read + Send + 'static,
    {
        Lexer::with_config(reader, LexerConfig::default())
    }

    pub fn with_config<R>(reader: R, config: LexerConfig) -> Result<Lexer, Error>
    where
        R: Read + Send + 'static,
    {
        Ok(Lexer {
            cursor: Cursor::new(reader, config.buffer_capacity)?,
            table: Table::new(),
            config,
            observer: None,
            finished: false,
        })
    }

    pub fn from_bytes(source: impl Into<Vec<u8>>, config: LexerConfig) -> Result<Lexer, Error> {
        Lexer::with_config(std::io::Cursor::new(source.into()), config)
    }

    pub fn open(path: impl AsRef<Path>, config: LexerConfig) -> Result<Lexer, Error> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::new(ErrorImpl::Io(err), Position::new(1, 0)))?;
        Lexer::with_config(file, config)
    }

    pub fn with_observer(mut self, observer: impl FnMut(&Token, &Table) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Scans and returns the next token. Once the input is exhausted every
    /// call returns an `EOF` token at the same position.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        let token = self.scan_token()?;
        trace!(
            kind = %token.kind,
            value = %token.value,
            line = token.line,
            column = token.column,
            "token"
        );

        if let Some(observer) = self.observer.as_mut() {
            observer(&token, &self.table);
        }

        Ok(token)
    }

    fn scan_token(&mut self) -> Result<Token, Error> {
        loop {
            self.skip_whitespace()?;

            let start = self.cursor.position();
            if self.cursor.is_eof() {
                return Ok(MK_TOKEN!(TokenKind::EOF, start));
            }

            let kind = match self.cursor.current() {
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Multiply,
                b'/' => match self.cursor.peek()? {
                    b'/' => {
                        self.skip_line_comment()?;
                        continue;
                    }
                    b'*' => {
                        self.skip_block_comment()?;
                        continue;
                    }
                    _ => TokenKind::Divide,
                },
                b'=' => self.one_or_two(b'=', TokenKind::Equals, TokenKind::Assign)?,
                b'!' => self.one_or_two(b'=', TokenKind::NotEquals, TokenKind::Illegal)?,
                b'<' => self.one_or_two(b'=', TokenKind::LessEquals, TokenKind::LessThan)?,
                b'>' => self.one_or_two(b'=', TokenKind::GreaterEquals, TokenKind::GreaterThan)?,
                b'&' => self.one_or_two(b'&', TokenKind::And, TokenKind::Addr)?,
                b'|' => self.one_or_two(b'|', TokenKind::Or, TokenKind::Pipe)?,
                b':' => self.one_or_two(b'=', TokenKind::Create, TokenKind::Colon)?,
                b',' => TokenKind::Comma,
                b';' => TokenKind::Semicolon,
                b'.' => TokenKind::Dot,
                b'\n' => TokenKind::Newline,
                b'(' => TokenKind::OpenParen,
                b')' => TokenKind::CloseParen,
                b'[' => TokenKind::OpenBracket,
                b']' => TokenKind::CloseBracket,
                b'{' => TokenKind::OpenCurly,
                b'}' => TokenKind::CloseCurly,
                b'\'' => return self.scan_byte_literal(start),
                b'"' => return self.scan_string_literal(start),
                c if is_letter(c) => return self.scan_word(start),
                c if is_digit(c) => return self.scan_number(start),
                c => {
                    return Err(Error::new(ErrorImpl::UnrecognisedCharacter { byte: c }, start))
                }
            };

            self.cursor.advance()?;
            return Ok(MK_TOKEN!(kind, start));
        }
    }

    /// Consumes the second byte of a two-byte operator when it is `second`.
    fn one_or_two(
        &mut self,
        second: u8,
        two: TokenKind,
        one: TokenKind,
    ) -> Result<TokenKind, Error> {
        if self.cursor.peek()? == second {
            self.cursor.advance()?;
            Ok(two)
        } else {
            Ok(one)
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), Error> {
        while !self.cursor.is_eof() && matches!(self.cursor.current(), b' ' | b'\t' | b'\r') {
            self.cursor.advance()?;
        }
        Ok(())
    }

    /// Stops on the terminating newline so it still becomes a token.
    fn skip_line_comment(&mut self) -> Result<(), Error> {
        while !self.cursor.is_eof() && self.cursor.current() != b'\n' {
            self.cursor.advance()?;
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), Error> {
        let start = self.cursor.position();
        // Step over `/*` so the `*` cannot close the comment as `/*/`.
        self.cursor.advance()?;
        self.cursor.advance()?;

        loop {
            if self.cursor.is_eof() {
                return match self.config.end_of_input {
                    EndOfInputPolicy::Lenient => Ok(()),
                    EndOfInputPolicy::Strict => {
                        Err(Error::new(ErrorImpl::UnterminatedComment, start))
                    }
                };
            }
            if self.cursor.current() == b'*' && self.cursor.peek()? == b'/' {
                self.cursor.advance()?;
                self.cursor.advance()?;
                return Ok(());
            }
            self.cursor.advance()?;
        }
    }

    /// `'x'` or `'\x'`. A missing or misplaced closing quote gives an
    /// `Illegal` token instead of an error.
    fn scan_byte_literal(&mut self, start: Position) -> Result<Token, Error> {
        self.cursor.advance()?;
        if self.cursor.is_eof() {
            return Ok(MK_TOKEN!(TokenKind::Illegal, start));
        }
        if self.cursor.current() == b'\'' {
            self.cursor.advance()?;
            return Ok(MK_TOKEN!(TokenKind::Illegal, start));
        }

        let value = if self.cursor.current() == b'\\' {
            self.cursor.advance()?;
            if self.cursor.is_eof() {
                return Ok(MK_TOKEN!(TokenKind::Illegal, start));
            }
            unescape(self.cursor.current())
        } else {
            self.cursor.current()
        };

        self.cursor.advance()?;
        if self.cursor.is_eof() || self.cursor.current() != b'\'' {
            return Ok(MK_TOKEN!(TokenKind::Illegal, start));
        }

        self.cursor.advance()?;
        Ok(MK_TOKEN!(TokenKind::Byte, TokenValue::Byte(value), start))
    }

    /// Raw bytes up to the next unescaped `"`. Escapes are kept verbatim;
    /// a backslash only stops the following byte from closing the string.
    fn scan_string_literal(&mut self, start: Position) -> Result<Token, Error> {
        let mut bytes = Vec::new();
        let mut escaped = false;

        loop {
            self.cursor.advance()?;
            if self.cursor.is_eof() {
                if self.config.end_of_input == EndOfInputPolicy::Strict {
                    return Err(Error::new(ErrorImpl::UnterminatedString, start));
                }
                break;
            }

            let byte = self.cursor.current();
            if byte == b'"' && !escaped {
                self.cursor.advance()?;
                break;
            }

            escaped = byte == b'\\' && !escaped;
            bytes.push(byte);
        }

        let value = String::from_utf8_lossy(&bytes).into_owned();
        Ok(MK_TOKEN!(TokenKind::String, TokenValue::String(value), start))
    }

    /// Keyword, or an identifier interned into the symbol table.
    fn scan_word(&mut self, start: Position) -> Result<Token, Error> {
        let mut word = String::with_capacity(10);
        while !self.cursor.is_eof()
            && (is_letter(self.cursor.current()) || is_digit(self.cursor.current()))
        {
            word.push(self.cursor.current() as char);
            self.cursor.advance()?;
        }

        if let Some(kind) = RESERVED_LOOKUP.get(word.as_str()) {
            return Ok(MK_TOKEN!(*kind, start));
        }

        let index = self.table.add_identifier(&word);
        Ok(MK_TOKEN!(TokenKind::Identifier, TokenValue::Symbol(index), start))
    }

    /// A run of digits and dots; any dot makes it a float.
    fn scan_number(&mut self, start: Position) -> Result<Token, Error> {
        let mut literal = String::with_capacity(10);
        let mut is_float = false;

        while !self.cursor.is_eof()
            && (is_digit(self.cursor.current()) || self.cursor.current() == b'.')
        {
            if self.cursor.current() == b'.' {
                is_float = true;
            }
            literal.push(self.cursor.current() as char);
            self.cursor.advance()?;
        }

        if !self.is_number_terminator() {
            return Err(Error::new(
                ErrorImpl::IllegalNumber { literal },
                self.cursor.position(),
            ));
        }

        let parse_error =
            |literal: String| Error::new(ErrorImpl::NumberParseError { literal }, start);
        if is_float {
            let value = literal.parse::<f64>().map_err(|_| parse_error(literal.clone()))?;
            Ok(MK_TOKEN!(TokenKind::Float, TokenValue::Float(value), start))
        } else {
            let value = literal.parse::<i64>().map_err(|_| parse_error(literal.clone()))?;
            Ok(MK_TOKEN!(TokenKind::Int, TokenValue::Int(value), start))
        }
    }

    fn is_number_terminator(&self) -> bool {
        if self.cursor.is_eof() {
            return true;
        }

        let c = self.cursor.current();
        match self.config.number_terminators {
            NumberTerminators::Strict => matches!(c, b' ' | b'\t' | b'\r' | b'\n'),
            NumberTerminators::Relaxed => !(is_letter(c) || is_digit(c) || c == b'\'' || c == b'"'),
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, Error>;

    /// Yields tokens up to and including `EOF`, then `None`. Stops after
    /// the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(token) if !token.is_eof() => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn unescape(c: u8) -> u8 {
    match c {
        b'n' => b'\n',
        b't' => b'\t',
        b'r' => b'\r',
        b'0' => b'\0',
        other => other,
    }
}

/// Lexes the whole of `reader`, returning every token (ending with `EOF`)
/// and the populated table.
pub fn tokenize<R>(reader: R, config: LexerConfig) -> Result<(Vec<Token>, Table), Error>
where
    R: Read + Send + 'static,
{
    let mut lex = Lexer::with_config(reader, config)?;
    let mut tokens = vec![];

    for token in lex.by_ref() {
        tokens.push(token?);
    }

    Ok((tokens, lex.into_table()))
}
