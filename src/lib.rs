#![allow(clippy::module_inception)]

use std::{fmt::Display, fs, path::Path, sync::Once};

use crate::errors::errors::{Error, ErrorTip};

pub mod errors;
pub mod lexer;
pub mod macros;

pub use crate::lexer::config::{EndOfInputPolicy, LexerConfig, NumberTerminators};
pub use crate::lexer::lexer::{tokenize, Lexer};
pub use crate::lexer::table::{ConstantTable, SymbolInfo, SymbolTable, Table};
pub use crate::lexer::tokens::{Token, TokenKind, TokenValue};

/// Line/column of a byte in the source. Lines start at 1; column 0 means
/// "before the first byte of the line".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}, Column {}", self.line, self.column)
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=lexer=debug` (buffer
/// refills and swaps) or `RUST_LOG=lexer=trace` (every token).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Returns the text of a 1-based line of `file`, without its line ending.
pub fn get_line(file: &Path, line: u32) -> Option<String> {
    let content = fs::read(file).ok()?;
    let content = String::from_utf8_lossy(&content);

    content
        .split('\n')
        .nth(line.checked_sub(1)? as usize)
        .map(|text| text.trim_end_matches('\r').to_string())
}


/// Writes a fatal lexing error to stderr.
///
/// The first line is always `Line <L>, Column <C>: <message>`; when the
/// offending line can be read back from `file` it is echoed underneath with
/// a caret under the reported column.
pub fn display_error(error: &Error, file: &Path) {
    /*
        Line 3, Column 6: illegal number
        -> main.src
           |
         3 | x := 42x
           |      ^
    */

    eprintln!("{}", error);
    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        eprintln!("  = {}", tip);
    }

    let position = error.get_position();
    let Some(line_text) = get_line(file, position.line) else {
        return;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("-> {}", file.as_os_str().to_string_lossy());
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:>arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
