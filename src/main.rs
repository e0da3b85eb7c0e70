use std::{env, path::PathBuf, process::ExitCode, time::Instant};

use lexer::{display_error, init_tracing, Lexer, LexerConfig, TokenKind, TokenValue};
use tracing::debug;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: lexer <filename>");
        return ExitCode::from(2);
    }

    let file_path = PathBuf::from(&args[1]);
    let start = Instant::now();

    let lex = match Lexer::open(&file_path, LexerConfig::default()) {
        Ok(lex) => lex,
        Err(err) => {
            eprintln!("{}: {}", file_path.display(), err.get_error());
            return ExitCode::FAILURE;
        }
    };

    let mut lex = lex.with_observer(|token, table| {
        token.debug();
        if let (TokenKind::Identifier, TokenValue::Symbol(index)) = (token.kind, &token.value) {
            if let Some(symbol) = table.symbols.get(*index) {
                println!("    {}", symbol);
            }
        }
    });

    let mut count = 0usize;
    loop {
        match lex.next_token() {
            Ok(token) if token.is_eof() => break,
            Ok(_) => count += 1,
            Err(err) => {
                display_error(&err, &file_path);
                return ExitCode::FAILURE;
            }
        }
    }

    debug!(
        tokens = count,
        symbols = lex.table().symbols.len(),
        elapsed = ?start.elapsed(),
        "tokenized"
    );
    ExitCode::SUCCESS
}
