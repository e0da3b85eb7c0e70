//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//!
//! These macros reduce boilerplate in the scanner.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's value (optional, defaults to `TokenValue::None`)
/// * `$position` - Position of the token's first byte
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Int, TokenValue::Int(42), position);
/// let token = MK_TOKEN!(TokenKind::Plus, position);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $position:expr) => {
        $crate::lexer::tokens::Token::new(
            $kind,
            $crate::lexer::tokens::TokenValue::None,
            $position,
        )
    };
    ($kind:expr, $value:expr, $position:expr) => {
        $crate::lexer::tokens::Token::new($kind, $value, $position)
    };
}
