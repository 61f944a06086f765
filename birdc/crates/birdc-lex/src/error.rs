//! Fatal lexer errors.

use thiserror::Error;

/// A fatal lexical error.
///
/// The lexer aborts on the first of these; there is no recovery at the
/// character level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("undefined character {ch} (line {line}, character {column})")]
    UnknownCharacter { ch: char, line: u32, column: u32 },

    #[error("unterminated string (line {line}, character {column})")]
    UnterminatedString { line: u32, column: u32 },

    #[error("unterminated multiline comment (line {line}, character {column})")]
    UnterminatedComment { line: u32, column: u32 },
}

impl LexError {
    /// The source position the error is anchored to.
    pub fn position(&self) -> (u32, u32) {
        match *self {
            LexError::UnknownCharacter { line, column, .. }
            | LexError::UnterminatedString { line, column }
            | LexError::UnterminatedComment { line, column } => (line, column),
        }
    }
}
