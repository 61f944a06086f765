//! Numeric literal lexing.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes an integer or float literal.
    ///
    /// Integers are `[0-9]+`. A float requires a `.` followed by at least
    /// one digit; there is no leading-dot form and no exponent syntax. A
    /// `.` with no digit after it is left for the dispatch loop (where it
    /// is an unknown character).
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char().is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            return self.make_token(TokenKind::FloatLiteral);
        }

        self.make_token(TokenKind::IntLiteral)
    }
}
