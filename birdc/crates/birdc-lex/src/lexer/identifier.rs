//! Identifier and keyword lexing.

use crate::lexer::Lexer;
use crate::token::{keyword_kind, Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes an identifier or reserved word.
    ///
    /// Identifier rule: `[A-Za-z_][A-Za-z0-9_]*`.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let word = self.cursor.slice(self.token_start, self.cursor.position());
        match keyword_kind(word) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier),
        }
    }
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
