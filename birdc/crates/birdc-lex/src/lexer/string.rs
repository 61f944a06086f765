//! String literal lexing.

use birdc_util::Span;

use crate::error::LexError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    ///
    /// Strings are `"`-delimited with no escape processing; the token's
    /// lexeme is the text between the quotes. Reaching end of input before
    /// the closing quote is fatal.
    pub(crate) fn lex_string(&mut self) -> Result<Token, LexError> {
        // opening quote
        self.cursor.advance();
        let content_start = self.cursor.position();

        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            return Err(LexError::UnterminatedString {
                line: self.token_start_line,
                column: self.token_start_column,
            });
        }

        let content = self.cursor.slice(content_start, self.cursor.position());

        // closing quote
        self.cursor.advance();

        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        Ok(Token::new(TokenKind::StrLiteral, content, span))
    }
}
