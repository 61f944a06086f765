//! Core lexer implementation.
//!
//! This module contains the main Lexer struct, the per-character dispatch,
//! and the `lex` entry point that drives tokenization to the `End`
//! sentinel.

use birdc_util::Span;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Lexer for the Bird programming language.
///
/// Transforms source text into a stream of tokens. Whitespace and comments
/// are skipped (advancing line/column tracking); all lexical errors are
/// fatal.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Starting byte position of the current token.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    pub(crate) token_start_line: u32,

    /// Column where the current token starts (1-based).
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenizes the whole input.
    ///
    /// The returned stream always ends with a [`TokenKind::End`] sentinel.
    ///
    /// # Errors
    /// Returns the first fatal [`LexError`] encountered.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::End;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(Token::end(self.token_span()));
        }

        let token = match self.cursor.current_char() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '?' => self.single(TokenKind::Question),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                return Err(LexError::UnknownCharacter {
                    ch: c,
                    line: self.token_start_line,
                    column: self.token_start_column,
                });
            },
        };

        Ok(token)
    }

    /// Consumes one character and produces a token of the given kind.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind)
    }

    /// Builds a token spanning from `token_start` to the cursor.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = self.cursor.slice(self.token_start, self.cursor.position());
        Token::new(kind, lexeme, self.token_span())
    }

    /// Span from the token start to the current cursor position.
    pub(crate) fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .lex()
            .expect("lexing failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input_yields_end() {
        assert_eq!(kinds(""), vec![TokenKind::End]);
    }

    #[test]
    fn test_var_declaration() {
        assert_eq!(
            kinds("var x = 42;"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_typed_declaration() {
        assert_eq!(
            kinds("const pi: float = 3.14;"),
            vec![
                TokenKind::Const,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::TypeLiteral,
                TokenKind::Equal,
                TokenKind::FloatLiteral,
                TokenKind::Semicolon,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_function_header() {
        assert_eq!(
            kinds("fn add(a: int, b: int) -> int {}"),
            vec![
                TokenKind::Fn,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::TypeLiteral,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::TypeLiteral,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::TypeLiteral,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_token_positions() {
        let tokens = Lexer::new("var x;\nprint x;").lex().unwrap();
        let print_tok = &tokens[3];
        assert_eq!(print_tok.kind, TokenKind::Print);
        assert_eq!(print_tok.span.line, 2);
        assert_eq!(print_tok.span.column, 1);
    }

    #[test]
    fn test_unknown_character_is_fatal() {
        let err = Lexer::new("var @x = 1;").lex().unwrap_err();
        assert_eq!(
            err,
            LexError::UnknownCharacter {
                ch: '@',
                line: 1,
                column: 5
            }
        );
    }

    #[test]
    fn test_lexeme_text_preserved() {
        let tokens = Lexer::new("feather = 12;").lex().unwrap();
        assert_eq!(tokens[0].lexeme, "feather");
        assert_eq!(tokens[2].lexeme, "12");
    }
}
