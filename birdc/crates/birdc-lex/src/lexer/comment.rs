//! Whitespace and comment skipping.

use crate::error::LexError;
use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace, line comments, and block comments.
    ///
    /// Line comments run to the end of the line. Block comments are
    /// non-nesting; reaching end of input inside one is a fatal error.
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            let c = self.cursor.current_char();
            match c {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char() == '/' => self.skip_line_comment(),
                '/' if self.cursor.peek_char() == '*' => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        // consume "//" then everything up to the newline
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let line = self.cursor.line();
        let column = self.cursor.column();

        // consume "/*"
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char() == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(());
            }
            self.cursor.advance();
        }

        Err(LexError::UnterminatedComment { line, column })
    }
}

#[cfg(test)]
mod tests {
    use crate::{LexError, Lexer, TokenKind};

    #[test]
    fn test_line_comment_skipped() {
        let tokens = Lexer::new("// nothing here\nvar x = 1;").lex().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[0].span.line, 2);
    }

    #[test]
    fn test_line_comment_at_eof() {
        let tokens = Lexer::new("print x; // trailing").lex().unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::End);
    }

    #[test]
    fn test_block_comment_skipped() {
        let tokens = Lexer::new("var /* a\nmultiline\nnote */ x = 1;").lex().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].span.line, 3);
    }

    #[test]
    fn test_block_comments_do_not_nest() {
        // the first "*/" closes the comment, leaving "*/" as tokens
        let result = Lexer::new("/* /* */ var x = 1;").lex();
        assert!(result.is_ok());
        assert_eq!(result.unwrap()[0].kind, TokenKind::Var);
    }

    #[test]
    fn test_unterminated_block_comment_is_fatal() {
        let err = Lexer::new("var x = 1; /* open").lex().unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { line: 1, column: 12 });
    }
}
