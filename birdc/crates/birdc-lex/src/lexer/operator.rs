//! Operator lexing.
//!
//! Every method consumes its leading character and peeks one ahead for the
//! two-character forms.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// `+` or `+=`
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::PlusEqual)
        } else {
            self.make_token(TokenKind::Plus)
        }
    }

    /// `-`, `->`, or `-=`
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('>') {
            self.make_token(TokenKind::Arrow)
        } else if self.match_char('=') {
            self.make_token(TokenKind::MinusEqual)
        } else {
            self.make_token(TokenKind::Minus)
        }
    }

    /// `*` or `*=`
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::StarEqual)
        } else {
            self.make_token(TokenKind::Star)
        }
    }

    /// `/` or `/=` (comments were consumed before dispatch)
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::SlashEqual)
        } else {
            self.make_token(TokenKind::Slash)
        }
    }

    /// `%` or `%=`
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::PercentEqual)
        } else {
            self.make_token(TokenKind::Percent)
        }
    }

    /// `=` or `==`
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::EqualEqual)
        } else {
            self.make_token(TokenKind::Equal)
        }
    }

    /// `!` or `!=`
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::BangEqual)
        } else {
            self.make_token(TokenKind::Bang)
        }
    }

    /// `<` or `<=`
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::LessEqual)
        } else {
            self.make_token(TokenKind::Less)
        }
    }

    /// `>` or `>=`
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.match_char('=') {
            self.make_token(TokenKind::GreaterEqual)
        } else {
            self.make_token(TokenKind::Greater)
        }
    }

    /// Consumes the current character if it matches.
    fn match_char(&mut self, expected: char) -> bool {
        if self.cursor.current_char() == expected {
            self.cursor.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds(">= <= == != -> += -= *= /= %="),
            vec![
                TokenKind::GreaterEqual,
                TokenKind::LessEqual,
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::Arrow,
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::StarEqual,
                TokenKind::SlashEqual,
                TokenKind::PercentEqual,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_single_char_operators() {
        assert_eq!(
            kinds("+ - * / % = ! < > ? :"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Equal,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Question,
                TokenKind::Colon,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_adjacent_operators_split_greedily() {
        // "===" is "==" then "="
        assert_eq!(
            kinds("==="),
            vec![TokenKind::EqualEqual, TokenKind::Equal, TokenKind::End]
        );
    }

    #[test]
    fn test_minus_at_eof() {
        assert_eq!(kinds("-"), vec![TokenKind::Minus, TokenKind::End]);
    }

    #[test]
    fn test_negative_literal_splits() {
        assert_eq!(
            kinds("-3"),
            vec![TokenKind::Minus, TokenKind::IntLiteral, TokenKind::End]
        );
    }
}
