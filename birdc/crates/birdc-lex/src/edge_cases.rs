//! Edge-case and property tests for the lexer.

use crate::{Lexer, TokenKind};

#[test]
fn test_whole_program() {
    let source = r#"
        // count to three
        var x = 0;
        while x < 3 {
            x += 1;
            print x;
        }
    "#;
    let tokens = Lexer::new(source).lex().unwrap();
    assert_eq!(tokens.last().unwrap().kind, TokenKind::End);
    assert_eq!(
        tokens.iter().filter(|t| t.kind == TokenKind::Semicolon).count(),
        3
    );
}

#[test]
fn test_dense_operator_soup() {
    let tokens = Lexer::new("a>=b<=c==d!=e->f").lex().unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::GreaterEqual,
            TokenKind::Identifier,
            TokenKind::LessEqual,
            TokenKind::Identifier,
            TokenKind::EqualEqual,
            TokenKind::Identifier,
            TokenKind::BangEqual,
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::End,
        ]
    );
}

#[test]
fn test_ternary_tokens() {
    let tokens = Lexer::new("x ? 1 : 2").lex().unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Question,
            TokenKind::IntLiteral,
            TokenKind::Colon,
            TokenKind::IntLiteral,
            TokenKind::End,
        ]
    );
}

#[test]
fn test_columns_after_multibyte_string() {
    let tokens = Lexer::new("\"héllo\";").lex().unwrap();
    assert_eq!(tokens[0].lexeme, "héllo");
    assert_eq!(tokens[1].kind, TokenKind::Semicolon);
}

#[test]
fn test_windows_line_endings() {
    let tokens = Lexer::new("var x = 1;\r\nprint x;").lex().unwrap();
    let print_tok = tokens.iter().find(|t| t.kind == TokenKind::Print).unwrap();
    assert_eq!(print_tok.span.line, 2);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Lexer totality: every input either produces a stream ending in
        /// the End sentinel or fails with a positioned error. Nothing is
        /// silently consumed and the lexer always terminates.
        #[test]
        fn lexer_is_total(input in "\\PC*") {
            match Lexer::new(&input).lex() {
                Ok(tokens) => {
                    prop_assert!(!tokens.is_empty());
                    prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::End);
                }
                Err(err) => {
                    let (line, _column) = err.position();
                    prop_assert!(line >= 1);
                }
            }
        }

        /// Lexing valid identifier-shaped words never fails and round-trips
        /// the lexeme.
        #[test]
        fn identifiers_roundtrip(word in "[a-zA-Z_][a-zA-Z0-9_]{0,20}") {
            let tokens = Lexer::new(&word).lex().unwrap();
            prop_assert_eq!(tokens.len(), 2);
            prop_assert_eq!(tokens[0].lexeme.as_str(), word.as_str());
        }
    }
}
