//! birdc-par - Parser (Syntactic Analyzer)
//!
//! Recursive-descent parser producing the Bird AST. Each non-terminal has a
//! corresponding method; expression parsing follows the precedence chain
//! (low to high): assignment, ternary, equality, comparison, additive,
//! multiplicative, unary, call, primary.
//!
//! Surface grammar (whitespace and comments omitted):
//!
//! ```ebnf
//! program     = stmt* ;
//! stmt        = var-decl | const-decl | type-decl | if-stmt | while-stmt
//!             | for-stmt | print-stmt | func-decl | return-stmt
//!             | break-stmt | continue-stmt | block | expr-stmt ;
//! var-decl    = "var"   IDENT ( ":" type-ref )? "=" expr ";" ;
//! const-decl  = "const" IDENT ( ":" type-ref )? "=" expr ";" ;
//! type-decl   = "type"  IDENT "=" type-ref ";" ;
//! for-stmt    = "for" ( "(" )? stmt? ";" expr? ";" expr? ( ")" )? "do" stmt ;
//! func-decl   = "fn" IDENT "(" params? ")" ( "->" type-ref )? block ;
//! assignment  = ternary ( ASSIGN-OP assignment )? ;
//! ternary     = equality ( "?" expr ":" expr )? ;
//! ```
//!
//! # Error recovery
//!
//! On a mismatch the parser records a diagnostic and calls `synchronize`,
//! which consumes tokens up to and including the next `;`. The failed
//! statement is omitted from the produced list and parsing re-enters at
//! statement level. A configurable error cap stops the parse outright when
//! a malformed input degenerates into cascades.

mod ast;
#[cfg(test)]
mod edge_cases;
mod expr;
mod stmt;

pub use ast::*;

use birdc_lex::{Token, TokenKind};
use birdc_util::{Diagnostic, Handler, Span};

/// Default cap on recorded parse errors before the parse is abandoned.
pub const DEFAULT_MAX_ERRORS: usize = 20;

/// Recursive-descent parser over a lexed token stream.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a Handler,
    max_errors: usize,
    errors: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser for a token stream ending in `End`.
    pub fn new(mut tokens: Vec<Token>, handler: &'a Handler) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::end(Span::DUMMY));
        }
        Self {
            tokens,
            position: 0,
            handler,
            max_errors: DEFAULT_MAX_ERRORS,
            errors: 0,
        }
    }

    /// Overrides the parse-error cap.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Parses the whole program.
    ///
    /// Statements that fail to parse are dropped; the diagnostics land in
    /// the handler.
    pub fn parse(&mut self) -> Ast {
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            if self.errors >= self.max_errors {
                break;
            }
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
        }

        stmts
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    /// The token at the cursor (the `End` sentinel once exhausted).
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::End
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Requires a token of the given kind; records an "expected" diagnostic
    /// and returns `None` on mismatch.
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        what: &str,
        context: &str,
    ) -> Option<Token> {
        if self.current_kind() == kind {
            Some(self.advance())
        } else {
            self.error(Diagnostic::expected(what, context, self.current_span()));
            None
        }
    }

    /// Records a diagnostic.
    pub(crate) fn error(&mut self, diagnostic: Diagnostic) {
        if self.errors < self.max_errors {
            self.handler.emit(diagnostic);
        }
        self.errors += 1;
    }

    /// Panic-mode recovery: consume tokens up to and including the next
    /// `;`. Always consumes at least one token unless already at `End`,
    /// which guarantees forward progress after an error.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            let token = self.advance();
            if token.kind == TokenKind::Semicolon {
                return;
            }
        }
    }
}
