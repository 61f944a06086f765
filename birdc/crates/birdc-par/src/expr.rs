//! Expression parsing.
//!
//! Precedence climbing by one method per level, low to high. Left
//! recursion is expressed as iteration; assignment and ternary recurse to
//! the right.

use birdc_lex::TokenKind;
use birdc_util::Diagnostic;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses an expression (entry point: assignment level).
    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    /// assignment = ternary ( ASSIGN-OP assignment )?
    ///
    /// Right-associative; the target must be an identifier primary.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_ternary()?;

        if self.current_kind().is_assign_op() {
            let op = self.advance();
            let value = self.parse_assignment()?;

            return match expr.as_identifier() {
                Some(identifier) => Some(Expr::Assign(AssignExpr {
                    identifier: identifier.clone(),
                    op,
                    value: Box::new(value),
                })),
                None => {
                    self.error(Diagnostic::error(
                        "can not assign value to non-identifier",
                        op.span,
                    ));
                    None
                },
            };
        }

        Some(expr)
    }

    /// ternary = equality ( "?" expr ":" expr )?
    fn parse_ternary(&mut self) -> Option<Expr> {
        let condition = self.parse_equality()?;

        if self.match_token(TokenKind::Question) {
            let true_expr = self.parse_expr()?;
            self.expect(TokenKind::Colon, ":", "in ternary expression")?;
            let false_expr = self.parse_expr()?;

            return Some(Expr::Ternary(TernaryExpr {
                condition: Box::new(condition),
                true_expr: Box::new(true_expr),
                false_expr: Box::new(false_expr),
            }));
        }

        Some(condition)
    }

    /// equality = comparison (( "==" | "!=" ) comparison)*
    fn parse_equality(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;

        while matches!(
            self.current_kind(),
            TokenKind::EqualEqual | TokenKind::BangEqual
        ) {
            let op = self.advance();
            let right = self.parse_comparison()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Some(left)
    }

    /// comparison = term (( "<" | "<=" | ">" | ">=" ) term)*
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_term()?;

        while matches!(
            self.current_kind(),
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual
        ) {
            let op = self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Some(left)
    }

    /// term = factor (( "+" | "-" ) factor)*
    fn parse_term(&mut self) -> Option<Expr> {
        let mut left = self.parse_factor()?;

        while matches!(self.current_kind(), TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Some(left)
    }

    /// factor = unary (( "*" | "/" | "%" ) unary)*
    fn parse_factor(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;

        while matches!(
            self.current_kind(),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        ) {
            let op = self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Some(left)
    }

    /// unary = "-" unary | call
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.current_kind() == TokenKind::Minus {
            let op = self.advance();
            let expr = self.parse_unary()?;
            return Some(Expr::Unary(UnaryExpr {
                op,
                expr: Box::new(expr),
            }));
        }

        self.parse_call()
    }

    /// call = primary ( "(" args? ")" )?
    fn parse_call(&mut self) -> Option<Expr> {
        let expr = self.parse_primary()?;

        if self.current_kind() != TokenKind::LParen {
            return Some(expr);
        }

        let callee = match expr.as_identifier() {
            Some(identifier) => identifier.clone(),
            None => {
                self.error(Diagnostic::error(
                    "can only call named functions",
                    self.current_span(),
                ));
                return None;
            },
        };

        self.advance(); // (

        let mut args = Vec::new();
        if self.current_kind() != TokenKind::RParen {
            args.push(self.parse_expr()?);
            while self.match_token(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen, ")", "after call arguments")?;

        Some(Expr::Call(CallExpr { callee, args }))
    }

    /// primary = IDENT | INT | FLOAT | STR | BOOL | "(" expr ")"
    fn parse_primary(&mut self) -> Option<Expr> {
        match self.current_kind() {
            TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::BoolLiteral
            | TokenKind::StrLiteral => Some(Expr::Primary(PrimaryExpr {
                value: self.advance(),
            })),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, ")", "after grouped expression")?;
                Some(expr)
            },
            _ => {
                self.error(Diagnostic::expected(
                    "expression",
                    "",
                    self.current_span(),
                ));
                None
            },
        }
    }
}
