//! Statement parsing.

use std::rc::Rc;

use birdc_lex::TokenKind;
use birdc_util::Diagnostic;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a statement, dispatching on the first token.
    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current_kind() {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Const => self.parse_const_decl(),
            TokenKind::Type => self.parse_type_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Fn => self.parse_func(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_var_decl(&mut self) -> Option<Stmt> {
        self.advance(); // var

        let identifier = self.expect(TokenKind::Identifier, "identifier", "after var in declaration")?;
        let ty = self.parse_optional_type_annotation()?;
        self.expect(TokenKind::Equal, "=", "in declaration")?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, ";", "at the end of declaration")?;

        Some(Stmt::Decl(DeclStmt {
            identifier,
            ty,
            value,
        }))
    }

    fn parse_const_decl(&mut self) -> Option<Stmt> {
        self.advance(); // const

        let identifier =
            self.expect(TokenKind::Identifier, "identifier", "after const in declaration")?;
        let ty = self.parse_optional_type_annotation()?;
        self.expect(TokenKind::Equal, "=", "in declaration")?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, ";", "at the end of declaration")?;

        Some(Stmt::Const(ConstStmt {
            identifier,
            ty,
            value,
        }))
    }

    /// Parses the `: type` suffix of a declaration, if present.
    fn parse_optional_type_annotation(&mut self) -> Option<Option<TypeRef>> {
        if self.match_token(TokenKind::Colon) {
            Some(Some(self.parse_type_ref("after : in declaration")?))
        } else {
            Some(None)
        }
    }

    fn parse_type_stmt(&mut self) -> Option<Stmt> {
        self.advance(); // type

        let identifier =
            self.expect(TokenKind::Identifier, "identifier", "after type in type statement")?;
        self.expect(TokenKind::Equal, "=", "in type statement")?;
        let ty = self.parse_type_ref("after = in type statement")?;
        self.expect(TokenKind::Semicolon, ";", "at the end of type statement")?;

        Some(Stmt::TypeAlias(TypeStmt { identifier, ty }))
    }

    /// Parses a type reference: a type-literal or an alias identifier.
    pub(crate) fn parse_type_ref(&mut self, context: &str) -> Option<TypeRef> {
        match self.current_kind() {
            TokenKind::TypeLiteral => Some(TypeRef {
                token: self.advance(),
                is_literal: true,
            }),
            TokenKind::Identifier => Some(TypeRef {
                token: self.advance(),
                is_literal: false,
            }),
            _ => {
                self.error(Diagnostic::expected(
                    "type literal or type identifier",
                    context,
                    self.current_span(),
                ));
                None
            },
        }
    }

    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        self.advance(); // if

        let condition = self.parse_expr()?;
        let then_branch = Box::new(self.parse_stmt()?);

        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Some(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        self.advance(); // while

        let condition = self.parse_expr()?;
        let body = Box::new(self.parse_stmt()?);

        Some(Stmt::While(WhileStmt { condition, body }))
    }

    /// `for ( init? ; cond? ; step? ) do body`, parentheses optional.
    ///
    /// The initializer is a full statement and consumes its own `;`; an
    /// absent initializer leaves a bare `;`.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        self.advance(); // for

        let parenthesized = self.match_token(TokenKind::LParen);

        let initializer = if self.match_token(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_stmt()?))
        };

        let condition = if self.current_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, ";", "after for condition")?;

        let increment = if matches!(
            self.current_kind(),
            TokenKind::Do | TokenKind::RParen
        ) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if parenthesized {
            self.expect(TokenKind::RParen, ")", "after for clauses")?;
        }
        self.expect(TokenKind::Do, "do", "at the end of for statement clauses")?;

        let body = Box::new(self.parse_stmt()?);

        Some(Stmt::For(ForStmt {
            initializer,
            condition,
            increment,
            body,
        }))
    }

    fn parse_print_stmt(&mut self) -> Option<Stmt> {
        self.advance(); // print

        let mut args = vec![self.parse_expr()?];
        while self.match_token(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.expect(TokenKind::Semicolon, ";", "at the end of print statement")?;

        Some(Stmt::Print(PrintStmt { args }))
    }

    fn parse_func(&mut self) -> Option<Stmt> {
        self.advance(); // fn

        let identifier = self.expect(TokenKind::Identifier, "identifier", "after fn")?;
        self.expect(TokenKind::LParen, "(", "after function name")?;

        let mut params = Vec::new();
        if self.current_kind() != TokenKind::RParen {
            loop {
                let name =
                    self.expect(TokenKind::Identifier, "identifier", "in function parameter")?;
                self.expect(TokenKind::Colon, ":", "after function parameter name")?;
                let ty = self.parse_type_ref("after : in function parameter")?;
                params.push(Param { name, ty });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, ")", "after function parameters")?;

        let return_type = if self.match_token(TokenKind::Arrow) {
            Some(self.parse_type_ref("after -> in function declaration")?)
        } else {
            None
        };

        if self.current_kind() != TokenKind::LBrace {
            self.error(Diagnostic::expected(
                "{",
                "before function body",
                self.current_span(),
            ));
            return None;
        }
        let body = Rc::new(self.parse_block()?);

        Some(Stmt::Func(FuncStmt {
            identifier,
            params,
            return_type,
            body,
        }))
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let keyword = self.advance(); // return

        let expr = if self.current_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, ";", "at the end of return statement")?;

        Some(Stmt::Return(ReturnStmt { keyword, expr }))
    }

    fn parse_break_stmt(&mut self) -> Option<Stmt> {
        let keyword = self.advance(); // break
        self.expect(TokenKind::Semicolon, ";", "after break")?;
        Some(Stmt::Break(BreakStmt { keyword }))
    }

    fn parse_continue_stmt(&mut self) -> Option<Stmt> {
        let keyword = self.advance(); // continue
        self.expect(TokenKind::Semicolon, ";", "after continue")?;
        Some(Stmt::Continue(ContinueStmt { keyword }))
    }

    /// Parses a braced block, recovering inside so one bad statement does
    /// not abandon the rest of the block.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        self.expect(TokenKind::LBrace, "{", "at the beginning of block")?;

        let mut stmts = Vec::new();
        while !self.is_at_end() && self.current_kind() != TokenKind::RBrace {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
        }

        self.expect(TokenKind::RBrace, "}", "at the end of block")?;

        Some(Block { stmts })
    }

    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, ";", "at the end of expression")?;
        Some(Stmt::Expr(ExprStmt { expr }))
    }
}
