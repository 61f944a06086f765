//! Semantic analysis: name resolution and structural validity.
//!
//! This pass does not infer types. It checks that identifiers are declared
//! before use and only once per lexical level, that only mutable bindings
//! are assigned, that `break`/`continue` appear inside loops and `return`
//! inside functions, and that calls name a declared function with the
//! right number of arguments.

use birdc_lex::{Token, TokenKind};
use birdc_par::*;
use birdc_util::{Diagnostic, Handler};

use crate::scope::Environment;

/// A value binding as the analyzer sees it: just its mutability.
#[derive(Debug, Clone, Copy)]
struct SemanticBinding {
    mutable: bool,
}

/// Walks the AST checking scoping and structure, accumulating diagnostics.
pub struct SemanticAnalyzer<'a> {
    env: Environment<SemanticBinding>,
    /// Callables with their arity.
    call_table: Environment<usize>,
    /// Declared type-alias names.
    type_table: Environment<()>,
    handler: &'a Handler,
    loop_depth: u32,
    function_depth: u32,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            env: Environment::new(),
            call_table: Environment::new(),
            type_table: Environment::new(),
            handler,
            loop_depth: 0,
            function_depth: 0,
        }
    }

    /// Analyzes a whole program.
    ///
    /// The walk continues past errors so multiple diagnostics surface in
    /// one run.
    pub fn analyze(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr_stmt) => self.visit_expr(&expr_stmt.expr),
            Stmt::Print(print) => {
                for arg in &print.args {
                    self.visit_expr(arg);
                }
            },
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Decl(decl) => self.visit_decl(&decl.identifier, &decl.value, true),
            Stmt::Const(decl) => self.visit_decl(&decl.identifier, &decl.value, false),
            Stmt::TypeAlias(alias) => self.visit_type_alias(alias),
            Stmt::If(if_stmt) => self.visit_if(if_stmt),
            Stmt::While(while_stmt) => self.visit_while(while_stmt),
            Stmt::For(for_stmt) => self.visit_for(for_stmt),
            Stmt::Func(func) => self.visit_func(func),
            Stmt::Return(ret) => self.visit_return(ret),
            Stmt::Break(brk) => self.check_in_loop(&brk.keyword, "Break"),
            Stmt::Continue(cont) => self.check_in_loop(&cont.keyword, "Continue"),
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.env.push_frame();
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
        self.env.pop_frame();
    }

    fn visit_decl(&mut self, identifier: &Token, value: &Expr, mutable: bool) {
        if self.declared_at_current_level(&identifier.lexeme) {
            self.handler.emit(Diagnostic::semantic_error(
                format!("Identifier '{}' is already declared.", identifier.lexeme),
                identifier.span,
            ));
            return;
        }

        self.visit_expr(value);
        self.env
            .declare(identifier.lexeme.clone(), SemanticBinding { mutable });
    }

    fn visit_type_alias(&mut self, alias: &TypeStmt) {
        if self.declared_at_current_level(&alias.identifier.lexeme) {
            self.handler.emit(Diagnostic::semantic_error(
                format!(
                    "Identifier '{}' is already declared.",
                    alias.identifier.lexeme
                ),
                alias.identifier.span,
            ));
            return;
        }

        self.type_table.declare(alias.identifier.lexeme.clone(), ());
    }

    fn visit_if(&mut self, if_stmt: &IfStmt) {
        self.visit_expr(&if_stmt.condition);
        self.visit_stmt(&if_stmt.then_branch);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.visit_stmt(else_branch);
        }
    }

    fn visit_while(&mut self, while_stmt: &WhileStmt) {
        self.loop_depth += 1;
        self.visit_expr(&while_stmt.condition);
        self.visit_stmt(&while_stmt.body);
        self.loop_depth -= 1;
    }

    fn visit_for(&mut self, for_stmt: &ForStmt) {
        self.loop_depth += 1;
        self.env.push_frame();

        if let Some(initializer) = &for_stmt.initializer {
            self.visit_stmt(initializer);
        }
        if let Some(condition) = &for_stmt.condition {
            self.visit_expr(condition);
        }
        self.visit_stmt(&for_stmt.body);
        if let Some(increment) = &for_stmt.increment {
            self.visit_expr(increment);
        }

        self.env.pop_frame();
        self.loop_depth -= 1;
    }

    fn visit_func(&mut self, func: &FuncStmt) {
        if self.declared_at_current_level(&func.identifier.lexeme) {
            self.handler.emit(Diagnostic::semantic_error(
                format!(
                    "Identifier '{}' is already declared.",
                    func.identifier.lexeme
                ),
                func.identifier.span,
            ));
            return;
        }

        // Register before the body walk so recursive calls resolve.
        self.call_table
            .declare(func.identifier.lexeme.clone(), func.params.len());

        self.function_depth += 1;
        // the body is a fresh jump context: an enclosing loop does not
        // license break/continue inside the function
        let previous_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.env.push_frame();

        for param in &func.params {
            if !self
                .env
                .declare(param.name.lexeme.clone(), SemanticBinding { mutable: true })
            {
                self.handler.emit(Diagnostic::semantic_error(
                    format!("Identifier '{}' is already declared.", param.name.lexeme),
                    param.name.span,
                ));
            }
        }

        for stmt in &func.body.stmts {
            self.visit_stmt(stmt);
        }

        self.env.pop_frame();
        self.loop_depth = previous_loop_depth;
        self.function_depth -= 1;
    }

    fn visit_return(&mut self, ret: &ReturnStmt) {
        if self.function_depth == 0 {
            self.handler.emit(Diagnostic::semantic_error(
                "Return statement is declared outside of a function.",
                ret.keyword.span,
            ));
            return;
        }

        if let Some(expr) = &ret.expr {
            self.visit_expr(expr);
        }
    }

    fn check_in_loop(&mut self, keyword: &Token, what: &str) {
        if self.loop_depth == 0 {
            self.handler.emit(Diagnostic::semantic_error(
                format!("{} statement is declared outside of a loop.", what),
                keyword.span,
            ));
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Primary(primary) => self.visit_primary(primary),
            Expr::Unary(unary) => self.visit_expr(&unary.expr),
            Expr::Binary(binary) => {
                self.visit_expr(&binary.left);
                self.visit_expr(&binary.right);
            },
            Expr::Ternary(ternary) => {
                self.visit_expr(&ternary.condition);
                self.visit_expr(&ternary.true_expr);
                self.visit_expr(&ternary.false_expr);
            },
            Expr::Assign(assign) => self.visit_assign(assign),
            Expr::Call(call) => self.visit_call(call),
        }
    }

    fn visit_primary(&mut self, primary: &PrimaryExpr) {
        if primary.value.kind == TokenKind::Identifier
            && !self.env.contains_anywhere(&primary.value.lexeme)
        {
            self.handler.emit(Diagnostic::semantic_error(
                format!(
                    "Identifier '{}' is not initialized.",
                    primary.value.lexeme
                ),
                primary.value.span,
            ));
        }
    }

    fn visit_assign(&mut self, assign: &AssignExpr) {
        match self.env.get(&assign.identifier.lexeme) {
            None => {
                self.handler.emit(Diagnostic::semantic_error(
                    format!(
                        "Identifier '{}' is not initialized.",
                        assign.identifier.lexeme
                    ),
                    assign.identifier.span,
                ));
                return;
            },
            Some(binding) if !binding.mutable => {
                self.handler.emit(Diagnostic::semantic_error(
                    format!(
                        "Identifier '{}' is not mutable.",
                        assign.identifier.lexeme
                    ),
                    assign.identifier.span,
                ));
                return;
            },
            Some(_) => {},
        }

        self.visit_expr(&assign.value);
    }

    fn visit_call(&mut self, call: &CallExpr) {
        for arg in &call.args {
            self.visit_expr(arg);
        }

        let Some(&arity) = self.call_table.get(&call.callee.lexeme) else {
            self.handler.emit(Diagnostic::semantic_error(
                format!(
                    "Function call identifier '{}' is not declared.",
                    call.callee.lexeme
                ),
                call.callee.span,
            ));
            return;
        };

        if arity != call.args.len() {
            self.handler.emit(Diagnostic::semantic_error(
                format!(
                    "Function call identifier '{}' does not use the correct number of arguments.",
                    call.callee.lexeme
                ),
                call.callee.span,
            ));
        }
    }

    /// Redeclaration check across all three binding tables at the current
    /// lexical level.
    fn declared_at_current_level(&self, name: &str) -> bool {
        self.env.contains_in_top(name)
            || self.call_table.contains_in_top(name)
            || self.type_table.contains_in_top(name)
    }
}
