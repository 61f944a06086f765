//! Type checking.
//!
//! A bottom-up walk computing a [`BirdType`] for every expression. The
//! operator result tables encode which operand pairs are well-formed; the
//! numeric mixing rule is deliberately asymmetric, `(int, float)` giving
//! `int` while `(float, int)` gives `float`, and both execution engines
//! follow it.

use birdc_lex::TokenKind;
use birdc_par::*;
use birdc_util::{Diagnostic, Handler};

use crate::scope::Environment;
use crate::types::{BirdType, FnSig};

/// Result type of a binary operation, or `None` for an ill-formed pair.
pub(crate) fn binary_result(
    op: TokenKind,
    left: BirdType,
    right: BirdType,
) -> Option<BirdType> {
    use BirdType::*;

    // the asymmetric mixing rule shared by the arithmetic operators
    let numeric = |l: BirdType, r: BirdType| match (l, r) {
        (Int, Int) => Some(Int),
        (Float, Float) => Some(Float),
        (Int, Float) => Some(Int),
        (Float, Int) => Some(Float),
        _ => None,
    };

    match op {
        TokenKind::Plus => match (left, right) {
            (Str, Str) => Some(Str),
            _ => numeric(left, right),
        },
        TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            numeric(left, right)
        },
        TokenKind::EqualEqual | TokenKind::BangEqual => match (left, right) {
            (Int, Int) | (Float, Float) | (Int, Float) | (Float, Int) => Some(Bool),
            (Str, Str) | (Bool, Bool) => Some(Bool),
            _ => None,
        },
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
            numeric(left, right).map(|_| Bool)
        },
        _ => None,
    }
}

/// Maps a compound assignment operator to its underlying binary operator.
pub(crate) fn compound_to_binary(op: TokenKind) -> Option<TokenKind> {
    match op {
        TokenKind::PlusEqual => Some(TokenKind::Plus),
        TokenKind::MinusEqual => Some(TokenKind::Minus),
        TokenKind::StarEqual => Some(TokenKind::Star),
        TokenKind::SlashEqual => Some(TokenKind::Slash),
        TokenKind::PercentEqual => Some(TokenKind::Percent),
        _ => None,
    }
}

/// Walks the AST computing and checking types.
///
/// The `Error` sentinel flows through expressions that already produced a
/// diagnostic; checks involving it stay silent.
pub struct TypeChecker<'a> {
    env: Environment<BirdType>,
    call_table: Environment<FnSig>,
    /// Alias name to its eagerly resolved literal type.
    type_table: Environment<BirdType>,
    /// Declared return type of the enclosing function, if any.
    return_type: Option<BirdType>,
    handler: &'a Handler,
}

impl<'a> TypeChecker<'a> {
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            env: Environment::new(),
            call_table: Environment::new(),
            type_table: Environment::new(),
            return_type: None,
            handler,
        }
    }

    /// Type-checks a whole program.
    pub fn check(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr_stmt) => {
                self.check_expr(&expr_stmt.expr);
            },
            Stmt::Print(print) => self.visit_print(print),
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Decl(decl) => {
                self.visit_decl(&decl.identifier, decl.ty.as_ref(), &decl.value)
            },
            Stmt::Const(decl) => {
                self.visit_decl(&decl.identifier, decl.ty.as_ref(), &decl.value)
            },
            Stmt::TypeAlias(alias) => self.visit_type_alias(alias),
            Stmt::If(if_stmt) => self.visit_if(if_stmt),
            Stmt::While(while_stmt) => self.visit_while(while_stmt),
            Stmt::For(for_stmt) => self.visit_for(for_stmt),
            Stmt::Func(func) => self.visit_func(func),
            Stmt::Return(ret) => self.visit_return(ret),
            Stmt::Break(_) | Stmt::Continue(_) => {},
        }
    }

    fn visit_block(&mut self, block: &Block) {
        self.env.push_frame();
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
        self.env.pop_frame();
    }

    fn visit_print(&mut self, print: &PrintStmt) {
        for arg in &print.args {
            let ty = self.check_expr(arg);
            if ty == BirdType::Void {
                self.handler.emit(Diagnostic::type_error(
                    "cannot print void type",
                    arg.span(),
                ));
            }
        }
    }

    fn visit_decl(
        &mut self,
        identifier: &birdc_lex::Token,
        ty: Option<&TypeRef>,
        value: &Expr,
    ) {
        let value_ty = self.check_expr(value);

        if value_ty == BirdType::Error {
            self.env.declare(identifier.lexeme.clone(), BirdType::Error);
            return;
        }

        if value_ty == BirdType::Void {
            self.handler.emit(Diagnostic::type_error(
                "cannot declare void type",
                identifier.span,
            ));
            self.env.declare(identifier.lexeme.clone(), BirdType::Error);
            return;
        }

        let Some(type_ref) = ty else {
            self.env.declare(identifier.lexeme.clone(), value_ty);
            return;
        };

        let declared = self.resolve_type_ref(type_ref);
        match declared {
            BirdType::Error => {
                self.env.declare(identifier.lexeme.clone(), BirdType::Error);
            },
            BirdType::Void => {
                self.handler.emit(Diagnostic::type_error(
                    "cannot declare void type",
                    type_ref.token.span,
                ));
                self.env.declare(identifier.lexeme.clone(), BirdType::Error);
            },
            _ if declared == value_ty => {
                self.env.declare(identifier.lexeme.clone(), declared);
            },
            // an int/float disagreement is legal: the engines insert the
            // conversion and the binding takes the declared type
            _ if declared.is_numeric() && value_ty.is_numeric() => {
                self.env.declare(identifier.lexeme.clone(), declared);
            },
            _ => {
                self.handler.emit(Diagnostic::type_mismatch(
                    "in declaration",
                    type_ref.token.span,
                ));
                self.env.declare(identifier.lexeme.clone(), BirdType::Error);
            },
        }
    }

    fn visit_type_alias(&mut self, alias: &TypeStmt) {
        let resolved = self.resolve_type_ref(&alias.ty);
        self.type_table
            .declare(alias.identifier.lexeme.clone(), resolved);
    }

    fn visit_if(&mut self, if_stmt: &IfStmt) {
        self.check_condition(&if_stmt.condition, "expected bool in if statement condition");
        self.visit_stmt(&if_stmt.then_branch);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.visit_stmt(else_branch);
        }
    }

    fn visit_while(&mut self, while_stmt: &WhileStmt) {
        self.check_condition(
            &while_stmt.condition,
            "expected bool in while statement condition",
        );
        self.visit_stmt(&while_stmt.body);
    }

    fn visit_for(&mut self, for_stmt: &ForStmt) {
        self.env.push_frame();

        if let Some(initializer) = &for_stmt.initializer {
            self.visit_stmt(initializer);
        }
        if let Some(condition) = &for_stmt.condition {
            self.check_condition(condition, "expected bool in for statement condition");
        }
        self.visit_stmt(&for_stmt.body);
        if let Some(increment) = &for_stmt.increment {
            self.check_expr(increment);
        }

        self.env.pop_frame();
    }

    fn check_condition(&mut self, condition: &Expr, message: &str) {
        let ty = self.check_expr(condition);
        if ty != BirdType::Bool && ty != BirdType::Error {
            self.handler
                .emit(Diagnostic::type_error(message, condition.span()));
        }
    }

    fn visit_func(&mut self, func: &FuncStmt) {
        let params: Vec<BirdType> = func
            .params
            .iter()
            .map(|param| {
                let ty = self.resolve_type_ref(&param.ty);
                if ty == BirdType::Void {
                    self.handler.emit(Diagnostic::type_error(
                        "cannot declare void type",
                        param.ty.token.span,
                    ));
                    return BirdType::Error;
                }
                ty
            })
            .collect();

        let ret = match &func.return_type {
            Some(type_ref) => self.resolve_type_ref(type_ref),
            None => BirdType::Void,
        };

        // Signature goes in first so recursive calls check.
        self.call_table.declare(
            func.identifier.lexeme.clone(),
            FnSig::new(params.clone(), ret),
        );

        let previous_return_type = self.return_type.replace(ret);
        self.env.push_frame();

        for (param, ty) in func.params.iter().zip(params) {
            self.env.declare(param.name.lexeme.clone(), ty);
        }

        for stmt in &func.body.stmts {
            self.visit_stmt(stmt);
        }

        self.env.pop_frame();
        self.return_type = previous_return_type;
    }

    fn visit_return(&mut self, ret: &ReturnStmt) {
        // a return outside any function was already rejected
        let Some(expected) = self.return_type else {
            return;
        };

        match &ret.expr {
            Some(expr) => {
                let ty = self.check_expr(expr);
                if ty != expected && ty != BirdType::Error && expected != BirdType::Error {
                    self.handler.emit(Diagnostic::type_mismatch(
                        "in return statement",
                        ret.keyword.span,
                    ));
                }
            },
            None => {
                if expected != BirdType::Void {
                    self.handler.emit(Diagnostic::type_error(
                        "expected return value in non-void function",
                        ret.keyword.span,
                    ));
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Computes the type of an expression bottom-up.
    pub fn check_expr(&mut self, expr: &Expr) -> BirdType {
        match expr {
            Expr::Primary(primary) => self.check_primary(primary),
            Expr::Unary(unary) => self.check_unary(unary),
            Expr::Binary(binary) => self.check_binary(binary),
            Expr::Ternary(ternary) => self.check_ternary(ternary),
            Expr::Assign(assign) => self.check_assign(assign),
            Expr::Call(call) => self.check_call(call),
        }
    }

    fn check_primary(&mut self, primary: &PrimaryExpr) -> BirdType {
        match primary.value.kind {
            TokenKind::IntLiteral => BirdType::Int,
            TokenKind::FloatLiteral => BirdType::Float,
            TokenKind::BoolLiteral => BirdType::Bool,
            TokenKind::StrLiteral => BirdType::Str,
            TokenKind::Identifier => {
                // an undeclared name was already reported by the analyzer
                self.env
                    .get(&primary.value.lexeme)
                    .copied()
                    .unwrap_or(BirdType::Error)
            },
            _ => BirdType::Error,
        }
    }

    fn check_unary(&mut self, unary: &UnaryExpr) -> BirdType {
        match self.check_expr(&unary.expr) {
            BirdType::Int => BirdType::Int,
            BirdType::Float => BirdType::Float,
            BirdType::Error => BirdType::Error,
            _ => {
                self.handler.emit(Diagnostic::type_error(
                    "expected int or float in unary operation",
                    unary.op.span,
                ));
                BirdType::Error
            },
        }
    }

    fn check_binary(&mut self, binary: &BinaryExpr) -> BirdType {
        let left = self.check_expr(&binary.left);
        let right = self.check_expr(&binary.right);

        if left == BirdType::Error || right == BirdType::Error {
            return BirdType::Error;
        }

        match binary_result(binary.op.kind, left, right) {
            Some(result) => result,
            None => {
                self.handler.emit(Diagnostic::type_mismatch(
                    "in binary operation",
                    binary.op.span,
                ));
                BirdType::Error
            },
        }
    }

    fn check_ternary(&mut self, ternary: &TernaryExpr) -> BirdType {
        let condition = self.check_expr(&ternary.condition);
        let true_ty = self.check_expr(&ternary.true_expr);
        let false_ty = self.check_expr(&ternary.false_expr);

        if condition != BirdType::Bool && condition != BirdType::Error {
            self.handler.emit(Diagnostic::type_error(
                "expected bool in ternary condition",
                ternary.condition.span(),
            ));
            return BirdType::Error;
        }

        if true_ty == BirdType::Error || false_ty == BirdType::Error {
            return BirdType::Error;
        }

        if true_ty != false_ty {
            self.handler.emit(Diagnostic::type_mismatch(
                "in ternary operation",
                ternary.true_expr.span(),
            ));
            return BirdType::Error;
        }

        true_ty
    }

    fn check_assign(&mut self, assign: &AssignExpr) -> BirdType {
        let value_ty = self.check_expr(&assign.value);

        // undeclared targets were reported by the analyzer
        let Some(&previous) = self.env.get(&assign.identifier.lexeme) else {
            return BirdType::Error;
        };
        if previous == BirdType::Error || value_ty == BirdType::Error {
            return BirdType::Error;
        }

        if assign.op.kind == TokenKind::Equal {
            if previous != value_ty
                && !(previous.is_numeric() && value_ty.is_numeric())
            {
                self.handler
                    .emit(Diagnostic::type_mismatch("in assignment", assign.op.span));
                return BirdType::Error;
            }
            return previous;
        }

        let Some(binary_op) = compound_to_binary(assign.op.kind) else {
            return BirdType::Error;
        };
        match binary_result(binary_op, previous, value_ty) {
            Some(_) => previous,
            None => {
                self.handler
                    .emit(Diagnostic::type_mismatch("in assignment", assign.op.span));
                BirdType::Error
            },
        }
    }

    fn check_call(&mut self, call: &CallExpr) -> BirdType {
        let arg_types: Vec<BirdType> =
            call.args.iter().map(|arg| self.check_expr(arg)).collect();

        // an undeclared callee was reported by the analyzer
        let Some(sig) = self.call_table.get(&call.callee.lexeme).cloned() else {
            return BirdType::Error;
        };

        for (arg_ty, param_ty) in arg_types.iter().zip(&sig.params) {
            if arg_ty != param_ty
                && *arg_ty != BirdType::Error
                && *param_ty != BirdType::Error
            {
                self.handler.emit(Diagnostic::type_mismatch(
                    "in function call",
                    call.callee.span,
                ));
            }
        }

        sig.ret
    }

    /// Canonicalises a type reference: literals map directly, identifiers
    /// resolve through the alias table.
    fn resolve_type_ref(&mut self, type_ref: &TypeRef) -> BirdType {
        if type_ref.is_literal {
            return BirdType::from_literal(&type_ref.token.lexeme).unwrap_or(BirdType::Error);
        }

        match self.type_table.get(&type_ref.token.lexeme) {
            Some(&resolved) => resolved,
            None => {
                self.handler
                    .emit(Diagnostic::type_error("unknown type", type_ref.token.span));
                BirdType::Error
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdc_lex::Lexer;
    use birdc_par::Parser;

    fn check(source: &str) -> Handler {
        let tokens = Lexer::new(source).lex().expect("lex failed");
        let handler = Handler::new();
        let ast = Parser::new(tokens, &handler).parse();
        assert!(!handler.has_errors(), "parse errors: {:?}", handler.diagnostics());
        TypeChecker::new(&handler).check(&ast);
        handler
    }

    fn assert_clean(source: &str) {
        let handler = check(source);
        assert!(
            !handler.has_errors(),
            "unexpected type errors: {:?}",
            handler.diagnostics()
        );
    }

    fn first_message(handler: &Handler) -> String {
        handler.diagnostics()[0].message.clone()
    }

    mod operator_table {
        use super::super::binary_result;
        use crate::BirdType::*;
        use birdc_lex::TokenKind;

        #[test]
        fn test_arithmetic_pairs() {
            assert_eq!(binary_result(TokenKind::Plus, Int, Int), Some(Int));
            assert_eq!(binary_result(TokenKind::Star, Float, Float), Some(Float));
            assert_eq!(binary_result(TokenKind::Slash, Int, Int), Some(Int));
        }

        #[test]
        fn test_asymmetric_numeric_rule() {
            // (int, float) -> int but (float, int) -> float
            assert_eq!(binary_result(TokenKind::Plus, Int, Float), Some(Int));
            assert_eq!(binary_result(TokenKind::Plus, Float, Int), Some(Float));
            assert_eq!(binary_result(TokenKind::Minus, Int, Float), Some(Int));
            assert_eq!(binary_result(TokenKind::Percent, Float, Int), Some(Float));
        }

        #[test]
        fn test_string_concatenation_only_for_plus() {
            assert_eq!(binary_result(TokenKind::Plus, Str, Str), Some(Str));
            assert_eq!(binary_result(TokenKind::Minus, Str, Str), None);
            assert_eq!(binary_result(TokenKind::Percent, Str, Str), None);
        }

        #[test]
        fn test_equality_pairs() {
            assert_eq!(binary_result(TokenKind::EqualEqual, Bool, Bool), Some(Bool));
            assert_eq!(binary_result(TokenKind::BangEqual, Str, Str), Some(Bool));
            assert_eq!(binary_result(TokenKind::EqualEqual, Int, Float), Some(Bool));
            assert_eq!(binary_result(TokenKind::EqualEqual, Str, Int), None);
            assert_eq!(binary_result(TokenKind::EqualEqual, Bool, Int), None);
        }

        #[test]
        fn test_comparison_pairs() {
            assert_eq!(binary_result(TokenKind::Less, Int, Int), Some(Bool));
            assert_eq!(binary_result(TokenKind::GreaterEqual, Float, Int), Some(Bool));
            assert_eq!(binary_result(TokenKind::Less, Str, Str), None);
            assert_eq!(binary_result(TokenKind::Greater, Bool, Bool), None);
        }
    }

    #[test]
    fn test_literal_types_flow() {
        assert_clean("var i = 1; var f = 2.5; var s = \"x\"; var b = true;");
    }

    #[test]
    fn test_arithmetic_accepted() {
        assert_clean("var x = (10 + 1) * 3 / -3 - -3;");
    }

    #[test]
    fn test_string_plus_accepted() {
        assert_clean("var s = \"a\" + \"b\";");
    }

    #[test]
    fn test_string_minus_rejected() {
        let handler = check("var s = \"a\" - \"b\";");
        assert_eq!(first_message(&handler), "type mismatch: in binary operation");
    }

    #[test]
    fn test_bool_arithmetic_rejected() {
        let handler = check("var x = 1 + true;");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_error_does_not_cascade() {
        // one mismatch inside a larger expression: exactly one diagnostic
        let handler = check("var x = (1 + true) * 2 - 3;");
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_declared_type_matches() {
        assert_clean("var x: int = 4; var s: str = \"y\";");
    }

    #[test]
    fn test_numeric_conversion_in_declaration() {
        // int/float disagreement resolves by implicit conversion
        assert_clean("var x: int = 2.5; var y: float = 4;");
    }

    #[test]
    fn test_non_numeric_declaration_mismatch() {
        let handler = check("var x: int = \"no\";");
        assert_eq!(first_message(&handler), "type mismatch: in declaration");
    }

    #[test]
    fn test_void_declaration_rejected() {
        let handler = check("fn f() {} var x = f();");
        assert_eq!(
            first_message(&handler),
            "type error: cannot declare void type"
        );
    }

    #[test]
    fn test_assignment_types() {
        assert_clean("var x = 1; x = 2; x += 3; x %= 2;");
    }

    #[test]
    fn test_assignment_numeric_cross_allowed() {
        assert_clean("var x = 1; x = 2.5;");
    }

    #[test]
    fn test_assignment_mismatch() {
        let handler = check("var x = 1; x = \"no\";");
        assert_eq!(first_message(&handler), "type mismatch: in assignment");
    }

    #[test]
    fn test_compound_assignment_mismatch() {
        let handler = check("var s = \"a\"; s -= \"b\";");
        assert_eq!(first_message(&handler), "type mismatch: in assignment");
    }

    #[test]
    fn test_string_compound_plus_allowed() {
        assert_clean("var s = \"a\"; s += \"b\";");
    }

    #[test]
    fn test_unary_requires_numeric() {
        let handler = check("var x = -true;");
        assert_eq!(
            first_message(&handler),
            "type error: expected int or float in unary operation"
        );
    }

    #[test]
    fn test_if_condition_must_be_bool() {
        let handler = check("if 1 { print 2; }");
        assert_eq!(
            first_message(&handler),
            "type error: expected bool in if statement condition"
        );
    }

    #[test]
    fn test_while_condition_must_be_bool() {
        let handler = check("while 1 { break; }");
        assert_eq!(
            first_message(&handler),
            "type error: expected bool in while statement condition"
        );
    }

    #[test]
    fn test_for_condition_must_be_bool() {
        let handler = check("for var i = 0; i + 1; i += 1 do { print i; }");
        assert_eq!(
            first_message(&handler),
            "type error: expected bool in for statement condition"
        );
    }

    #[test]
    fn test_comparison_condition_accepted() {
        assert_clean("var x = 0; while x < 3 { x += 1; }");
    }

    #[test]
    fn test_ternary_condition_must_be_bool() {
        let handler = check("var x = 1 ? 2 : 3;");
        assert_eq!(
            first_message(&handler),
            "type error: expected bool in ternary condition"
        );
    }

    #[test]
    fn test_ternary_branches_must_agree() {
        let handler = check("var x = true ? 1 : \"no\";");
        assert_eq!(
            first_message(&handler),
            "type mismatch: in ternary operation"
        );
    }

    #[test]
    fn test_ternary_accepted() {
        assert_clean("var x = true ? 1 : 2; var y: int = x;");
    }

    #[test]
    fn test_function_return_checked() {
        let handler = check("fn f() -> int { return \"no\"; }");
        assert_eq!(
            first_message(&handler),
            "type mismatch: in return statement"
        );
    }

    #[test]
    fn test_bare_return_requires_void() {
        let handler = check("fn f() -> int { return; }");
        assert_eq!(
            first_message(&handler),
            "type error: expected return value in non-void function"
        );
    }

    #[test]
    fn test_void_function_bare_return() {
        assert_clean("fn f() { return; }");
    }

    #[test]
    fn test_call_types_flow_into_expressions() {
        assert_clean("fn add(a: int, b: int) -> int { return a + b; } var x: int = add(2, 3);");
    }

    #[test]
    fn test_call_argument_mismatch() {
        let handler = check("fn f(a: int) { } f(\"no\");");
        assert_eq!(
            first_message(&handler),
            "type mismatch: in function call"
        );
    }

    #[test]
    fn test_recursive_function_checks() {
        assert_clean("fn fib(n: int) -> int { return n < 2 ? n : fib(n - 1) + fib(n - 2); }");
    }

    #[test]
    fn test_type_alias_resolution() {
        assert_clean("type num = int; var y: num = 42;");
    }

    #[test]
    fn test_alias_of_alias() {
        assert_clean("type a = int; type b = a; var x: b = 1;");
    }

    #[test]
    fn test_alias_in_signature() {
        assert_clean("type num = int; fn id(x: num) -> num { return x; } print id(3);");
    }

    #[test]
    fn test_unknown_type_name() {
        let handler = check("var x: mystery = 1;");
        assert_eq!(first_message(&handler), "type error: unknown type");
    }

    #[test]
    fn test_alias_mismatch_still_checked() {
        let handler = check("type num = int; var x: num = \"no\";");
        assert_eq!(first_message(&handler), "type mismatch: in declaration");
    }

    #[test]
    fn test_print_void_rejected() {
        let handler = check("fn f() {} print f();");
        assert_eq!(first_message(&handler), "type error: cannot print void type");
    }
}
