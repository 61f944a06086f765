//! Parser tests: AST shapes, precedence, and error recovery.

use birdc_lex::{Lexer, TokenKind};
use birdc_util::Handler;

use crate::*;

fn parse_with(source: &str) -> (Ast, Handler) {
    let tokens = Lexer::new(source).lex().expect("lex failed");
    let handler = Handler::new();
    let ast = Parser::new(tokens, &handler).parse();
    (ast, handler)
}

fn parse_ok(source: &str) -> Ast {
    let (ast, handler) = parse_with(source);
    assert!(
        !handler.has_errors(),
        "unexpected parse errors: {:?}",
        handler.diagnostics()
    );
    ast
}

#[test]
fn test_var_decl_shape() {
    let ast = parse_ok("var x: int = 42;");
    assert_eq!(ast.len(), 1);
    match &ast[0] {
        Stmt::Decl(decl) => {
            assert_eq!(decl.identifier.lexeme, "x");
            let ty = decl.ty.as_ref().unwrap();
            assert!(ty.is_literal);
            assert_eq!(ty.token.lexeme, "int");
        },
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_const_decl_without_type() {
    let ast = parse_ok("const x = 1;");
    assert!(matches!(&ast[0], Stmt::Const(c) if c.ty.is_none()));
}

#[test]
fn test_alias_type_annotation() {
    let ast = parse_ok("var y: num = 3;");
    match &ast[0] {
        Stmt::Decl(decl) => {
            let ty = decl.ty.as_ref().unwrap();
            assert!(!ty.is_literal);
            assert_eq!(ty.token.lexeme, "num");
        },
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let ast = parse_ok("1 + 2 * 3;");
    let Stmt::Expr(stmt) = &ast[0] else { panic!() };
    let Expr::Binary(add) = &stmt.expr else { panic!() };
    assert_eq!(add.op.kind, TokenKind::Plus);
    assert!(matches!(&*add.right, Expr::Binary(mul) if mul.op.kind == TokenKind::Star));
}

#[test]
fn test_grouping_overrides_precedence() {
    let ast = parse_ok("(1 + 2) * 3;");
    let Stmt::Expr(stmt) = &ast[0] else { panic!() };
    let Expr::Binary(mul) = &stmt.expr else { panic!() };
    assert_eq!(mul.op.kind, TokenKind::Star);
    assert!(matches!(&*mul.left, Expr::Binary(add) if add.op.kind == TokenKind::Plus));
}

#[test]
fn test_unary_in_division() {
    let ast = parse_ok("var x: int = (10 + 1) * 3 / -3 - -3;");
    assert!(matches!(&ast[0], Stmt::Decl(_)));
}

#[test]
fn test_assignment_is_right_associative() {
    let ast = parse_ok("a = b = 1;");
    let Stmt::Expr(stmt) = &ast[0] else { panic!() };
    let Expr::Assign(outer) = &stmt.expr else { panic!() };
    assert_eq!(outer.identifier.lexeme, "a");
    assert!(matches!(&*outer.value, Expr::Assign(inner) if inner.identifier.lexeme == "b"));
}

#[test]
fn test_compound_assignment() {
    let ast = parse_ok("x += 2;");
    let Stmt::Expr(stmt) = &ast[0] else { panic!() };
    assert!(matches!(&stmt.expr, Expr::Assign(a) if a.op.kind == TokenKind::PlusEqual));
}

#[test]
fn test_assignment_to_non_identifier_is_an_error() {
    let (ast, handler) = parse_with("1 = 2;");
    assert!(handler.has_errors());
    assert!(ast.is_empty());
}

#[test]
fn test_ternary_expression() {
    let ast = parse_ok("var x = true ? 1 : 2;");
    let Stmt::Decl(decl) = &ast[0] else { panic!() };
    assert!(matches!(&decl.value, Expr::Ternary(_)));
}

#[test]
fn test_nested_ternary() {
    let ast = parse_ok("var x = true ? false ? 1 : 2 : 3;");
    let Stmt::Decl(decl) = &ast[0] else { panic!() };
    let Expr::Ternary(outer) = &decl.value else { panic!() };
    assert!(matches!(&*outer.true_expr, Expr::Ternary(_)));
}

#[test]
fn test_call_with_arguments() {
    let ast = parse_ok("print add(2, 3);");
    let Stmt::Print(print) = &ast[0] else { panic!() };
    let Expr::Call(call) = &print.args[0] else { panic!() };
    assert_eq!(call.callee.lexeme, "add");
    assert_eq!(call.args.len(), 2);
}

#[test]
fn test_print_multiple_args() {
    let ast = parse_ok("print 1, 2, 3;");
    let Stmt::Print(print) = &ast[0] else { panic!() };
    assert_eq!(print.args.len(), 3);
}

#[test]
fn test_if_else_chain() {
    let ast = parse_ok("if x < 1 { print 1; } else if x < 2 { print 2; } else { print 3; }");
    let Stmt::If(if_stmt) = &ast[0] else { panic!() };
    assert!(matches!(
        if_stmt.else_branch.as_deref(),
        Some(Stmt::If(inner)) if inner.else_branch.is_some()
    ));
}

#[test]
fn test_while_with_block_body() {
    let ast = parse_ok("while x < 3 { x += 1; }");
    let Stmt::While(while_stmt) = &ast[0] else { panic!() };
    assert!(matches!(&*while_stmt.body, Stmt::Block(_)));
}

#[test]
fn test_for_without_parens() {
    let ast = parse_ok("for var i = 0; i < 10; i += 1 do { print i; }");
    let Stmt::For(for_stmt) = &ast[0] else { panic!() };
    assert!(for_stmt.initializer.is_some());
    assert!(for_stmt.condition.is_some());
    assert!(for_stmt.increment.is_some());
}

#[test]
fn test_for_with_parens() {
    let ast = parse_ok("for (var i = 0; i < 10; i += 1) do { print i; }");
    assert!(matches!(&ast[0], Stmt::For(_)));
}

#[test]
fn test_for_with_empty_clauses() {
    let ast = parse_ok("for ;; do { break; }");
    let Stmt::For(for_stmt) = &ast[0] else { panic!() };
    assert!(for_stmt.initializer.is_none());
    assert!(for_stmt.condition.is_none());
    assert!(for_stmt.increment.is_none());
}

#[test]
fn test_func_decl_shape() {
    let ast = parse_ok("fn add(a: int, b: int) -> int { return a + b; }");
    let Stmt::Func(func) = &ast[0] else { panic!() };
    assert_eq!(func.identifier.lexeme, "add");
    assert_eq!(func.params.len(), 2);
    assert_eq!(func.params[1].name.lexeme, "b");
    assert_eq!(func.return_type.as_ref().unwrap().token.lexeme, "int");
    assert_eq!(func.body.stmts.len(), 1);
}

#[test]
fn test_func_without_return_type() {
    let ast = parse_ok("fn greet() { print \"hi\"; }");
    let Stmt::Func(func) = &ast[0] else { panic!() };
    assert!(func.return_type.is_none());
    assert!(func.params.is_empty());
}

#[test]
fn test_bare_return() {
    let ast = parse_ok("fn f() { return; }");
    let Stmt::Func(func) = &ast[0] else { panic!() };
    assert!(matches!(&func.body.stmts[0], Stmt::Return(r) if r.expr.is_none()));
}

#[test]
fn test_type_stmt() {
    let ast = parse_ok("type num = int;");
    let Stmt::TypeAlias(alias) = &ast[0] else { panic!() };
    assert_eq!(alias.identifier.lexeme, "num");
    assert!(alias.ty.is_literal);
}

#[test]
fn test_recovery_drops_bad_statement_and_continues() {
    let (ast, handler) = parse_with("var = 1;\nprint 2;");
    assert!(handler.has_errors());
    assert_eq!(ast.len(), 1);
    assert!(matches!(&ast[0], Stmt::Print(_)));
}

#[test]
fn test_recovery_inside_block() {
    let (ast, handler) = parse_with("{ var = 1; print 2; }");
    assert!(handler.has_errors());
    let Stmt::Block(block) = &ast[0] else { panic!() };
    assert_eq!(block.stmts.len(), 1);
}

#[test]
fn test_missing_semicolon_reported() {
    let (_, handler) = parse_with("var x = 1");
    assert!(handler.has_errors());
    let rendered = handler.diagnostics()[0].render();
    assert!(rendered.contains("expected ;"), "got: {}", rendered);
}

#[test]
fn test_error_cap_stops_cascades() {
    let source = "? ".repeat(100);
    let tokens = birdc_lex::Lexer::new(&source).lex().unwrap();
    let handler = Handler::new();
    let mut parser = Parser::new(tokens, &handler).with_max_errors(5);
    let _ = parser.parse();
    assert!(handler.error_count() <= 5);
}
