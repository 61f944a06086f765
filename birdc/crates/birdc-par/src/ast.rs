//! AST node definitions.
//!
//! The tree is a pair of closed sums: [`Stmt`] and [`Expr`]. Nodes own
//! their children; the single exception is a function body, held as an
//! `Rc<Block>` because the call tables keep a second handle to it across
//! calls.

use std::rc::Rc;

use birdc_lex::Token;

/// AST root - a program is a list of statements.
pub type Ast = Vec<Stmt>;

/// Statement
#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(ExprStmt),
    Print(PrintStmt),
    Block(Block),
    Decl(DeclStmt),
    Const(ConstStmt),
    TypeAlias(TypeStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Func(FuncStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

/// Expression statement
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
}

/// Print statement with one or more arguments
#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub args: Vec<Expr>,
}

/// Braced statement list
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// `var` declaration
#[derive(Debug, Clone)]
pub struct DeclStmt {
    pub identifier: Token,
    pub ty: Option<TypeRef>,
    pub value: Expr,
}

/// `const` declaration
#[derive(Debug, Clone)]
pub struct ConstStmt {
    pub identifier: Token,
    pub ty: Option<TypeRef>,
    pub value: Expr,
}

/// `type` alias declaration
#[derive(Debug, Clone)]
pub struct TypeStmt {
    pub identifier: Token,
    pub ty: TypeRef,
}

/// If statement
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

/// While loop
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// For loop: `for init; cond; step do body`
///
/// The initializer is a full statement (it owns its semicolon); condition
/// and step are bare expressions.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub initializer: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub body: Box<Stmt>,
}

/// Function declaration
#[derive(Debug, Clone)]
pub struct FuncStmt {
    pub identifier: Token,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRef>,
    pub body: Rc<Block>,
}

/// Function parameter: `name: type`
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Token,
    pub ty: TypeRef,
}

/// Return statement
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub expr: Option<Expr>,
}

/// Break statement
#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub keyword: Token,
}

/// Continue statement
#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub keyword: Token,
}

/// A type reference in a declaration: either a type-literal (`int`,
/// `float`, `str`, `bool`, `void`) or an identifier naming an alias.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub token: Token,
    pub is_literal: bool,
}

/// Expression
#[derive(Debug, Clone)]
pub enum Expr {
    Primary(PrimaryExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Ternary(TernaryExpr),
    Assign(AssignExpr),
    Call(CallExpr),
}

impl Expr {
    /// A source anchor for diagnostics: the span of the expression's
    /// leading or operator token.
    pub fn span(&self) -> birdc_util::Span {
        match self {
            Expr::Primary(primary) => primary.value.span,
            Expr::Unary(unary) => unary.op.span,
            Expr::Binary(binary) => binary.op.span,
            Expr::Ternary(ternary) => ternary.condition.span(),
            Expr::Assign(assign) => assign.identifier.span,
            Expr::Call(call) => call.callee.span,
        }
    }

    /// True if this is an identifier primary (a valid assignment target).
    pub fn as_identifier(&self) -> Option<&Token> {
        match self {
            Expr::Primary(primary)
                if primary.value.kind == birdc_lex::TokenKind::Identifier =>
            {
                Some(&primary.value)
            },
            _ => None,
        }
    }
}

/// Literal or identifier
#[derive(Debug, Clone)]
pub struct PrimaryExpr {
    pub value: Token,
}

/// Prefix operation (only `-`)
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: Token,
    pub expr: Box<Expr>,
}

/// Infix operation
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: Token,
    pub right: Box<Expr>,
}

/// `cond ? then : else`
#[derive(Debug, Clone)]
pub struct TernaryExpr {
    pub condition: Box<Expr>,
    pub true_expr: Box<Expr>,
    pub false_expr: Box<Expr>,
}

/// Assignment to an identifier; `op` is one of `=`, `+=`, `-=`, `*=`,
/// `/=`, `%=`.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub identifier: Token,
    pub op: Token,
    pub value: Box<Expr>,
}

/// Call of a named function
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Token,
    pub args: Vec<Expr>,
}
