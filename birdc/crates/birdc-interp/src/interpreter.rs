//! The evaluator.

use std::io::Write;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use birdc_lex::TokenKind;
use birdc_par::*;
use birdc_sem::{BirdType, Environment};
use birdc_util::Span;

use crate::error::RuntimeError;
use crate::value::{Value, ValueKind};

/// Step result of executing a statement.
///
/// `Break`, `Continue`, and `Return` travel up through enclosing blocks
/// until a loop or function frame consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Option<Value>),
}

/// A user function as the interpreter stores it: parameter names and a
/// shared handle on the body block.
#[derive(Debug, Clone)]
struct Callable {
    params: Vec<String>,
    body: Rc<Block>,
}

/// Tree-walking evaluator.
///
/// `print` output goes to the injected writer, so tests capture it and the
/// driver hands in stdout.
pub struct Interpreter<'a, W: Write> {
    env: Environment<Value>,
    call_table: FxHashMap<String, Callable>,
    type_table: Environment<BirdType>,
    out: &'a mut W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self {
            env: Environment::new(),
            call_table: FxHashMap::default(),
            type_table: Environment::new(),
            out,
        }
    }

    /// Evaluates a whole program.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Expr(expr_stmt) => {
                self.eval_opt(&expr_stmt.expr)?;
                Ok(ControlFlow::Normal)
            },
            Stmt::Print(print) => self.exec_print(print),
            Stmt::Block(block) => self.exec_block(block),
            Stmt::Decl(decl) => {
                self.exec_decl(&decl.identifier, decl.ty.as_ref(), &decl.value, true)
            },
            Stmt::Const(decl) => {
                self.exec_decl(&decl.identifier, decl.ty.as_ref(), &decl.value, false)
            },
            Stmt::TypeAlias(alias) => {
                if let Some(resolved) = self.resolve_type_ref(&alias.ty) {
                    self.type_table
                        .declare(alias.identifier.lexeme.clone(), resolved);
                }
                Ok(ControlFlow::Normal)
            },
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::Func(func) => {
                let callable = Callable {
                    params: func.params.iter().map(|p| p.name.lexeme.clone()).collect(),
                    body: Rc::clone(&func.body),
                };
                self.call_table.insert(func.identifier.lexeme.clone(), callable);
                Ok(ControlFlow::Normal)
            },
            Stmt::Return(ret) => {
                let value = match &ret.expr {
                    Some(expr) => Some(self.eval(expr)?),
                    None => None,
                };
                Ok(ControlFlow::Return(value))
            },
            Stmt::Break(_) => Ok(ControlFlow::Break),
            Stmt::Continue(_) => Ok(ControlFlow::Continue),
        }
    }

    fn exec_print(&mut self, print: &PrintStmt) -> Result<ControlFlow, RuntimeError> {
        for arg in &print.args {
            let value = self.eval(arg)?;
            write!(self.out, "{}", value).map_err(|e| RuntimeError::Io(e.to_string()))?;
        }
        writeln!(self.out).map_err(|e| RuntimeError::Io(e.to_string()))?;
        Ok(ControlFlow::Normal)
    }

    fn exec_block(&mut self, block: &Block) -> Result<ControlFlow, RuntimeError> {
        self.env.push_frame();
        let result = self.exec_stmts(&block.stmts);
        self.env.pop_frame();
        result
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in stmts {
            let flow = self.exec_stmt(stmt)?;
            if flow != ControlFlow::Normal {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn exec_decl(
        &mut self,
        identifier: &birdc_lex::Token,
        ty: Option<&TypeRef>,
        value: &Expr,
        mutable: bool,
    ) -> Result<ControlFlow, RuntimeError> {
        let mut result = self.eval(value)?;

        // a declared numeric type converts the initializer
        if let Some(declared) = ty.and_then(|tr| self.resolve_type_ref(tr)) {
            result = convert_numeric(result, declared);
        }

        self.env
            .declare(identifier.lexeme.clone(), result.with_mutability(mutable));
        Ok(ControlFlow::Normal)
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<ControlFlow, RuntimeError> {
        if self.eval_condition(&if_stmt.condition)? {
            self.exec_stmt(&if_stmt.then_branch)
        } else if let Some(else_branch) = &if_stmt.else_branch {
            self.exec_stmt(else_branch)
        } else {
            Ok(ControlFlow::Normal)
        }
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt) -> Result<ControlFlow, RuntimeError> {
        while self.eval_condition(&while_stmt.condition)? {
            match self.exec_stmt(&while_stmt.body)? {
                ControlFlow::Break => break,
                ControlFlow::Normal | ControlFlow::Continue => {},
                ret @ ControlFlow::Return(_) => return Ok(ret),
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn exec_for(&mut self, for_stmt: &ForStmt) -> Result<ControlFlow, RuntimeError> {
        self.env.push_frame();
        let result = self.for_loop(for_stmt);
        self.env.pop_frame();
        result
    }

    fn for_loop(&mut self, for_stmt: &ForStmt) -> Result<ControlFlow, RuntimeError> {
        if let Some(initializer) = &for_stmt.initializer {
            self.exec_stmt(initializer)?;
        }

        loop {
            if let Some(condition) = &for_stmt.condition {
                if !self.eval_condition(condition)? {
                    break;
                }
            }

            match self.exec_stmt(&for_stmt.body)? {
                ControlFlow::Break => break,
                // continue still runs the step expression below
                ControlFlow::Normal | ControlFlow::Continue => {},
                ret @ ControlFlow::Return(_) => return Ok(ret),
            }

            if let Some(increment) = &for_stmt.increment {
                self.eval_opt(increment)?;
            }
        }

        Ok(ControlFlow::Normal)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Evaluates an expression that must produce a value.
    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        self.eval_opt(expr)?.ok_or(RuntimeError::VoidInExpression)
    }

    /// Evaluates an expression; only a call of a void function produces
    /// `None`.
    fn eval_opt(&mut self, expr: &Expr) -> Result<Option<Value>, RuntimeError> {
        match expr {
            Expr::Primary(primary) => self.eval_primary(primary).map(Some),
            Expr::Unary(unary) => self.eval_unary(unary).map(Some),
            Expr::Binary(binary) => self.eval_binary(binary).map(Some),
            Expr::Ternary(ternary) => self.eval_ternary(ternary).map(Some),
            Expr::Assign(assign) => self.eval_assign(assign).map(Some),
            Expr::Call(call) => self.eval_call(call),
        }
    }

    fn eval_primary(&mut self, primary: &PrimaryExpr) -> Result<Value, RuntimeError> {
        let token = &primary.value;
        match token.kind {
            TokenKind::IntLiteral => {
                let value = token.lexeme.parse::<i32>().map_err(|_| {
                    RuntimeError::MalformedNumber {
                        text: token.lexeme.clone(),
                    }
                })?;
                Ok(Value::int(value))
            },
            TokenKind::FloatLiteral => {
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    RuntimeError::MalformedNumber {
                        text: token.lexeme.clone(),
                    }
                })?;
                Ok(Value::float(value))
            },
            TokenKind::BoolLiteral => Ok(Value::bool(token.lexeme == "true")),
            TokenKind::StrLiteral => Ok(Value::str(token.lexeme.clone())),
            TokenKind::Identifier => self
                .env
                .get(&token.lexeme)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedIdentifier {
                    name: token.lexeme.clone(),
                }),
            _ => Err(RuntimeError::MalformedNumber {
                text: token.lexeme.clone(),
            }),
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value, RuntimeError> {
        let value = self.eval(&unary.expr)?;
        match value.data {
            ValueKind::Int(i) => Ok(Value::int(i.wrapping_neg())),
            ValueKind::Float(f) => Ok(Value::float(-f)),
            _ => Err(RuntimeError::InvalidOperands {
                op: unary.op.lexeme.clone(),
                line: unary.op.span.line,
                column: unary.op.span.column,
            }),
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.eval(&binary.left)?;
        let right = self.eval(&binary.right)?;
        self.apply_binary(binary.op.kind, binary.op.span, left, right)
    }

    fn eval_ternary(&mut self, ternary: &TernaryExpr) -> Result<Value, RuntimeError> {
        if self.eval_condition(&ternary.condition)? {
            self.eval(&ternary.true_expr)
        } else {
            self.eval(&ternary.false_expr)
        }
    }

    fn eval_assign(&mut self, assign: &AssignExpr) -> Result<Value, RuntimeError> {
        let name = &assign.identifier.lexeme;
        let previous =
            self.env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedIdentifier {
                    name: name.clone(),
                })?;

        if !previous.mutable {
            return Err(RuntimeError::ImmutableAssignment { name: name.clone() });
        }

        let value = self.eval(&assign.value)?;

        let new_value = if assign.op.kind == TokenKind::Equal {
            // the binding keeps its numeric type across assignment
            match previous.data {
                ValueKind::Int(_) | ValueKind::Float(_) if value.is_numeric() => {
                    convert_numeric(value, tag_of(&previous))
                },
                _ => value,
            }
        } else {
            let op = compound_op(assign.op.kind);
            self.apply_binary(op, assign.op.span, previous, value)?
        };

        let new_value = new_value.with_mutability(true);
        self.env.set(name, new_value.clone());
        Ok(new_value)
    }

    fn eval_call(&mut self, call: &CallExpr) -> Result<Option<Value>, RuntimeError> {
        let callable = self
            .call_table
            .get(&call.callee.lexeme)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: call.callee.lexeme.clone(),
            })?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval(arg)?);
        }

        self.env.push_frame();
        for (param, value) in callable.params.iter().zip(args) {
            self.env.declare(param.clone(), value.with_mutability(true));
        }

        let flow = self.exec_stmts(&callable.body.stmts);
        self.env.pop_frame();

        match flow? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal => Ok(None),
            // a loop signal crossing a call boundary breaks the sentinel
            // invariant; refuse rather than coerce it to a void return
            ControlFlow::Break | ControlFlow::Continue => {
                Err(RuntimeError::LoopJumpEscapedFunction {
                    name: call.callee.lexeme.clone(),
                })
            },
        }
    }

    fn eval_condition(&mut self, expr: &Expr) -> Result<bool, RuntimeError> {
        let value = self.eval(expr)?;
        value.as_bool().ok_or_else(|| {
            let span = expr.span();
            RuntimeError::InvalidOperands {
                op: "condition".into(),
                line: span.line,
                column: span.column,
            }
        })
    }

    /// Applies a binary operator to two evaluated operands.
    ///
    /// Mixed numeric operands convert the right side to the left side's
    /// type before the operation, so the result takes the left operand's
    /// tag.
    fn apply_binary(
        &mut self,
        op: TokenKind,
        span: Span,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        use TokenKind::*;

        match op {
            Plus => {
                if let (ValueKind::Str(l), ValueKind::Str(r)) = (&left.data, &right.data) {
                    return Ok(Value::str(format!("{}{}", l, r)));
                }
                self.numeric_arith(op, span, left, right)
            },
            Minus | Star | Slash | Percent => self.numeric_arith(op, span, left, right),
            Less | LessEqual | Greater | GreaterEqual => {
                let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
                    return Err(self.invalid_operands(op, span));
                };
                let result = match op {
                    Less => l < r,
                    LessEqual => l <= r,
                    Greater => l > r,
                    _ => l >= r,
                };
                Ok(Value::bool(result))
            },
            EqualEqual | BangEqual => {
                let equal = match (&left.data, &right.data) {
                    (ValueKind::Str(l), ValueKind::Str(r)) => l == r,
                    (ValueKind::Bool(l), ValueKind::Bool(r)) => l == r,
                    _ => match (left.as_f64(), right.as_f64()) {
                        (Some(l), Some(r)) => l == r,
                        _ => return Err(self.invalid_operands(op, span)),
                    },
                };
                Ok(Value::bool(if op == EqualEqual { equal } else { !equal }))
            },
            _ => Err(self.invalid_operands(op, span)),
        }
    }

    fn numeric_arith(
        &mut self,
        op: TokenKind,
        span: Span,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        if !left.is_numeric() || !right.is_numeric() {
            return Err(self.invalid_operands(op, span));
        }

        match left.data {
            ValueKind::Int(l) => {
                let r = match right.data {
                    ValueKind::Int(r) => r,
                    ValueKind::Float(r) => r as i32,
                    _ => unreachable!(),
                };
                let result = match op {
                    TokenKind::Plus => l.wrapping_add(r),
                    TokenKind::Minus => l.wrapping_sub(r),
                    TokenKind::Star => l.wrapping_mul(r),
                    TokenKind::Slash => {
                        if r == 0 {
                            return Err(RuntimeError::DivisionByZero {
                                line: span.line,
                                column: span.column,
                            });
                        }
                        l.wrapping_div(r)
                    },
                    _ => {
                        if r == 0 {
                            return Err(RuntimeError::DivisionByZero {
                                line: span.line,
                                column: span.column,
                            });
                        }
                        l.wrapping_rem(r)
                    },
                };
                Ok(Value::int(result))
            },
            ValueKind::Float(l) => {
                let r = match right.data {
                    ValueKind::Float(r) => r,
                    ValueKind::Int(r) => f64::from(r),
                    _ => unreachable!(),
                };
                let result = match op {
                    TokenKind::Plus => l + r,
                    TokenKind::Minus => l - r,
                    TokenKind::Star => l * r,
                    TokenKind::Slash => l / r,
                    _ => l % r,
                };
                Ok(Value::float(result))
            },
            _ => Err(self.invalid_operands(op, span)),
        }
    }

    fn invalid_operands(&self, op: TokenKind, span: Span) -> RuntimeError {
        RuntimeError::InvalidOperands {
            op: format!("{:?}", op),
            line: span.line,
            column: span.column,
        }
    }

    fn resolve_type_ref(&self, type_ref: &TypeRef) -> Option<BirdType> {
        if type_ref.is_literal {
            BirdType::from_literal(&type_ref.token.lexeme)
        } else {
            self.type_table.get(&type_ref.token.lexeme).copied()
        }
    }
}

/// Converts a numeric value to the target numeric type; anything else
/// passes through unchanged.
fn convert_numeric(value: Value, target: BirdType) -> Value {
    match (target, &value.data) {
        (BirdType::Int, ValueKind::Float(f)) => Value::int(*f as i32),
        (BirdType::Float, ValueKind::Int(i)) => Value::float(f64::from(*i)),
        _ => value,
    }
}

fn tag_of(value: &Value) -> BirdType {
    match value.data {
        ValueKind::Int(_) => BirdType::Int,
        ValueKind::Float(_) => BirdType::Float,
        ValueKind::Str(_) => BirdType::Str,
        ValueKind::Bool(_) => BirdType::Bool,
    }
}

fn compound_op(kind: TokenKind) -> TokenKind {
    match kind {
        TokenKind::PlusEqual => TokenKind::Plus,
        TokenKind::MinusEqual => TokenKind::Minus,
        TokenKind::StarEqual => TokenKind::Star,
        TokenKind::SlashEqual => TokenKind::Slash,
        _ => TokenKind::Percent,
    }
}
