//! The lowering walk: AST to module.
//!
//! A post-order walk producing tagged instruction trees. Locals are
//! allocated per function in declaration order (parameters first), string
//! literals land in static segments at a rolling offset, and loops lower
//! to the `EXIT`/`LOOP`/`BODY` label scheme: `break` branches to `EXIT`,
//! `continue` to the end of `BODY`.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use birdc_lex::TokenKind;
use birdc_par::*;
use birdc_sem::{BirdType, Environment};

use crate::error::LowerError;
use crate::ir::{BinaryOp, Instr, UnaryOp, ValType, WasmTag};
use crate::module::{DataSegment, FuncType, Function, Import, WasmModule};

/// String segments start here; lower memory stays clear of the data the
/// host might probe.
const STRING_BASE_OFFSET: u32 = 1024;

const PAGE_SIZE: u32 = 65536;

const MAIN: &str = "main";
const LABEL_EXIT: &str = "EXIT";
const LABEL_LOOP: &str = "LOOP";
const LABEL_BODY: &str = "BODY";

/// A lowered expression with its language-level tag.
#[derive(Debug, Clone)]
struct TaggedExpr {
    instr: Instr,
    tag: WasmTag,
}

/// A local variable: slot index within the current function plus tag.
#[derive(Debug, Clone, Copy)]
struct TaggedSlot {
    index: u32,
    tag: WasmTag,
}

/// Lowers a checked AST to a [`WasmModule`].
pub struct CodeGen {
    /// Identifier to local slot, scoped like the other passes.
    environment: Environment<TaggedSlot>,
    /// Alias name to its resolved type.
    type_table: Environment<BirdType>,
    /// Ordered local types per function, parameters included.
    function_locals: IndexMap<String, Vec<ValType>>,
    /// Result tag per function, needed at call and return sites.
    function_returns: FxHashMap<String, WasmTag>,
    current_function: String,
    /// Loop depth within the current function body; a `br` to the loop
    /// labels is only emitted while this is non-zero.
    loop_nesting: u32,
    functions: Vec<Function>,
    segments: Vec<DataSegment>,
    current_offset: u32,
}

impl CodeGen {
    pub fn new() -> Self {
        let mut function_returns = FxHashMap::default();
        function_returns.insert(MAIN.to_string(), WasmTag::Void);

        let mut function_locals = IndexMap::new();
        function_locals.insert(MAIN.to_string(), Vec::new());

        Self {
            environment: Environment::new(),
            type_table: Environment::new(),
            function_locals,
            function_returns,
            current_function: MAIN.to_string(),
            loop_nesting: 0,
            functions: Vec::new(),
            segments: Vec::new(),
            current_offset: STRING_BASE_OFFSET,
        }
    }

    /// Lowers a whole program.
    ///
    /// Top-level statements form the exported `main`; every `fn` becomes
    /// its own exported function.
    pub fn generate(mut self, stmts: &[Stmt]) -> Result<WasmModule, LowerError> {
        let mut main_body = Vec::new();
        for stmt in stmts {
            if let Some(instr) = self.lower_stmt(stmt)? {
                main_body.push(instr);
            }
        }

        let main_locals = self
            .function_locals
            .get(MAIN)
            .cloned()
            .unwrap_or_default();
        self.functions.push(Function {
            name: MAIN.to_string(),
            params: Vec::new(),
            result: None,
            locals: main_locals,
            body: main_body,
            exported: true,
        });

        let max_pages = self.current_offset / PAGE_SIZE + 1;

        Ok(WasmModule {
            imports: std_imports(),
            functions: self.functions,
            segments: self.segments,
            max_pages,
        })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<Option<Instr>, LowerError> {
        match stmt {
            Stmt::Expr(expr_stmt) => {
                let lowered = self.lower_expr(&expr_stmt.expr)?;
                // a leftover value would corrupt the operand stack
                Ok(Some(if lowered.tag == WasmTag::Void {
                    lowered.instr
                } else {
                    Instr::Drop(Box::new(lowered.instr))
                }))
            },
            Stmt::Print(print) => self.lower_print(print),
            Stmt::Block(block) => self.lower_block(block),
            Stmt::Decl(decl) => {
                self.lower_declaration(&decl.identifier, decl.ty.as_ref(), &decl.value)
            },
            Stmt::Const(decl) => {
                self.lower_declaration(&decl.identifier, decl.ty.as_ref(), &decl.value)
            },
            Stmt::TypeAlias(alias) => {
                let resolved = self.resolve_type_ref(&alias.ty)?;
                self.type_table
                    .declare(alias.identifier.lexeme.clone(), resolved);
                Ok(None)
            },
            Stmt::If(if_stmt) => self.lower_if(if_stmt),
            Stmt::While(while_stmt) => self.lower_while(while_stmt),
            Stmt::For(for_stmt) => self.lower_for(for_stmt),
            Stmt::Func(func) => {
                self.lower_func(func)?;
                Ok(None)
            },
            Stmt::Return(ret) => self.lower_return(ret),
            Stmt::Break(_) => {
                if self.loop_nesting == 0 {
                    return Err(LowerError::JumpOutsideLoop);
                }
                Ok(Some(Instr::Br(LABEL_EXIT.to_string())))
            },
            Stmt::Continue(_) => {
                if self.loop_nesting == 0 {
                    return Err(LowerError::JumpOutsideLoop);
                }
                Ok(Some(Instr::Br(LABEL_BODY.to_string())))
            },
        }
    }

    fn lower_print(&mut self, print: &PrintStmt) -> Result<Option<Instr>, LowerError> {
        let mut calls = Vec::new();
        for arg in &print.args {
            let lowered = self.lower_expr(arg)?;
            let import = match lowered.tag {
                WasmTag::Int | WasmTag::Bool => "print_i32",
                WasmTag::Float => "print_f64",
                WasmTag::Ptr => "print_str",
                WasmTag::Void => return Err(LowerError::UnsupportedPrint),
            };
            calls.push(Instr::Call {
                func: import.to_string(),
                args: vec![lowered.instr],
            });
        }

        Ok(Some(if calls.len() == 1 {
            calls.remove(0)
        } else {
            Instr::Block {
                label: None,
                children: calls,
            }
        }))
    }

    fn lower_block(&mut self, block: &Block) -> Result<Option<Instr>, LowerError> {
        self.environment.push_frame();
        let mut children = Vec::new();
        for stmt in &block.stmts {
            match self.lower_stmt(stmt) {
                Ok(Some(instr)) => children.push(instr),
                Ok(None) => {},
                Err(e) => {
                    self.environment.pop_frame();
                    return Err(e);
                },
            }
        }
        self.environment.pop_frame();

        Ok(Some(Instr::Block {
            label: None,
            children,
        }))
    }

    fn lower_declaration(
        &mut self,
        identifier: &birdc_lex::Token,
        ty: Option<&TypeRef>,
        value: &Expr,
    ) -> Result<Option<Instr>, LowerError> {
        let lowered = self.lower_expr(value)?;
        let mut instr = lowered.instr;
        let mut tag = lowered.tag;

        if let Some(type_ref) = ty {
            let declared = tag_for(self.resolve_type_ref(type_ref)?);
            instr = convert_numeric(instr, tag, declared);
            tag = declared;
        }

        let val_type = tag.val_type().ok_or(LowerError::VoidValue)?;
        let index = self.allocate_local(val_type);
        self.environment
            .declare(identifier.lexeme.clone(), TaggedSlot { index, tag });

        Ok(Some(Instr::LocalSet(index, Box::new(instr))))
    }

    fn lower_if(&mut self, if_stmt: &IfStmt) -> Result<Option<Instr>, LowerError> {
        let condition = self.lower_expr(&if_stmt.condition)?;
        let then_branch = self
            .lower_stmt(&if_stmt.then_branch)?
            .unwrap_or_else(Instr::empty);
        let else_branch = match &if_stmt.else_branch {
            Some(stmt) => Some(Box::new(self.lower_stmt(stmt)?.unwrap_or_else(Instr::empty))),
            None => None,
        };

        Ok(Some(Instr::If {
            condition: Box::new(condition.instr),
            then_branch: Box::new(then_branch),
            else_branch,
        }))
    }

    /// `block EXIT { cond if { loop LOOP { block BODY { body } cond
    /// br_if LOOP } } }`
    ///
    /// The condition gates entry and re-entry; `br BODY` lands just before
    /// the re-entry check.
    fn lower_while(&mut self, while_stmt: &WhileStmt) -> Result<Option<Instr>, LowerError> {
        let condition = self.lower_expr(&while_stmt.condition)?.instr;
        self.loop_nesting += 1;
        let body = self.lower_stmt(&while_stmt.body);
        self.loop_nesting -= 1;
        let body = body?.unwrap_or_else(Instr::empty);

        let loop_body = Instr::Block {
            label: None,
            children: vec![
                Instr::Block {
                    label: Some(LABEL_BODY.to_string()),
                    children: vec![body],
                },
                Instr::BrIf(LABEL_LOOP.to_string(), Box::new(condition.clone())),
            ],
        };

        Ok(Some(Instr::Block {
            label: Some(LABEL_EXIT.to_string()),
            children: vec![Instr::If {
                condition: Box::new(condition),
                then_branch: Box::new(Instr::Loop {
                    label: LABEL_LOOP.to_string(),
                    body: Box::new(loop_body),
                }),
                else_branch: None,
            }],
        }))
    }

    fn lower_for(&mut self, for_stmt: &ForStmt) -> Result<Option<Instr>, LowerError> {
        self.environment.push_frame();
        let result = self.build_for(for_stmt);
        self.environment.pop_frame();
        result
    }

    /// Same shape as `while`, with the initializer ahead of the loop and
    /// the step between `BODY` and the re-entry check, so `continue`
    /// still runs the step.
    fn build_for(&mut self, for_stmt: &ForStmt) -> Result<Option<Instr>, LowerError> {
        let initializer = match &for_stmt.initializer {
            Some(stmt) => self.lower_stmt(stmt)?,
            None => None,
        };
        let condition = match &for_stmt.condition {
            Some(expr) => Some(self.lower_expr(expr)?.instr),
            None => None,
        };
        self.loop_nesting += 1;
        let body = self.lower_stmt(&for_stmt.body);
        self.loop_nesting -= 1;
        let body = body?.unwrap_or_else(Instr::empty);
        let step = match &for_stmt.increment {
            Some(expr) => {
                let lowered = self.lower_expr(expr)?;
                Some(if lowered.tag == WasmTag::Void {
                    lowered.instr
                } else {
                    Instr::Drop(Box::new(lowered.instr))
                })
            },
            None => None,
        };

        let mut loop_children = vec![Instr::Block {
            label: Some(LABEL_BODY.to_string()),
            children: vec![body],
        }];
        if let Some(step) = step {
            loop_children.push(step);
        }
        loop_children.push(match &condition {
            Some(cond) => Instr::BrIf(LABEL_LOOP.to_string(), Box::new(cond.clone())),
            None => Instr::Br(LABEL_LOOP.to_string()),
        });

        let looped = Instr::Loop {
            label: LABEL_LOOP.to_string(),
            body: Box::new(Instr::Block {
                label: None,
                children: loop_children,
            }),
        };

        let gated = match condition {
            Some(cond) => Instr::If {
                condition: Box::new(cond),
                then_branch: Box::new(looped),
                else_branch: None,
            },
            None => looped,
        };

        let mut children = Vec::new();
        if let Some(init) = initializer {
            children.push(init);
        }
        children.push(gated);

        Ok(Some(Instr::Block {
            label: Some(LABEL_EXIT.to_string()),
            children,
        }))
    }

    fn lower_func(&mut self, func: &FuncStmt) -> Result<(), LowerError> {
        let name = func.identifier.lexeme.clone();

        let ret_tag = match &func.return_type {
            Some(type_ref) => tag_for(self.resolve_type_ref(type_ref)?),
            None => WasmTag::Void,
        };
        // registered up front so recursive calls find their result type
        self.function_returns.insert(name.clone(), ret_tag);

        let mut param_types = Vec::new();
        let mut param_tags = Vec::new();
        for param in &func.params {
            let tag = tag_for(self.resolve_type_ref(&param.ty)?);
            param_types.push(tag.val_type().ok_or(LowerError::VoidValue)?);
            param_tags.push(tag);
        }
        self.function_locals.insert(name.clone(), param_types.clone());

        let previous_function = std::mem::replace(&mut self.current_function, name.clone());
        // a fresh jump context: the body's branches may only target loops
        // lowered within this function
        let previous_nesting = std::mem::replace(&mut self.loop_nesting, 0);
        self.environment.push_frame();
        for (index, (param, tag)) in func.params.iter().zip(param_tags).enumerate() {
            self.environment.declare(
                param.name.lexeme.clone(),
                TaggedSlot {
                    index: index as u32,
                    tag,
                },
            );
        }

        let mut body = Vec::new();
        let mut walked = Ok(());
        for stmt in &func.body.stmts {
            match self.lower_stmt(stmt) {
                Ok(Some(instr)) => body.push(instr),
                Ok(None) => {},
                Err(e) => {
                    walked = Err(e);
                    break;
                },
            }
        }
        self.environment.pop_frame();
        self.current_function = previous_function;
        self.loop_nesting = previous_nesting;
        walked?;

        let all_locals = self
            .function_locals
            .get(&name)
            .cloned()
            .unwrap_or_default();
        let extra_locals = all_locals[param_types.len()..].to_vec();

        self.functions.push(Function {
            name,
            params: param_types,
            result: ret_tag.val_type(),
            locals: extra_locals,
            body,
            exported: true,
        });

        Ok(())
    }

    fn lower_return(&mut self, ret: &ReturnStmt) -> Result<Option<Instr>, LowerError> {
        let ret_tag = self
            .function_returns
            .get(&self.current_function)
            .copied()
            .unwrap_or(WasmTag::Void);

        match &ret.expr {
            Some(expr) => {
                let lowered = self.lower_expr(expr)?;
                let converted = convert_numeric(lowered.instr, lowered.tag, ret_tag);
                Ok(Some(Instr::Return(Some(Box::new(converted)))))
            },
            None => Ok(Some(Instr::Return(None))),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn lower_expr(&mut self, expr: &Expr) -> Result<TaggedExpr, LowerError> {
        match expr {
            Expr::Primary(primary) => self.lower_primary(primary),
            Expr::Unary(unary) => self.lower_unary(unary),
            Expr::Binary(binary) => self.lower_binary(binary),
            Expr::Ternary(ternary) => self.lower_ternary(ternary),
            Expr::Assign(assign) => self.lower_assign(assign),
            Expr::Call(call) => self.lower_call(call),
        }
    }

    fn lower_primary(&mut self, primary: &PrimaryExpr) -> Result<TaggedExpr, LowerError> {
        let token = &primary.value;
        match token.kind {
            TokenKind::IntLiteral => {
                let value =
                    token
                        .lexeme
                        .parse::<i32>()
                        .map_err(|_| LowerError::MalformedNumber {
                            text: token.lexeme.clone(),
                        })?;
                Ok(TaggedExpr {
                    instr: Instr::I32Const(value),
                    tag: WasmTag::Int,
                })
            },
            TokenKind::FloatLiteral => {
                let value =
                    token
                        .lexeme
                        .parse::<f64>()
                        .map_err(|_| LowerError::MalformedNumber {
                            text: token.lexeme.clone(),
                        })?;
                Ok(TaggedExpr {
                    instr: Instr::F64Const(value),
                    tag: WasmTag::Float,
                })
            },
            TokenKind::BoolLiteral => Ok(TaggedExpr {
                instr: Instr::I32Const(i32::from(token.lexeme == "true")),
                tag: WasmTag::Bool,
            }),
            TokenKind::StrLiteral => {
                let offset = self.add_segment(&token.lexeme);
                Ok(TaggedExpr {
                    instr: Instr::I32Const(offset as i32),
                    tag: WasmTag::Ptr,
                })
            },
            TokenKind::Identifier => {
                let slot = self.environment.get(&token.lexeme).copied().ok_or_else(|| {
                    LowerError::UndefinedLocal {
                        name: token.lexeme.clone(),
                    }
                })?;
                Ok(TaggedExpr {
                    instr: Instr::LocalGet(slot.index),
                    tag: slot.tag,
                })
            },
            _ => Err(LowerError::MalformedNumber {
                text: token.lexeme.clone(),
            }),
        }
    }

    /// No integer negate instruction exists; integers lower to `0 - x`.
    fn lower_unary(&mut self, unary: &UnaryExpr) -> Result<TaggedExpr, LowerError> {
        let operand = self.lower_expr(&unary.expr)?;
        match operand.tag {
            WasmTag::Float => Ok(TaggedExpr {
                instr: Instr::Unary(UnaryOp::F64Neg, Box::new(operand.instr)),
                tag: WasmTag::Float,
            }),
            WasmTag::Int | WasmTag::Bool => Ok(TaggedExpr {
                instr: Instr::Binary(
                    BinaryOp::I32Sub,
                    Box::new(Instr::I32Const(0)),
                    Box::new(operand.instr),
                ),
                tag: WasmTag::Int,
            }),
            _ => Err(LowerError::InvalidNegation),
        }
    }

    fn lower_binary(&mut self, binary: &BinaryExpr) -> Result<TaggedExpr, LowerError> {
        let left = self.lower_expr(&binary.left)?;
        let right = self.lower_expr(&binary.right)?;

        if binary.op.kind == TokenKind::Plus
            && left.tag == WasmTag::Ptr
            && right.tag == WasmTag::Ptr
        {
            // needs a runtime allocator the module does not carry
            return Err(LowerError::StrConcat);
        }

        let float_flag = left.tag == WasmTag::Float || right.tag == WasmTag::Float;

        let mut lhs = left.instr;
        let mut rhs = right.instr;
        if float_flag {
            if left.tag != WasmTag::Float {
                lhs = Instr::Unary(UnaryOp::F64ConvertI32S, Box::new(lhs));
            }
            if right.tag != WasmTag::Float {
                rhs = Instr::Unary(UnaryOp::F64ConvertI32S, Box::new(rhs));
            }
        }

        use BinaryOp::*;
        let (op, tag) = match binary.op.kind {
            TokenKind::Plus => pick(float_flag, F64Add, I32Add),
            TokenKind::Minus => pick(float_flag, F64Sub, I32Sub),
            TokenKind::Star => pick(float_flag, F64Mul, I32Mul),
            TokenKind::Slash => pick(float_flag, F64Div, I32DivS),
            TokenKind::Percent => {
                if float_flag {
                    return Err(LowerError::FloatModulo);
                }
                (I32RemS, WasmTag::Int)
            },
            TokenKind::Greater => cmp(float_flag, F64Gt, I32GtS),
            TokenKind::GreaterEqual => cmp(float_flag, F64Ge, I32GeS),
            TokenKind::Less => cmp(float_flag, F64Lt, I32LtS),
            TokenKind::LessEqual => cmp(float_flag, F64Le, I32LeS),
            TokenKind::EqualEqual => cmp(float_flag, F64Eq, I32Eq),
            TokenKind::BangEqual => cmp(float_flag, F64Ne, I32Ne),
            _ => return Err(LowerError::UnsupportedOperator),
        };

        Ok(TaggedExpr {
            instr: Instr::Binary(op, Box::new(lhs), Box::new(rhs)),
            tag,
        })
    }

    fn lower_ternary(&mut self, ternary: &TernaryExpr) -> Result<TaggedExpr, LowerError> {
        let condition = self.lower_expr(&ternary.condition)?;
        let true_expr = self.lower_expr(&ternary.true_expr)?;
        let false_expr = self.lower_expr(&ternary.false_expr)?;

        let tag = true_expr.tag;
        Ok(TaggedExpr {
            instr: Instr::Select {
                condition: Box::new(condition.instr),
                true_expr: Box::new(true_expr.instr),
                false_expr: Box::new(false_expr.instr),
            },
            tag,
        })
    }

    fn lower_assign(&mut self, assign: &AssignExpr) -> Result<TaggedExpr, LowerError> {
        let slot = self
            .environment
            .get(&assign.identifier.lexeme)
            .copied()
            .ok_or_else(|| LowerError::UndefinedLocal {
                name: assign.identifier.lexeme.clone(),
            })?;
        let value = self.lower_expr(&assign.value)?;

        let result = if assign.op.kind == TokenKind::Equal {
            convert_numeric(value.instr, value.tag, slot.tag)
        } else {
            if slot.tag == WasmTag::Ptr || value.tag == WasmTag::Ptr {
                return Err(LowerError::StrConcat);
            }

            // compound assignment computes in the slot's type
            let float_flag = slot.tag == WasmTag::Float;
            let lhs = Instr::LocalGet(slot.index);
            let rhs = convert_numeric(value.instr, value.tag, slot.tag);

            use BinaryOp::*;
            let op = match assign.op.kind {
                TokenKind::PlusEqual => pick(float_flag, F64Add, I32Add).0,
                TokenKind::MinusEqual => pick(float_flag, F64Sub, I32Sub).0,
                TokenKind::StarEqual => pick(float_flag, F64Mul, I32Mul).0,
                TokenKind::SlashEqual => pick(float_flag, F64Div, I32DivS).0,
                TokenKind::PercentEqual => {
                    if float_flag {
                        return Err(LowerError::FloatModulo);
                    }
                    I32RemS
                },
                _ => return Err(LowerError::UnsupportedOperator),
            };
            Instr::Binary(op, Box::new(lhs), Box::new(rhs))
        };

        Ok(TaggedExpr {
            instr: Instr::LocalSet(slot.index, Box::new(result)),
            tag: WasmTag::Void,
        })
    }

    fn lower_call(&mut self, call: &CallExpr) -> Result<TaggedExpr, LowerError> {
        let tag = self
            .function_returns
            .get(&call.callee.lexeme)
            .copied()
            .ok_or_else(|| LowerError::UndefinedFunction {
                name: call.callee.lexeme.clone(),
            })?;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.lower_expr(arg)?.instr);
        }

        Ok(TaggedExpr {
            instr: Instr::Call {
                func: call.callee.lexeme.clone(),
                args,
            },
            tag,
        })
    }

    // ------------------------------------------------------------------
    // Support
    // ------------------------------------------------------------------

    fn allocate_local(&mut self, val_type: ValType) -> u32 {
        let locals = self
            .function_locals
            .entry(self.current_function.clone())
            .or_default();
        let index = locals.len() as u32;
        locals.push(val_type);
        index
    }

    /// Places a NUL-terminated string in static memory, returning its
    /// offset.
    fn add_segment(&mut self, text: &str) -> u32 {
        let offset = self.current_offset;
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.current_offset += bytes.len() as u32;
        self.segments.push(DataSegment { offset, bytes });
        offset
    }

    fn resolve_type_ref(&mut self, type_ref: &TypeRef) -> Result<BirdType, LowerError> {
        if type_ref.is_literal {
            return BirdType::from_literal(&type_ref.token.lexeme).ok_or_else(|| {
                LowerError::UnknownType {
                    name: type_ref.token.lexeme.clone(),
                }
            });
        }
        self.type_table
            .get(&type_ref.token.lexeme)
            .copied()
            .ok_or_else(|| LowerError::UnknownType {
                name: type_ref.token.lexeme.clone(),
            })
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(float_flag: bool, float_op: BinaryOp, int_op: BinaryOp) -> (BinaryOp, WasmTag) {
    if float_flag {
        (float_op, WasmTag::Float)
    } else {
        (int_op, WasmTag::Int)
    }
}

fn cmp(float_flag: bool, float_op: BinaryOp, int_op: BinaryOp) -> (BinaryOp, WasmTag) {
    (if float_flag { float_op } else { int_op }, WasmTag::Bool)
}

/// Inserts a numeric conversion when the tags disagree across the
/// int/float divide; all other pairs pass through untouched.
fn convert_numeric(instr: Instr, from: WasmTag, to: WasmTag) -> Instr {
    match (from, to) {
        (WasmTag::Float, WasmTag::Int) => {
            Instr::Unary(UnaryOp::I32TruncSatF64S, Box::new(instr))
        },
        (WasmTag::Int, WasmTag::Float) | (WasmTag::Bool, WasmTag::Float) => {
            Instr::Unary(UnaryOp::F64ConvertI32S, Box::new(instr))
        },
        _ => instr,
    }
}

fn tag_for(ty: BirdType) -> WasmTag {
    match ty {
        BirdType::Int => WasmTag::Int,
        BirdType::Float => WasmTag::Float,
        BirdType::Bool => WasmTag::Bool,
        BirdType::Str => WasmTag::Ptr,
        BirdType::Void | BirdType::Error => WasmTag::Void,
    }
}

fn std_imports() -> Vec<Import> {
    vec![
        Import {
            module: "env".to_string(),
            name: "print_i32".to_string(),
            ty: FuncType {
                params: vec![ValType::I32],
                result: None,
            },
        },
        Import {
            module: "env".to_string(),
            name: "print_f64".to_string(),
            ty: FuncType {
                params: vec![ValType::F64],
                result: None,
            },
        },
        Import {
            module: "env".to_string(),
            name: "print_str".to_string(),
            ty: FuncType {
                params: vec![ValType::I32],
                result: None,
            },
        },
    ]
}
