//! WebAssembly module assembly and the textual (WAT) printer.

use std::fmt::Write as _;

use crate::ir::{Instr, ValType};

/// A function type: parameter and result value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<ValType>,
    pub result: Option<ValType>,
}

/// An imported function.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub module: String,
    pub name: String,
    pub ty: FuncType,
}

/// A defined function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValType>,
    pub result: Option<ValType>,
    /// Extra locals beyond the parameters.
    pub locals: Vec<ValType>,
    pub body: Vec<Instr>,
    pub exported: bool,
}

/// An active data segment placed at instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSegment {
    pub offset: u32,
    pub bytes: Vec<u8>,
}

/// A complete module: imports, functions, one exported memory, and the
/// static data segments holding string literals.
#[derive(Debug, Clone, PartialEq)]
pub struct WasmModule {
    pub imports: Vec<Import>,
    pub functions: Vec<Function>,
    pub segments: Vec<DataSegment>,
    /// Declared memory maximum in 64KiB pages; initial is always 1.
    pub max_pages: u32,
}

impl WasmModule {
    /// The function index of a name in the module's index space: imports
    /// first, then defined functions in order.
    pub fn func_index(&self, name: &str) -> Option<u32> {
        if let Some(pos) = self.imports.iter().position(|imp| imp.name == name) {
            return Some(pos as u32);
        }
        self.functions
            .iter()
            .position(|func| func.name == name)
            .map(|pos| (pos + self.imports.len()) as u32)
    }

    /// Prints the module in the flat WAT text format.
    pub fn to_wat(&self) -> String {
        let mut out = String::new();
        out.push_str("(module\n");

        for import in &self.imports {
            let mut sig = String::new();
            for param in &import.ty.params {
                let _ = write!(sig, " (param {})", param.wat());
            }
            if let Some(result) = import.ty.result {
                let _ = write!(sig, " (result {})", result.wat());
            }
            let _ = writeln!(
                out,
                "  (import \"{}\" \"{}\" (func ${}{}))",
                import.module, import.name, import.name, sig
            );
        }

        let _ = writeln!(out, "  (memory (export \"memory\") 1 {})", self.max_pages);

        for segment in &self.segments {
            let _ = writeln!(
                out,
                "  (data (i32.const {}) \"{}\")",
                segment.offset,
                escape_data(&segment.bytes)
            );
        }

        for func in &self.functions {
            self.print_function(&mut out, func);
        }

        out.push_str(")\n");
        out
    }

    fn print_function(&self, out: &mut String, func: &Function) {
        let _ = write!(out, "  (func ${}", func.name);
        if func.exported {
            let _ = write!(out, " (export \"{}\")", func.name);
        }
        for param in &func.params {
            let _ = write!(out, " (param {})", param.wat());
        }
        if let Some(result) = func.result {
            let _ = write!(out, " (result {})", result.wat());
        }
        out.push('\n');

        if !func.locals.is_empty() {
            out.push_str("    (local");
            for local in &func.locals {
                let _ = write!(out, " {}", local.wat());
            }
            out.push_str(")\n");
        }

        for instr in &func.body {
            print_instr(out, instr, 2);
        }

        out.push_str("  )\n");
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    indent(out, depth);
    out.push_str(text);
    out.push('\n');
}

/// Prints one instruction in stack order.
fn print_instr(out: &mut String, instr: &Instr, depth: usize) {
    match instr {
        Instr::I32Const(value) => line(out, depth, &format!("i32.const {}", value)),
        Instr::F64Const(value) => {
            // keep a decimal point so the literal reads as an f64
            if value.fract() == 0.0 && value.is_finite() {
                line(out, depth, &format!("f64.const {:.1}", value));
            } else {
                line(out, depth, &format!("f64.const {}", value));
            }
        },
        Instr::LocalGet(index) => line(out, depth, &format!("local.get {}", index)),
        Instr::LocalSet(index, value) => {
            print_instr(out, value, depth);
            line(out, depth, &format!("local.set {}", index));
        },
        Instr::Binary(op, left, right) => {
            print_instr(out, left, depth);
            print_instr(out, right, depth);
            line(out, depth, op.wat());
        },
        Instr::Unary(op, operand) => {
            print_instr(out, operand, depth);
            line(out, depth, op.wat());
        },
        Instr::Select {
            condition,
            true_expr,
            false_expr,
        } => {
            print_instr(out, true_expr, depth);
            print_instr(out, false_expr, depth);
            print_instr(out, condition, depth);
            line(out, depth, "select");
        },
        Instr::Call { func, args } => {
            for arg in args {
                print_instr(out, arg, depth);
            }
            line(out, depth, &format!("call ${}", func));
        },
        Instr::Block { label, children } => {
            match label {
                Some(label) => line(out, depth, &format!("block ${}", label)),
                None => line(out, depth, "block"),
            }
            for child in children {
                print_instr(out, child, depth + 1);
            }
            line(out, depth, "end");
        },
        Instr::Loop { label, body } => {
            line(out, depth, &format!("loop ${}", label));
            print_instr(out, body, depth + 1);
            line(out, depth, "end");
        },
        Instr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            print_instr(out, condition, depth);
            line(out, depth, "if");
            print_instr(out, then_branch, depth + 1);
            if let Some(else_branch) = else_branch {
                line(out, depth, "else");
                print_instr(out, else_branch, depth + 1);
            }
            line(out, depth, "end");
        },
        Instr::Br(label) => line(out, depth, &format!("br ${}", label)),
        Instr::BrIf(label, condition) => {
            print_instr(out, condition, depth);
            line(out, depth, &format!("br_if ${}", label));
        },
        Instr::Return(value) => {
            if let Some(value) = value {
                print_instr(out, value, depth);
            }
            line(out, depth, "return");
        },
        Instr::Drop(value) => {
            print_instr(out, value, depth);
            line(out, depth, "drop");
        },
    }
}

/// Escapes data segment bytes for the WAT string syntax.
fn escape_data(bytes: &[u8]) -> String {
    let mut out = String::new();
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:02x}", b);
            },
        }
    }
    out
}
