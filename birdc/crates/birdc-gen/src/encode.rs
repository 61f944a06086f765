//! Binary (.wasm) serialisation.
//!
//! Emits the module sections in the order the format requires: type,
//! import, function, memory, export, code, data. Integers use LEB128;
//! symbolic branch labels resolve to relative depths against a label
//! stack kept during the instruction walk.

use crate::ir::{Instr, UnaryOp};
use crate::module::{FuncType, WasmModule};

const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6d];
const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

const SECTION_TYPE: u8 = 1;
const SECTION_IMPORT: u8 = 2;
const SECTION_FUNCTION: u8 = 3;
const SECTION_MEMORY: u8 = 5;
const SECTION_EXPORT: u8 = 7;
const SECTION_CODE: u8 = 10;
const SECTION_DATA: u8 = 11;

fn uleb(buf: &mut Vec<u8>, value: u64) {
    leb128::write::unsigned(buf, value).expect("write to Vec cannot fail");
}

fn sleb(buf: &mut Vec<u8>, value: i64) {
    leb128::write::signed(buf, value).expect("write to Vec cannot fail");
}

fn write_name(buf: &mut Vec<u8>, name: &str) {
    uleb(buf, name.len() as u64);
    buf.extend_from_slice(name.as_bytes());
}

fn write_func_type(buf: &mut Vec<u8>, ty: &FuncType) {
    buf.push(0x60);
    uleb(buf, ty.params.len() as u64);
    for param in &ty.params {
        buf.push(param.byte());
    }
    match ty.result {
        Some(result) => {
            uleb(buf, 1);
            buf.push(result.byte());
        },
        None => uleb(buf, 0),
    }
}

fn write_section(out: &mut Vec<u8>, id: u8, payload: &[u8]) {
    out.push(id);
    uleb(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

impl WasmModule {
    /// Serialises the module to the binary format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION);

        // deduplicated function types, imports first
        let mut types: Vec<FuncType> = Vec::new();
        let mut type_index = |ty: &FuncType, types: &mut Vec<FuncType>| -> u64 {
            match types.iter().position(|t| t == ty) {
                Some(pos) => pos as u64,
                None => {
                    types.push(ty.clone());
                    (types.len() - 1) as u64
                },
            }
        };
        let import_types: Vec<u64> = self
            .imports
            .iter()
            .map(|imp| type_index(&imp.ty, &mut types))
            .collect();
        let function_types: Vec<u64> = self
            .functions
            .iter()
            .map(|func| {
                let ty = FuncType {
                    params: func.params.clone(),
                    result: func.result,
                };
                type_index(&ty, &mut types)
            })
            .collect();

        // type section
        let mut payload = Vec::new();
        uleb(&mut payload, types.len() as u64);
        for ty in &types {
            write_func_type(&mut payload, ty);
        }
        write_section(&mut out, SECTION_TYPE, &payload);

        // import section
        let mut payload = Vec::new();
        uleb(&mut payload, self.imports.len() as u64);
        for (import, &type_idx) in self.imports.iter().zip(&import_types) {
            write_name(&mut payload, &import.module);
            write_name(&mut payload, &import.name);
            payload.push(0x00);
            uleb(&mut payload, type_idx);
        }
        write_section(&mut out, SECTION_IMPORT, &payload);

        // function section
        let mut payload = Vec::new();
        uleb(&mut payload, self.functions.len() as u64);
        for &type_idx in &function_types {
            uleb(&mut payload, type_idx);
        }
        write_section(&mut out, SECTION_FUNCTION, &payload);

        // memory section: initial 1 page, declared maximum
        let mut payload = Vec::new();
        uleb(&mut payload, 1);
        payload.push(0x01);
        uleb(&mut payload, 1);
        uleb(&mut payload, u64::from(self.max_pages));
        write_section(&mut out, SECTION_MEMORY, &payload);

        // export section: the memory plus every exported function
        let mut payload = Vec::new();
        let exported: Vec<_> = self.functions.iter().filter(|f| f.exported).collect();
        uleb(&mut payload, (exported.len() + 1) as u64);
        write_name(&mut payload, "memory");
        payload.push(0x02);
        uleb(&mut payload, 0);
        for func in exported {
            write_name(&mut payload, &func.name);
            payload.push(0x00);
            let index = self
                .func_index(&func.name)
                .expect("exported function is defined");
            uleb(&mut payload, u64::from(index));
        }
        write_section(&mut out, SECTION_EXPORT, &payload);

        // code section
        let mut payload = Vec::new();
        uleb(&mut payload, self.functions.len() as u64);
        for func in &self.functions {
            let mut body = Vec::new();

            // locals as (count, type) runs
            let mut runs: Vec<(u64, u8)> = Vec::new();
            for local in &func.locals {
                match runs.last_mut() {
                    Some((count, byte)) if *byte == local.byte() => *count += 1,
                    _ => runs.push((1, local.byte())),
                }
            }
            uleb(&mut body, runs.len() as u64);
            for (count, byte) in runs {
                uleb(&mut body, count);
                body.push(byte);
            }

            let mut labels: Vec<Option<String>> = Vec::new();
            for instr in &func.body {
                self.encode_instr(instr, &mut body, &mut labels);
            }
            body.push(0x0b);

            uleb(&mut payload, body.len() as u64);
            payload.extend_from_slice(&body);
        }
        write_section(&mut out, SECTION_CODE, &payload);

        // data section
        if !self.segments.is_empty() {
            let mut payload = Vec::new();
            uleb(&mut payload, self.segments.len() as u64);
            for segment in &self.segments {
                payload.push(0x00);
                payload.push(0x41);
                sleb(&mut payload, i64::from(segment.offset));
                payload.push(0x0b);
                uleb(&mut payload, segment.bytes.len() as u64);
                payload.extend_from_slice(&segment.bytes);
            }
            write_section(&mut out, SECTION_DATA, &payload);
        }

        out
    }

    fn encode_instr(&self, instr: &Instr, buf: &mut Vec<u8>, labels: &mut Vec<Option<String>>) {
        match instr {
            Instr::I32Const(value) => {
                buf.push(0x41);
                sleb(buf, i64::from(*value));
            },
            Instr::F64Const(value) => {
                buf.push(0x44);
                buf.extend_from_slice(&value.to_le_bytes());
            },
            Instr::LocalGet(index) => {
                buf.push(0x20);
                uleb(buf, u64::from(*index));
            },
            Instr::LocalSet(index, value) => {
                self.encode_instr(value, buf, labels);
                buf.push(0x21);
                uleb(buf, u64::from(*index));
            },
            Instr::Binary(op, left, right) => {
                self.encode_instr(left, buf, labels);
                self.encode_instr(right, buf, labels);
                buf.push(op.opcode());
            },
            Instr::Unary(op, operand) => {
                self.encode_instr(operand, buf, labels);
                match op {
                    UnaryOp::F64Neg => buf.push(0x9a),
                    UnaryOp::F64ConvertI32S => buf.push(0xb7),
                    UnaryOp::I32TruncSatF64S => {
                        buf.push(0xfc);
                        uleb(buf, 2);
                    },
                }
            },
            Instr::Select {
                condition,
                true_expr,
                false_expr,
            } => {
                self.encode_instr(true_expr, buf, labels);
                self.encode_instr(false_expr, buf, labels);
                self.encode_instr(condition, buf, labels);
                buf.push(0x1b);
            },
            Instr::Call { func, args } => {
                for arg in args {
                    self.encode_instr(arg, buf, labels);
                }
                buf.push(0x10);
                let index = self.func_index(func).expect("call target is defined");
                uleb(buf, u64::from(index));
            },
            Instr::Block { label, children } => {
                buf.push(0x02);
                buf.push(0x40);
                labels.push(label.clone());
                for child in children {
                    self.encode_instr(child, buf, labels);
                }
                buf.push(0x0b);
                labels.pop();
            },
            Instr::Loop { label, body } => {
                buf.push(0x03);
                buf.push(0x40);
                labels.push(Some(label.clone()));
                self.encode_instr(body, buf, labels);
                buf.push(0x0b);
                labels.pop();
            },
            Instr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.encode_instr(condition, buf, labels);
                buf.push(0x04);
                buf.push(0x40);
                labels.push(None);
                self.encode_instr(then_branch, buf, labels);
                if let Some(else_branch) = else_branch {
                    buf.push(0x05);
                    self.encode_instr(else_branch, buf, labels);
                }
                buf.push(0x0b);
                labels.pop();
            },
            Instr::Br(label) => {
                buf.push(0x0c);
                uleb(buf, label_depth(labels, label));
            },
            Instr::BrIf(label, condition) => {
                self.encode_instr(condition, buf, labels);
                buf.push(0x0d);
                uleb(buf, label_depth(labels, label));
            },
            Instr::Return(value) => {
                if let Some(value) = value {
                    self.encode_instr(value, buf, labels);
                }
                buf.push(0x0f);
            },
            Instr::Drop(value) => {
                self.encode_instr(value, buf, labels);
                buf.push(0x1a);
            },
        }
    }
}

/// Relative depth of a named label: 0 is the innermost enclosing block.
fn label_depth(labels: &[Option<String>], label: &str) -> u64 {
    labels
        .iter()
        .rev()
        .position(|l| l.as_deref() == Some(label))
        .expect("branch targets an enclosing label") as u64
}
