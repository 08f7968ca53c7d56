//! Arithmetic and compare opcodes: `ADD`, `SUB`, `ADDI`, `CMP`, `CMPI`.
//! Each function here computes the result and flags identically; `CMP`/
//! `CMPI` differ from `SUB`/`ADDI` only in that they discard the result
//! and keep the destination register untouched.

use super::Cpu;
use crate::constants::NEGATIVE_BIT;
use crate::encode::{decode_i, decode_r};
use crate::isa::Op;

struct AluResult {
    value: u16,
    z: bool,
    n: bool,
    c: bool,
    v: bool,
}

fn add_with_flags(a: u16, b: u16) -> AluResult {
    let sum = a as u32 + b as u32;
    let value = sum as u16;
    let c = sum > 0xFFFF;
    // Signed overflow: operands share a sign and the result's sign differs
    // from theirs.
    let v = ((a ^ value) & (b ^ value) & NEGATIVE_BIT) != 0;
    AluResult {
        value,
        z: value == 0,
        n: value & NEGATIVE_BIT != 0,
        c,
        v,
    }
}

fn sub_with_flags(a: u16, b: u16) -> AluResult {
    let diff = (a as i32) - (b as i32);
    let value = diff as u16;
    // "No borrow": the unsigned minuend was at least the subtrahend.
    let c = a >= b;
    let v = ((a ^ b) & (a ^ value) & NEGATIVE_BIT) != 0;
    AluResult {
        value,
        z: value == 0,
        n: value & NEGATIVE_BIT != 0,
        c,
        v,
    }
}

fn apply(cpu: &mut Cpu, r: &AluResult) {
    cpu.flags.z = r.z;
    cpu.flags.n = r.n;
    cpu.flags.c = r.c;
    cpu.flags.v = r.v;
}

/// `ADD rd, rs1, rs2` / `SUB rd, rs1, rs2`.
pub fn exec_r(cpu: &mut Cpu, op: Op, word: u16) {
    let (rd, rs1, rs2) = decode_r(word);
    let a = cpu.reg(rs1);
    let b = cpu.reg(rs2);
    let result = match op {
        Op::Add => add_with_flags(a, b),
        Op::Sub => sub_with_flags(a, b),
        _ => unreachable!("exec_r only handles ADD/SUB"),
    };
    cpu.set_reg(rd, result.value);
    apply(cpu, &result);
}

/// `ADDI rd, rs, imm6`.
pub fn exec_i(cpu: &mut Cpu, word: u16) {
    let (rd, rs, imm) = decode_i(word);
    let a = cpu.reg(rs);
    let result = add_with_flags(a, imm as u16);
    cpu.set_reg(rd, result.value);
    apply(cpu, &result);
}

/// `CMP rs1, rs2` (field layout matches R-form; the `rd` field is unused).
pub fn exec_cmp_r(cpu: &mut Cpu, word: u16) {
    let (_unused, rs1, rs2) = decode_r(word);
    let result = sub_with_flags(cpu.reg(rs1), cpu.reg(rs2));
    apply(cpu, &result);
}

/// `CMPI rs, imm6` (field layout matches I-form; the `rd` field is unused).
pub fn exec_cmp_i(cpu: &mut Cpu, word: u16) {
    let (_unused, rs, imm) = decode_i(word);
    let result = sub_with_flags(cpu.reg(rs), imm as u16);
    apply(cpu, &result);
}
