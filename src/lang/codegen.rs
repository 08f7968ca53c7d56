//! AST → instruction words. Register allocation is first-fit over one flat
//! mapping shared by named variables and compiler-generated temporaries;
//! forward jumps are backpatched once the whole program (and its final
//! `HALT`) has been emitted.

use std::collections::HashMap;

use super::ast::{BinOp, Cond, CmpOp, Expr, Program, Stmt};
use crate::constants::{MAX_ALLOCATABLE_REGISTERS, R0, R1};
use crate::encode::{encode_halt, encode_i, encode_j, encode_r};
use crate::error::CompileError;
use crate::isa::Op;

#[derive(Clone, Copy)]
enum JumpKind {
    Jmp,
    Jz,
    Jnz,
}

impl JumpKind {
    fn op(self) -> Op {
        match self {
            JumpKind::Jmp => Op::Jmp,
            JumpKind::Jz => Op::Jz,
            JumpKind::Jnz => Op::Jnz,
        }
    }
}

struct Patch {
    kind: JumpKind,
    index: usize,
    label: String,
}

struct Compiler {
    rom_words: Vec<u16>,
    labels: HashMap<String, usize>,
    patches: Vec<Patch>,
    var_regs: HashMap<String, usize>,
    label_counter: u32,
    temp_counter: u32,
}

impl Compiler {
    fn new() -> Compiler {
        Compiler {
            rom_words: Vec::new(),
            labels: HashMap::new(),
            patches: Vec::new(),
            var_regs: HashMap::new(),
            label_counter: 0,
            temp_counter: 0,
        }
    }

    fn current_index(&self) -> usize {
        self.rom_words.len()
    }

    fn emit(&mut self, word: u16) {
        self.rom_words.push(word);
    }

    fn mark_label(&mut self, label: &str) {
        self.labels.insert(label.to_string(), self.current_index());
    }

    fn emit_jump(&mut self, kind: JumpKind, label: &str) {
        let index = self.current_index();
        self.patches.push(Patch {
            kind,
            index,
            label: label.to_string(),
        });
        self.emit(0);
    }

    /// One shared counter for every `while`/`if` so a construct's paired
    /// labels (`loop_N`/`while_end_N`, `if_else_N`/`if_end_N`) carry
    /// matching suffixes, and distinct constructs never collide.
    fn next_label_id(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    fn new_temp_name(&mut self) -> String {
        let n = self.temp_counter;
        self.temp_counter += 1;
        format!("__t{}", n)
    }

    /// Register bound to `name`, allocating a fresh one on first use.
    /// Named variables and temporaries share this one mapping.
    fn alloc_reg(&mut self, name: &str) -> Result<usize, CompileError> {
        if let Some(&r) = self.var_regs.get(name) {
            return Ok(r);
        }
        if self.var_regs.len() >= MAX_ALLOCATABLE_REGISTERS {
            return Err(CompileError::TooManyVariables {
                max: MAX_ALLOCATABLE_REGISTERS,
                max_plus_one: self.var_regs.len() + 1,
            });
        }
        let reg = R1 + self.var_regs.len();
        self.var_regs.insert(name.to_string(), reg);
        Ok(reg)
    }

    fn alloc_temp(&mut self) -> Result<usize, CompileError> {
        let name = self.new_temp_name();
        self.alloc_reg(&name)
    }

    fn compile_expr(&mut self, expr: &Expr, target: usize) -> Result<(), CompileError> {
        match expr {
            Expr::Const(v) => {
                self.emit(encode_i(Op::Addi, target, R0, *v));
                Ok(())
            }
            Expr::Var(name) => {
                let r = self.alloc_reg(name)?;
                if r != target {
                    self.emit(encode_r(Op::Add, target, r, R0));
                }
                Ok(())
            }
            Expr::BinOp(op, left, right) => match (left.as_ref(), right.as_ref()) {
                (Expr::Var(name), Expr::Const(v)) => {
                    let r = self.alloc_reg(name)?;
                    let imm = match op {
                        BinOp::Add => *v,
                        BinOp::Sub => -*v,
                    };
                    self.emit(encode_i(Op::Addi, target, r, imm));
                    Ok(())
                }
                _ => Err(CompileError::UnsupportedExpr),
            },
        }
    }

    /// Emit the `CMP`/`CMPI` for `cond` and return its comparator, leaving
    /// the caller to decide which way the following conditional jump goes.
    fn emit_comparison(&mut self, cond: &Cond) -> Result<CmpOp, CompileError> {
        match cond {
            Cond::CmpZero(expr, op) => {
                let r = self.alloc_temp()?;
                self.compile_expr(expr, r)?;
                self.emit(encode_i(Op::Cmpi, 0, r, 0));
                Ok(*op)
            }
            Cond::Cmp(Expr::Const(_), _, _) => Err(CompileError::UnsupportedCond),
            Cond::Cmp(left, op, right) => {
                match right {
                    Expr::Var(name) => {
                        let rl = self.compile_operand_reg(left)?;
                        let rr = self.alloc_reg(name)?;
                        self.emit(encode_r(Op::Cmp, 0, rl, rr));
                    }
                    Expr::Const(v) => {
                        let rl = self.compile_operand_reg(left)?;
                        self.emit(encode_i(Op::Cmpi, 0, rl, *v));
                    }
                    Expr::BinOp(..) => return Err(CompileError::UnsupportedCond),
                }
                Ok(*op)
            }
        }
    }

    /// Branch-if-false policy: fall through when `cond` holds, jump to
    /// `false_label` otherwise. Used by `While`/`If`.
    fn compile_cond(&mut self, cond: &Cond, false_label: &str) -> Result<(), CompileError> {
        let op = self.emit_comparison(cond)?;
        let jump = match op {
            CmpOp::Eq => JumpKind::Jnz,
            CmpOp::Ne => JumpKind::Jz,
        };
        self.emit_jump(jump, false_label);
        Ok(())
    }

    /// Branch-if-true: jump to `true_label` when `cond` holds, fall
    /// through otherwise. The mirror image of `compile_cond`, used only by
    /// condition-as-expression materialization.
    fn compile_cond_branch_if_true(&mut self, cond: &Cond, true_label: &str) -> Result<(), CompileError> {
        let op = self.emit_comparison(cond)?;
        let jump = match op {
            CmpOp::Eq => JumpKind::Jz,
            CmpOp::Ne => JumpKind::Jnz,
        };
        self.emit_jump(jump, true_label);
        Ok(())
    }

    /// Materialize `cond` as a 0/1 value in `target`: zero it, then
    /// overwrite with 1 through a fresh forward label if the condition
    /// holds. Only `Z` is clobbered between the comparison and the branch.
    fn compile_cond_into(&mut self, cond: &Cond, target: usize) -> Result<(), CompileError> {
        let n = self.next_label_id();
        let l_true = format!("cond_true_{}", n);
        let l_after = format!("cond_after_{}", n);
        self.emit(encode_i(Op::Addi, target, R0, 0));
        self.compile_cond_branch_if_true(cond, &l_true)?;
        self.emit_jump(JumpKind::Jmp, &l_after);
        self.mark_label(&l_true);
        self.emit(encode_i(Op::Addi, target, R0, 1));
        self.mark_label(&l_after);
        Ok(())
    }

    /// The left-hand side of a two-sided `Cmp` must already name a
    /// register directly; only `Var` is supported there.
    fn compile_operand_reg(&mut self, expr: &Expr) -> Result<usize, CompileError> {
        match expr {
            Expr::Var(name) => self.alloc_reg(name),
            _ => Err(CompileError::UnsupportedCond),
        }
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Assign(name, expr) => {
                let r = self.alloc_reg(name)?;
                self.compile_expr(expr, r)
            }
            Stmt::While(cond, body) => {
                let n = self.next_label_id();
                let l_loop = format!("loop_{}", n);
                let l_end = format!("while_end_{}", n);
                self.mark_label(&l_loop);
                self.compile_cond(cond, &l_end)?;
                for s in body {
                    self.compile_stmt(s)?;
                }
                self.emit_jump(JumpKind::Jmp, &l_loop);
                self.mark_label(&l_end);
                Ok(())
            }
            Stmt::If(cond, then_body, else_body) => {
                let n = self.next_label_id();
                let l_else = format!("if_else_{}", n);
                let l_end = format!("if_end_{}", n);
                self.compile_cond(cond, &l_else)?;
                for s in then_body {
                    self.compile_stmt(s)?;
                }
                if else_body.is_some() {
                    self.emit_jump(JumpKind::Jmp, &l_end);
                }
                self.mark_label(&l_else);
                if let Some(else_stmts) = else_body {
                    for s in else_stmts {
                        self.compile_stmt(s)?;
                    }
                }
                self.mark_label(&l_end);
                Ok(())
            }
        }
    }

    fn patch_jumps(&mut self) -> Result<(), CompileError> {
        for patch in &self.patches {
            let target = *self
                .labels
                .get(&patch.label)
                .ok_or_else(|| CompileError::UndefinedLabel {
                    label: patch.label.clone(),
                })?;
            let off = target as i32 - (patch.index as i32 + 1);
            if !(-2048..=2047).contains(&off) {
                return Err(CompileError::DisplacementOverflow {
                    label: patch.label.clone(),
                    off,
                });
            }
            self.rom_words[patch.index] = encode_j(patch.kind.op(), off);
        }
        Ok(())
    }
}

/// Lower a parsed [`Program`] to a sequence of instruction words, ending
/// in `HALT`, with every forward jump resolved.
pub fn compile_program_to_rom(program: &Program) -> Result<Vec<u16>, CompileError> {
    let mut c = Compiler::new();
    for stmt in &program.stmts {
        c.compile_stmt(stmt)?;
    }
    c.emit(encode_halt());
    c.patch_jumps()?;
    Ok(c.rom_words)
}

/// Materialize `cond` as a 0/1 value into `target_var`'s register and
/// return the resulting ROM. Exists because the grammar has no
/// expression-position production for a condition; this is the
/// code generator's half of that contract on its own.
pub fn compile_condition_as_value(cond: &Cond, target_var: &str) -> Result<Vec<u16>, CompileError> {
    let mut c = Compiler::new();
    let target = c.alloc_reg(target_var)?;
    c.compile_cond_into(cond, target)?;
    c.emit(encode_halt());
    c.patch_jumps()?;
    Ok(c.rom_words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parser::parse_program;

    fn compile(src: &str) -> Vec<u16> {
        compile_program_to_rom(&parse_program(src).unwrap()).unwrap()
    }

    #[test]
    fn ends_in_halt() {
        let rom = compile("x = 1;");
        assert_eq!(Op::decode(*rom.last().unwrap()), Some(Op::Halt));
    }

    #[test]
    fn while_loop_patches_backward_and_forward_jumps() {
        let rom = compile("x = 3; while (x != 0) { x = x - 1; }");
        // every jump word must decode to a real opcode, i.e. no leftover
        // zero placeholders survive patching.
        for &w in &rom {
            assert!(Op::decode(w).is_some());
        }
    }

    #[test]
    fn too_many_variables_is_a_fatal_error() {
        let mut src = String::new();
        for i in 0..8 {
            src.push_str(&format!("v{} = {};\n", i, i));
        }
        let err = compile_program_to_rom(&parse_program(&src).unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::TooManyVariables { .. }));
    }

    #[test]
    fn exactly_seven_variables_is_allowed() {
        let mut src = String::new();
        for i in 0..7 {
            src.push_str(&format!("v{} = {};\n", i, i));
        }
        assert!(compile_program_to_rom(&parse_program(&src).unwrap()).is_ok());
    }

    #[test]
    fn const_on_left_of_comparison_is_unsupported() {
        let program = Program {
            stmts: vec![Stmt::If(
                Cond::Cmp(Expr::Const(0), CmpOp::Eq, Expr::Var("x".into())),
                vec![],
                None,
            )],
        };
        let err = compile_program_to_rom(&program).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedCond));
    }

    #[test]
    fn condition_materializes_to_one_when_true() {
        let cond = Cond::CmpZero(Expr::Const(0), CmpOp::Eq);
        let rom = compile_condition_as_value(&cond, "r").unwrap();
        let mut cpu = crate::cpu::Cpu::new();
        let mut bus = crate::bus::Bus::new();
        bus.load_rom(&crate::encode::build_rom(&rom), 0);
        for _ in 0..20 {
            if cpu.halted() {
                break;
            }
            cpu.step(&mut bus).unwrap();
        }
        assert_eq!(cpu.reg(1), 1);
    }

    #[test]
    fn condition_materializes_to_zero_when_false() {
        let cond = Cond::CmpZero(Expr::Const(1), CmpOp::Eq);
        let rom = compile_condition_as_value(&cond, "r").unwrap();
        let mut cpu = crate::cpu::Cpu::new();
        let mut bus = crate::bus::Bus::new();
        bus.load_rom(&crate::encode::build_rom(&rom), 0);
        for _ in 0..20 {
            if cpu.halted() {
                break;
            }
            cpu.step(&mut bus).unwrap();
        }
        assert_eq!(cpu.reg(1), 0);
    }

    #[test]
    fn displacement_overflow_is_a_fatal_error() {
        // A while-loop body long enough that the backward jump from its end
        // back to the top needs a displacement past the signed 12-bit
        // range (-2048..=2047 words). Each loop body statement here
        // compiles to one ADDI word, so 2100 of them overflow comfortably.
        let mut src = String::from("x = 1; while (x != 0) {\n");
        for _ in 0..2100 {
            src.push_str("x = x + 1;\n");
        }
        src.push_str("}\n");
        let program = parse_program(&src).unwrap();
        let err = compile_program_to_rom(&program).unwrap_err();
        assert!(matches!(err, CompileError::DisplacementOverflow { .. }));
    }

    #[test]
    fn unsupported_binop_shape_is_rejected() {
        let program = Program {
            stmts: vec![Stmt::Assign(
                "x".into(),
                Expr::BinOp(
                    BinOp::Add,
                    Box::new(Expr::Var("a".into())),
                    Box::new(Expr::Var("b".into())),
                ),
            )],
        };
        let err = compile_program_to_rom(&program).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedExpr));
    }
}
