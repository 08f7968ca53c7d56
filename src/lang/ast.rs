//! Tagged AST for the source language: expressions, conditions,
//! statements, and a whole program. Maps directly to the grammar in
//! `parser.rs`; unsupported shapes are caught by `codegen.rs`, not here.

/// A binary operator over two expressions. The grammar only ever nests
/// these left-associatively and the code generator only lowers the
/// `Var +/- Const` shape; anything else surfaces as
/// `CompileError::UnsupportedExpr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
}

/// An equality comparator. `*` and `/` tokens exist in the lexer for a
/// future extension but no grammar production ever builds a `CmpOp` from
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(i32),
    Var(String),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
}

/// A boolean condition, as it appears in `while (...)` / `if (...)`.
/// `CmpZero` is what the parser produces when the right-hand side of a
/// comparison is the literal `0`; `Cmp` is the general two-sided form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    CmpZero(Expr, CmpOp),
    Cmp(Expr, CmpOp, Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign(String, Expr),
    While(Cond, Vec<Stmt>),
    If(Cond, Vec<Stmt>, Option<Vec<Stmt>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
