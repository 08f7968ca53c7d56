//! Fatal error types for the CPU and the compiler front-end.
//!
//! Every fatal condition described by the ISA and the language spec is a
//! typed variant here rather than a panic or a bare `String`, so a host can
//! match on what went wrong instead of scraping a message.

use thiserror::Error;

/// Raised by [`crate::cpu::Cpu::step`] when the fetched opcode is not one of
/// the 11 defined codes. Not recoverable: the caller (the [`crate::Machine`]
/// driver) stops the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown opcode {opcode:#X} at pc={pc:#06X}")]
pub struct CpuError {
    /// The raw 4-bit opcode field that failed to decode.
    pub opcode: u16,
    /// The PC at which the offending instruction was fetched.
    pub pc: u16,
}

/// Fatal, first-error-wins compile error. Carries a source position where
/// the failure originates in source text (lexer/parser); code-generator
/// errors are positionless since they operate on an already-parsed AST.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An unrecognized character was encountered while tokenizing.
    #[error("{message} at {row}:{col}")]
    Lex { message: String, row: u32, col: u32 },

    /// The parser expected one token/production and found another (or ran
    /// out of input).
    #[error("{message} at {row}:{col}")]
    Parse { message: String, row: u32, col: u32 },

    /// `compile_expr` was given a `BinOp` shape it doesn't lower (only
    /// `Var +/- Const` is supported).
    #[error("unsupported expression shape: only `Var +/- Const` binary expressions are lowered")]
    UnsupportedExpr,

    /// `compile_cond` was given a `Cmp(Const, *, Var)` shape.
    #[error("unsupported condition shape: a constant may not appear on the left of a comparison")]
    UnsupportedCond,

    /// More than [`crate::constants::MAX_ALLOCATABLE_REGISTERS`] distinct
    /// variables/temporaries were requested.
    #[error("too many variables: at most {max} may be live at once, requested a {max_plus_one}th")]
    TooManyVariables { max: usize, max_plus_one: usize },

    /// A backpatched jump's displacement does not fit in a signed 12-bit
    /// field.
    #[error("jump displacement {off} to label {label:?} does not fit in a signed 12-bit field")]
    DisplacementOverflow { label: String, off: i32 },

    /// A patch referenced a label that was never marked. Should be
    /// unreachable given the code generator's own label discipline, kept
    /// as a defensive backstop in `_patch_jumps`.
    #[error("label {label:?} referenced by a jump was never defined")]
    UndefinedLabel { label: String },
}
