//! The compiler front-end: lexer, recursive-descent parser, AST, and code
//! generator, all targeting the same instruction words the CPU executes.

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod report;

pub use ast::{BinOp, Cond, CmpOp, Expr, Program, Stmt};
pub use codegen::{compile_condition_as_value, compile_program_to_rom};
pub use parser::parse_program;
pub use report::render_error;
