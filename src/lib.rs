//! A retro-style 16-bit virtual machine and the small imperative language
//! that compiles down to its instruction set.
//!
//! The crate is organized leaf-first: [`constants`] and [`isa`] define the
//! bit layout, [`bus`] is the flat memory behind it, [`encode`] packs and
//! unpacks instruction words, [`cpu`] fetches/decodes/executes them, and
//! [`machine`] wires a [`cpu::Cpu`] to a [`bus::Bus`] for stepping. The
//! [`lang`] module is the compiler front-end: lexer, parser, AST, and code
//! generator, which all target the same instruction words the CPU executes.

pub mod bus;
pub mod constants;
pub mod cpu;
pub mod encode;
pub mod error;
pub mod isa;
pub mod lang;
pub mod machine;

pub use bus::Bus;
pub use cpu::Cpu;
pub use encode::{build_rom, words_from_rom};
pub use error::{CompileError, CpuError};
pub use lang::{compile_program_to_rom, parse_program};
pub use machine::Machine;
