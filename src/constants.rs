//! Bit masks, field shifts, and memory-map constants shared by the encoder,
//! the CPU's decode stage, and the code generator's backpatcher.

/// Total addressable memory, in bytes.
pub const MEM_SIZE: usize = 0x1_0000;

/// Address mask applied before every bus access (redundant for `u16`
/// addresses, but documents the "wraps at 16 bits" invariant explicitly).
pub const ADDR_MASK: u16 = 0xFFFF;

/// Mask for a single byte.
pub const BYTE_MASK: u16 = 0xFF;

/// Width, in bits, of a byte. Used to build/split little-endian words.
pub const BYTE_BITS: u32 = 8;

/// Inclusive ROM window. Writes landing in `[ROM_START, ROM_END]` are
/// silent no-ops. Empty by default, so the whole address space is
/// writable; a host that wants write-protected ROM can widen this range
/// (see `DESIGN.md` for why the core ships it empty).
pub const ROM_START: u16 = 0x0001;
pub const ROM_END: u16 = 0x0000;

/// Mask for the full 16-bit word.
pub const WORD_MASK: u32 = 0xFFFF;

/// Bit 15, used to read the sign of a 16-bit result.
pub const NEGATIVE_BIT: u16 = 0x8000;

/// Opcode occupies bits 15..12.
pub const OPCODE_SHIFT: u16 = 12;
pub const OPCODE_MASK: u16 = 0xF;

/// Register fields are 3 bits wide.
pub const REG_MASK: u16 = 0x7;
pub const REG_SHIFT_RD: u16 = 9;
pub const REG_SHIFT_RS1: u16 = 6;
pub const REG_SHIFT_RS2: u16 = 3;

/// `imm6` / `off6` (I-form and M-form) occupy the low 6 bits.
pub const IMM6_MASK: u16 = 0x3F;
pub const IMM6_SIGN_BIT: u16 = 0x20;

/// `off12` (J-form) occupies the low 12 bits.
pub const OFF12_MASK: u16 = 0x0FFF;
pub const OFF12_SIGN_BIT: u16 = 0x0800;

/// Register conventionally treated as always-zero by the code generator.
/// The CPU itself does not special-case it.
pub const R0: usize = 0;
/// First register handed out to a named variable or temporary.
pub const R1: usize = 1;
/// Register designated as the stack pointer by the `Cpu::sp` accessor.
/// No core-ISA instruction uses it; reserved for a future CALL/RET/PUSH/POP.
pub const SP: usize = 7;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Number of registers available to the variable/temporary allocator: R1
/// through R7 inclusive (R0 is the reserved zero register). R7 doubles as
/// `SP`; the ISA defines no instruction that needs it as a stack pointer,
/// so the allocator is free to use it like any other general register —
/// see `DESIGN.md` for why this crate resolves that open question this way.
/// See `lang::codegen` for the exact allocation cap.
pub const MAX_ALLOCATABLE_REGISTERS: usize = SP - R1 + 1;

/// Number of steps a `Machine::run_frame()` call executes before yielding,
/// regardless of whether the CPU halted.
pub const FRAME_STEP_BUDGET: u32 = 10_000;
