//! Wires a [`Cpu`] to a [`Bus`] and drives it, the way `nes_core.rs` wires
//! the teacher's `Cpu6502` to its `Bus`. This is the layer a host — a CLI,
//! a test harness, a future debugger — actually calls.

use log::debug;

use crate::bus::Bus;
use crate::constants::FRAME_STEP_BUDGET;
use crate::cpu::Cpu;
use crate::error::CpuError;

pub struct Machine {
    pub bus: Bus,
    pub cpu: Cpu,
    /// Sum of every `step()` call's cost: `HALT` contributes 0, every
    /// other instruction contributes 1. Not the same as "instructions
    /// attempted" once a program has halted and is being stepped further.
    pub cycles: u64,
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            bus: Bus::new(),
            cpu: Cpu::new(),
            cycles: 0,
        }
    }

    /// Reset the CPU to its power-on state without touching memory. A
    /// loaded ROM survives a reset; only registers, flags, PC, and the
    /// cycle counter do not.
    pub fn reset(&mut self) {
        self.cpu = Cpu::new();
        self.cycles = 0;
    }

    /// Copy `rom` into the bus at `addr`, bypassing write protection.
    pub fn load_rom(&mut self, rom: &[u8], addr: u16) {
        self.bus.load_rom(rom, addr);
    }

    /// Execute exactly one instruction, logging it at debug level when
    /// `trace` is set. A no-op if the CPU has already halted.
    pub fn run_step(&mut self, trace: bool) -> Result<(), CpuError> {
        if trace {
            debug!("step cycles={} pc={:#06X}", self.cycles, self.cpu.pc());
        }
        self.cycles += self.cpu.step(&mut self.bus)? as u64;
        Ok(())
    }

    /// Execute up to `n` instructions, stopping early once the CPU halts.
    pub fn run_n_steps(&mut self, n: u32, trace: bool) -> Result<(), CpuError> {
        for _ in 0..n {
            if self.cpu.halted() {
                break;
            }
            self.run_step(trace)?;
        }
        Ok(())
    }

    /// Run a bounded burst of instructions — [`FRAME_STEP_BUDGET`] of them
    /// — and return, whether or not the CPU halted. Intended for a host
    /// event loop that wants to yield periodically rather than block
    /// until the program finishes.
    pub fn run_frame(&mut self) -> Result<(), CpuError> {
        self.run_n_steps(FRAME_STEP_BUDGET, false)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
