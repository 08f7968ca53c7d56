//! Shared scaffolding for CPU unit tests: build a bus from raw words, run
//! it to halt, and assert on the resulting register/flag state.

use super::Cpu;
use crate::bus::Bus;
use crate::encode::build_rom;

pub struct Harness {
    pub cpu: Cpu,
    pub bus: Bus,
}

impl Harness {
    /// Load `words` at address 0 and return a fresh `Cpu` positioned at 0.
    pub fn from_words(words: &[u16]) -> Harness {
        let mut bus = Bus::new();
        bus.load_rom(&build_rom(words), 0);
        Harness {
            cpu: Cpu::new(),
            bus,
        }
    }

    /// Step until the CPU halts or `max_steps` is exceeded (a runaway
    /// program in a test is a bug, not an infinite loop to wait out).
    pub fn run_to_halt(&mut self, max_steps: u32) {
        for _ in 0..max_steps {
            if self.cpu.halted() {
                return;
            }
            self.cpu.step(&mut self.bus).expect("unexpected trap");
        }
        panic!("program did not halt within {} steps", max_steps);
    }
}
