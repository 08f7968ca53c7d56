//! Memory opcodes: `LD`, `ST`. Both use M-form addressing, `base + off6`.

use super::Cpu;
use crate::bus::Bus;
use crate::constants::NEGATIVE_BIT;
use crate::encode::decode_m;

fn effective_address(cpu: &Cpu, word: u16) -> (usize, usize, u16) {
    let (rd_or_rs, base, off) = decode_m(word);
    let addr = (cpu.reg(base) as i32 + off as i32) as u16;
    (rd_or_rs, base, addr)
}

/// `LD rd, base, off6`. Updates `Z`/`N` from the loaded value; leaves
/// `C`/`V` exactly as they were, since a load carries no arithmetic of its
/// own to report.
pub fn exec_ld(cpu: &mut Cpu, bus: &Bus, word: u16) {
    let (rd, _base, addr) = effective_address(cpu, word);
    let value = bus.load16(addr);
    cpu.set_reg(rd, value);
    cpu.flags.z = value == 0;
    cpu.flags.n = value & NEGATIVE_BIT != 0;
}

/// `ST rs, base, off6`. Touches no flags.
pub fn exec_st(cpu: &mut Cpu, bus: &mut Bus, word: u16) {
    let (rs, _base, addr) = effective_address(cpu, word);
    let value = cpu.reg(rs);
    bus.store16(addr, value);
}
