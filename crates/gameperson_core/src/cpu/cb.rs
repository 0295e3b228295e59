use crate::error::StepError;

use super::{Bus, Cpu, Flag, Reg8};

impl Cpu {
    /// Execute a `0xCB`-prefixed instruction. The prefix byte has already
    /// been fetched.
    ///
    /// Layout of the second byte: bits 6-7 pick the group (shift/rotate,
    /// BIT, RES, SET), bits 3-5 the operation or bit index and bits 0-2 the
    /// operand.
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let cb = self.fetch8(bus)?;
        let reg = Reg8::from_bits(cb);
        let y = (cb >> 3) & 0x07;
        let value = self.read_reg8(bus, reg)?;

        match cb >> 6 {
            0 => {
                let result = self.shift_rotate(y, value);
                self.write_reg8(bus, reg, result)?;
                Ok(if reg.is_memory() { 16 } else { 8 })
            }
            1 => {
                // BIT b,r: C is preserved.
                self.set_flag(Flag::Z, value & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                Ok(if reg.is_memory() { 12 } else { 8 })
            }
            2 => {
                self.write_reg8(bus, reg, value & !(1 << y))?;
                Ok(if reg.is_memory() { 16 } else { 8 })
            }
            _ => {
                self.write_reg8(bus, reg, value | (1 << y))?;
                Ok(if reg.is_memory() { 16 } else { 8 })
            }
        }
    }

    /// RLC, RRC, RL, RR, SLA, SRA, SWAP, SRL selected by `op` (0-7).
    fn shift_rotate(&mut self, op: u8, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match op {
            0 => (value.rotate_left(1), value & 0x80 != 0),
            1 => (value.rotate_right(1), value & 0x01 != 0),
            2 => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            3 => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            4 => (value << 1, value & 0x80 != 0),
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            6 => (value.rotate_left(4), false),
            _ => (value >> 1, value & 0x01 != 0),
        };

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry);
        result
    }

    /// RLCA, RRCA, RLA, RRA. Same as their CB counterparts on A, except Z
    /// is always cleared.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));
        let a = self.regs.a;
        self.regs.a = self.shift_rotate((opcode >> 3) & 0x03, a);
        self.set_flag(Flag::Z, false);
        4
    }
}
