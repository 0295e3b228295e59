use crate::cpu::{Bus, Cpu, Reg8};
use crate::error::StepError;

impl Cpu {
    pub(super) fn exec_inc8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let reg = Reg8::from_bits(opcode >> 3);
        let value = self.read_reg8(bus, reg)?;
        let result = self.alu_inc8(value);
        self.write_reg8(bus, reg, result)?;
        Ok(if reg.is_memory() { 12 } else { 4 })
    }

    pub(super) fn exec_dec8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let reg = Reg8::from_bits(opcode >> 3);
        let value = self.read_reg8(bus, reg)?;
        let result = self.alu_dec8(value);
        self.write_reg8(bus, reg, result)?;
        Ok(if reg.is_memory() { 12 } else { 4 })
    }

    pub(super) fn exec_inc16_rr(&mut self, opcode: u8) -> u32 {
        let bits = opcode >> 4;
        let value = self.read_rp(bits).wrapping_add(1);
        self.write_rp(bits, value);
        8
    }

    pub(super) fn exec_dec16_rr(&mut self, opcode: u8) -> u32 {
        let bits = opcode >> 4;
        let value = self.read_rp(bits).wrapping_sub(1);
        self.write_rp(bits, value);
        8
    }
}
