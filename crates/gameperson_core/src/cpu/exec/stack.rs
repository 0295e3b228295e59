use crate::cpu::{Bus, Cpu};
use crate::error::StepError;

impl Cpu {
    /// `PUSH BC/DE/HL/AF`.
    pub(super) fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        };
        self.push_u16(bus, value)?;
        Ok(16)
    }

    /// `POP BC/DE/HL/AF`. The low nibble of F always reads back as zero.
    pub(super) fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let value = self.pop_u16(bus)?;
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.set_af(value),
        }
        Ok(12)
    }
}
