use crate::cpu::{Bus, Cpu, Reg8};
use crate::error::StepError;

impl Cpu {
    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let value = self.fetch16(bus)?;
        self.write_rp(opcode >> 4, value);
        Ok(12)
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let dst = Reg8::from_bits(opcode >> 3);
        let value = self.fetch8(bus)?;
        self.write_reg8(bus, dst, value)?;
        Ok(if dst.is_memory() { 12 } else { 8 })
    }

    /// `0x40..=0x7F`: register-to-register loads, with `0x76` as HALT.
    pub(super) fn exec_ld_rr_or_halt<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
    ) -> Result<u32, StepError> {
        if opcode == 0x76 {
            return Ok(self.exec_halt());
        }

        let dst = Reg8::from_bits(opcode >> 3);
        let src = Reg8::from_bits(opcode);
        let value = self.read_reg8(bus, src)?;
        self.write_reg8(bus, dst, value)?;

        Ok(if dst.is_memory() || src.is_memory() { 8 } else { 4 })
    }

    /// Address for the `(BC)`, `(DE)`, `(HL+)` and `(HL-)` forms, applying
    /// the HL post-increment or post-decrement.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match opcode >> 4 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
    ) -> Result<u32, StepError> {
        let addr = self.indirect_addr(opcode);
        self.store8(bus, addr, self.regs.a)?;
        Ok(8)
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
    ) -> Result<u32, StepError> {
        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr)?;
        Ok(8)
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let addr = self.fetch16(bus)?;
        self.store16(bus, addr, self.regs.sp)?;
        Ok(20)
    }

    /// `LDH (a8),A` (0xE0) and `LDH A,(a8)` (0xF0).
    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let addr = 0xFF00 | u16::from(self.fetch8(bus)?);
        if opcode == 0xE0 {
            self.store8(bus, addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(12)
    }

    /// `LD (C),A` (0xE2) and `LD A,(C)` (0xF2).
    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let addr = 0xFF00 | u16::from(self.regs.c);
        if opcode == 0xE2 {
            self.store8(bus, addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(8)
    }

    /// `LD (a16),A` (0xEA) and `LD A,(a16)` (0xFA).
    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let addr = self.fetch16(bus)?;
        if opcode == 0xEA {
            self.store8(bus, addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(16)
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        8
    }
}
