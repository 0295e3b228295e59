use crate::cpu::alu::AluOp;
use crate::cpu::{Bus, Cpu, Flag, Reg8};
use crate::error::StepError;

impl Cpu {
    pub(super) fn exec_alu_reg_group<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
    ) -> Result<u32, StepError> {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let src = Reg8::from_bits(opcode);
        let value = self.read_reg8(bus, src)?;
        self.alu(AluOp::from_bits(opcode >> 3), value);

        Ok(if src.is_memory() { 8 } else { 4 })
    }

    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let value = self.fetch8(bus)?;
        self.alu(AluOp::from_bits(opcode >> 3), value);
        Ok(8)
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.read_rp(opcode >> 4);
        self.alu_add16_hl(value);
        8
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let imm = self.fetch8(bus)?;
        self.regs.sp = self.alu_add_sp_signed(imm);
        Ok(16)
    }

    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let imm = self.fetch8(bus)?;
        let result = self.alu_add_sp_signed(imm);
        self.regs.set_hl(result);
        Ok(12)
    }

    pub(super) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        4
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        4
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        4
    }

    pub(super) fn exec_ccf(&mut self) -> u32 {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        4
    }
}
