use crate::cpu::{Bus, Cpu, Flag};
use crate::error::StepError;

impl Cpu {
    /// Branch condition encoded in bits 3-4: NZ, Z, NC, C.
    fn cc_condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }

    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let cond = self.cc_condition(opcode);
        self.jr(bus, cond)
    }

    pub(super) fn exec_jp_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let cond = self.cc_condition(opcode);
        self.jp_cond(bus, cond)
    }

    pub(super) fn exec_jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        4
    }

    pub(super) fn exec_call_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let cond = self.cc_condition(opcode);
        self.call_cond(bus, cond)
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        self.regs.pc = self.pop_u16(bus)?;
        Ok(16)
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let cond = self.cc_condition(opcode);
        self.ret_cond(bus, cond)
    }

    /// RET and re-enable interrupts. Unlike EI there is no delay: a request
    /// still pending is taken at the start of the next step.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        self.regs.pc = self.pop_u16(bus)?;
        bus.interrupts().enable_now();
        Ok(16)
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        let ret = self.regs.pc;
        self.push_u16(bus, ret)?;
        self.regs.pc = u16::from(opcode & 0x38);
        Ok(16)
    }
}
