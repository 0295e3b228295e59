use crate::error::{BusError, StepError};

use super::{Bus, Cpu};

/// 8-bit operand selected by a 3-bit field of an opcode.
///
/// The encoding is shared by `LD r,r'`, the ALU group, `INC/DEC r` and the
/// whole CB family: 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte in memory at the address held in HL.
    HlIndirect,
    A,
}

impl Reg8 {
    /// Decode the low three bits of `bits`.
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::HlIndirect,
            _ => Reg8::A,
        }
    }

    #[inline]
    pub fn is_memory(self) -> bool {
        self == Reg8::HlIndirect
    }
}

impl Cpu {
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> Result<u8, StepError> {
        Ok(match reg {
            Reg8::B => self.regs.b,
            Reg8::C => self.regs.c,
            Reg8::D => self.regs.d,
            Reg8::E => self.regs.e,
            Reg8::H => self.regs.h,
            Reg8::L => self.regs.l,
            Reg8::HlIndirect => bus.read8(self.regs.hl())?,
            Reg8::A => self.regs.a,
        })
    }

    #[inline]
    pub(super) fn write_reg8<B: Bus>(
        &mut self,
        bus: &mut B,
        reg: Reg8,
        value: u8,
    ) -> Result<(), StepError> {
        match reg {
            Reg8::B => self.regs.b = value,
            Reg8::C => self.regs.c = value,
            Reg8::D => self.regs.d = value,
            Reg8::E => self.regs.e = value,
            Reg8::H => self.regs.h = value,
            Reg8::L => self.regs.l = value,
            Reg8::HlIndirect => return self.store8(bus, self.regs.hl(), value),
            Reg8::A => self.regs.a = value,
        }
        Ok(())
    }

    /// Pass fatal bus errors up and log the rest.
    fn settle(&self, result: Result<(), BusError>) -> Result<(), StepError> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => Err(err.into()),
            Err(err) => {
                log::warn!("{err} (PC=0x{:04X})", self.regs.pc);
                Ok(())
            }
        }
    }

    #[inline]
    pub(super) fn store8<B: Bus>(
        &mut self,
        bus: &mut B,
        addr: u16,
        value: u8,
    ) -> Result<(), StepError> {
        let result = bus.write8(addr, value);
        self.settle(result)
    }

    #[inline]
    pub(super) fn store16<B: Bus>(
        &mut self,
        bus: &mut B,
        addr: u16,
        value: u16,
    ) -> Result<(), StepError> {
        let result = bus.write16(addr, value);
        self.settle(result)
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> Result<u8, StepError> {
        let value = bus.read8(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> Result<u16, StepError> {
        let value = bus.read16(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(2);
        Ok(value)
    }

    /// Decrement SP by two, then write `value` at the new SP.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<(), StepError> {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        self.store16(bus, self.regs.sp, value)
    }

    /// Read the word at SP, then increment SP by two.
    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> Result<u16, StepError> {
        let value = bus.read16(self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(2);
        Ok(value)
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is added to the address following the operand.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32, StepError> {
        let offset = self.fetch8(bus)? as i8;
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add_signed(i16::from(offset));
            Ok(12)
        } else {
            Ok(8)
        }
    }

    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32, StepError> {
        let addr = self.fetch16(bus)?;
        if cond {
            self.regs.pc = addr;
            Ok(16)
        } else {
            Ok(12)
        }
    }

    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32, StepError> {
        let addr = self.fetch16(bus)?;
        if cond {
            let ret = self.regs.pc;
            self.push_u16(bus, ret)?;
            self.regs.pc = addr;
            Ok(24)
        } else {
            Ok(12)
        }
    }

    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32, StepError> {
        if cond {
            self.regs.pc = self.pop_u16(bus)?;
            Ok(20)
        } else {
            Ok(8)
        }
    }

    /// 16-bit register pair selected by bits 4-5 of an opcode, with SP as
    /// the fourth entry.
    pub(super) fn read_rp(&self, bits: u8) -> u16 {
        match bits & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    pub(super) fn write_rp(&mut self, bits: u8, value: u16) {
        match bits & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }
}
