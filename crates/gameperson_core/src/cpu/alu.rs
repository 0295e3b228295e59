use super::{Cpu, Flag};

/// The eight accumulator operations, in opcode order (bits 3-5 of both
/// `0x80..=0xBF` and the `d8` immediate forms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    #[inline]
    pub(super) fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

impl Cpu {
    /// Apply `op` to A and `value`, updating A (except for CP) and all four
    /// flags.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        let carry_in = u8::from(self.get_flag(Flag::C));

        let (result, n, h, c) = match op {
            AluOp::Add | AluOp::Adc => {
                let carry = if op == AluOp::Adc { carry_in } else { 0 };
                let wide = u16::from(a) + u16::from(value) + u16::from(carry);
                let half = (a & 0x0F) + (value & 0x0F) + carry > 0x0F;
                (wide as u8, false, half, wide > 0xFF)
            }
            AluOp::Sub | AluOp::Sbc | AluOp::Cp => {
                let borrow = if op == AluOp::Sbc { carry_in } else { 0 };
                let wide = i16::from(a) - i16::from(value) - i16::from(borrow);
                let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - i16::from(borrow) < 0;
                (wide as u8, true, half, wide < 0)
            }
            AluOp::And => (a & value, false, true, false),
            AluOp::Xor => (a ^ value, false, false, false),
            AluOp::Or => (a | value, false, false, false),
        };

        if op != AluOp::Cp {
            self.regs.a = result;
        }
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, n);
        self.set_flag(Flag::H, h);
        self.set_flag(Flag::C, c);
    }

    /// INC r / INC (HL). C is left alone.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (value & 0x0F) == 0x0F);
        result
    }

    /// DEC r / DEC (HL). C is left alone.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (value & 0x0F) == 0);
        result
    }

    /// ADD HL,rr. Z is preserved.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let (result, carry) = hl.overflowing_add(value);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, carry);
        self.regs.set_hl(result);
    }

    /// SP plus a signed immediate, shared by `ADD SP,r8` and `LD HL,SP+r8`.
    /// H and C come from the unsigned addition of the low byte.
    pub(super) fn alu_add_sp_signed(&mut self, imm8: u8) -> u16 {
        let sp = self.regs.sp;
        let offset = imm8 as i8 as i16 as u16;
        self.clear_flags();
        self.set_flag(Flag::H, (sp & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flag::C, (sp & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        sp.wrapping_add(offset)
    }

    /// DAA: correct A to packed BCD after an addition or subtraction.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust = 0u8;
        let mut carry = self.get_flag(Flag::C);

        if self.get_flag(Flag::H) || (!self.get_flag(Flag::N) && (a & 0x0F) > 0x09) {
            adjust |= 0x06;
        }
        if carry || (!self.get_flag(Flag::N) && a > 0x99) {
            adjust |= 0x60;
            carry = true;
        }

        a = if self.get_flag(Flag::N) {
            a.wrapping_sub(adjust)
        } else {
            a.wrapping_add(adjust)
        };

        self.regs.a = a;
        self.set_flag(Flag::Z, a == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, carry);
    }
}
