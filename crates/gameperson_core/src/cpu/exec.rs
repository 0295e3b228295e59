mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use crate::error::StepError;

use super::{Bus, Cpu};

impl Cpu {
    /// Decode and execute one opcode whose byte has already been fetched,
    /// returning its cycle cost.
    ///
    /// Operand bytes are consumed through `fetch8`/`fetch16`, so PC ends up
    /// past the whole instruction unless the instruction loads PC itself.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32, StepError> {
        match opcode {
            0x00 => Ok(4),

            // LD rr,d16
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(bus, opcode),

            // LD (BC/DE/HL+/HL-),A and LD A,(BC/DE/HL+/HL-)
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),

            // INC rr / DEC rr
            0x03 | 0x13 | 0x23 | 0x33 => Ok(self.exec_inc16_rr(opcode)),
            0x0B | 0x1B | 0x2B | 0x3B => Ok(self.exec_dec16_rr(opcode)),

            // INC r / DEC r
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                self.exec_inc8_reg(bus, opcode)
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                self.exec_dec8_reg(bus, opcode)
            }

            // LD r,d8
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(bus, opcode)
            }

            // RLCA / RRCA / RLA / RRA
            0x07 | 0x0F | 0x17 | 0x1F => Ok(self.exec_rotate_a(opcode)),

            0x08 => self.exec_ld_a16_sp(bus),

            // ADD HL,rr
            0x09 | 0x19 | 0x29 | 0x39 => Ok(self.exec_add_hl_rr(opcode)),

            0x10 => self.exec_stop(bus),

            // JR r8 / JR cc,r8
            0x18 => self.jr(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => self.exec_jr_cc(bus, opcode),

            0x27 => Ok(self.exec_daa()),
            0x2F => Ok(self.exec_cpl()),
            0x37 => Ok(self.exec_scf()),
            0x3F => Ok(self.exec_ccf()),

            // LD r,r' and HALT (0x76)
            0x40..=0x7F => self.exec_ld_rr_or_halt(bus, opcode),

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r
            0x80..=0xBF => self.exec_alu_reg_group(bus, opcode),

            // RET cc / RET / RETI
            0xC0 | 0xC8 | 0xD0 | 0xD8 => self.exec_ret_cc(bus, opcode),
            0xC9 => self.exec_ret(bus),
            0xD9 => self.exec_reti(bus),

            // POP rr / PUSH rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop_rr(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push_rr(bus, opcode),

            // JP cc,a16 / JP a16 / JP (HL)
            0xC2 | 0xCA | 0xD2 | 0xDA => self.exec_jp_cc(bus, opcode),
            0xC3 => self.jp_cond(bus, true),
            0xE9 => Ok(self.exec_jp_hl()),

            // CALL cc,a16 / CALL a16
            0xC4 | 0xCC | 0xD4 | 0xDC => self.exec_call_cc(bus, opcode),
            0xCD => self.call_cond(bus, true),

            // ALU A,d8
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                self.exec_alu_imm(bus, opcode)
            }

            // RST n
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.exec_rst(bus, opcode)
            }

            0xCB => self.step_cb(bus),

            // LDH (a8),A / LDH A,(a8)
            0xE0 | 0xF0 => self.exec_ldh_a8(bus, opcode),

            // LD (C),A / LD A,(C)
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),

            0xE8 => self.exec_add_sp_r8(bus),
            0xF8 => self.exec_ld_hl_sp_r8(bus),
            0xF9 => Ok(self.exec_ld_sp_hl()),

            // LD (a16),A / LD A,(a16)
            0xEA | 0xFA => self.exec_ld_a16_a(bus, opcode),

            0xF3 => Ok(self.exec_di(bus)),
            0xFB => Ok(self.exec_ei(bus)),

            // Opcode holes: D3 DB DD E3 E4 EB EC ED F4 FC FD.
            _ => {
                let pc = self.regs.pc.wrapping_sub(1);
                self.regs.pc = pc;
                Err(StepError::UnknownOpcode { opcode, pc })
            }
        }
    }
}
