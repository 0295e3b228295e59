mod alu;
mod cb;
mod exec;
mod helpers;
mod interrupts;
mod regs;

pub use helpers::Reg8;
pub use regs::{Flag, Registers};

use crate::error::{BusError, StepError};
use crate::machine::InterruptController;

/// The CPU's view of the address space.
///
/// Reads are fallible because an unmapped read has no sensible value to
/// return. Writes report problems too, but the CPU only stops on the ones
/// flagged by [`BusError::is_fatal`].
pub trait Bus {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Little-endian 16-bit read. Each byte goes through `read8` on its own,
    /// so an access straddling two regions reads each half from its region.
    fn read16(&mut self, addr: u16) -> Result<u16, BusError> {
        let lo = self.read8(addr)?;
        let hi = self.read8(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Little-endian 16-bit write. Both bytes are attempted even if the
    /// first one reports a non-fatal error; the first error is returned.
    fn write16(&mut self, addr: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        let low = self.write8(addr, lo);
        let high = self.write8(addr.wrapping_add(1), hi);
        low.and(high)
    }

    /// Interrupt state consulted once per instruction step.
    fn interrupts(&mut self) -> &mut InterruptController;
}

/// Instruction execution engine.
///
/// Registers start zeroed; the boot ROM at `0x0000` is responsible for
/// bringing the machine into a usable state.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
    /// Set by HALT/STOP. Fetching resumes once an enabled interrupt is
    /// pending.
    pub halted: bool,
    /// Running total of T-cycles consumed by `step`.
    pub cycles: u64,
    /// Set after `step` fails. A locked CPU refuses to run but keeps its
    /// state for inspection.
    locked: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    /// Load the register state the boot ROM leaves behind when it jumps to
    /// the cartridge entry point.
    pub(crate) fn apply_post_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0;
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
    }

    /// Execute one instruction and return the T-cycles it took.
    ///
    /// Order within a step is fixed: pending interrupts are evaluated
    /// against the previous step's IME, the current IME is latched, then
    /// one opcode is fetched, executed and charged to `cycles`. Any error
    /// locks the CPU; later calls return [`StepError::Locked`].
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        if self.locked {
            return Err(StepError::Locked { pc: self.regs.pc });
        }

        match self.step_instruction(bus) {
            Ok(cycles) => {
                self.cycles += u64::from(cycles);
                Ok(cycles)
            }
            Err(err) => {
                self.locked = true;
                log::error!(
                    "CPU locked: {err} (PC=0x{pc:04X} SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                    pc = self.regs.pc,
                    sp = self.regs.sp,
                    af = self.regs.af(),
                    bc = self.regs.bc(),
                    de = self.regs.de(),
                    hl = self.regs.hl(),
                );
                Err(err)
            }
        }
    }

    fn step_instruction<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let mut cycles = self.handle_interrupts(bus)?;
        bus.interrupts().latch_ime();

        if self.halted {
            if !bus.interrupts().has_enabled_pending() {
                return Ok(cycles + 4);
            }
            self.halted = false;
        }

        let opcode = self.fetch8(bus)?;
        log::trace!(
            "PC=0x{:04X} opcode=0x{opcode:02X}",
            self.regs.pc.wrapping_sub(1)
        );
        cycles += self.exec_opcode(bus, opcode)?;
        Ok(cycles)
    }
}
