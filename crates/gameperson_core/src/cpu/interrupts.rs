use crate::error::StepError;

use super::{Bus, Cpu};

impl Cpu {
    /// Dispatch the highest-priority pending interrupt, if any is deliverable.
    ///
    /// Returns the cycles spent: 20 for a dispatch, 0 otherwise.
    pub(super) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let Some(kind) = bus.interrupts().poll() else {
            return Ok(0);
        };

        self.halted = false;
        let ret = self.regs.pc;
        self.push_u16(bus, ret)?;
        self.regs.pc = kind.vector();
        log::debug!("dispatch {kind:?} from 0x{ret:04X} to 0x{:04X}", self.regs.pc);

        Ok(20)
    }
}
