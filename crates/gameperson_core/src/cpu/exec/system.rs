use crate::cpu::{Bus, Cpu};
use crate::error::StepError;

impl Cpu {
    pub(super) fn exec_halt(&mut self) -> u32 {
        self.halted = true;
        4
    }

    /// STOP is treated like HALT: the core has no joypad wake-up or speed
    /// switch, so the CPU just sleeps until an enabled interrupt is pending.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> Result<u32, StepError> {
        let _padding = self.fetch8(bus)?;
        self.halted = true;
        Ok(4)
    }

    pub(super) fn exec_di<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.interrupts().set_ime(false);
        4
    }

    /// The enable only becomes visible to the interrupt check once it has
    /// been latched, so delivery starts one instruction later.
    pub(super) fn exec_ei<B: Bus>(&mut self, bus: &mut B) -> u32 {
        bus.interrupts().set_ime(true);
        4
    }
}
