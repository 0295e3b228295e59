mod bus;
mod console;
mod display;
mod interrupts;

pub use bus::AddressBus;
pub use console::{Console, FrameTiming};
pub use display::{DisplayController, LcdControl, ObjectPalette, Palette, Shade};
pub use interrupts::{Interrupt, InterruptController, InterruptMask};

/// Size of the boot ROM overlay mapped at `0x0000`.
pub const BOOT_ROM_SIZE: usize = 0x100;

#[cfg(test)]
mod tests;
