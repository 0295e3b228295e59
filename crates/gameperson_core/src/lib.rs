pub mod cpu;
pub mod error;
pub mod machine;

pub use cpu::{Bus, Cpu};
pub use error::{BusError, LoadError, StepError};
pub use machine::{
    AddressBus, Console, DisplayController, FrameTiming, Interrupt, InterruptController,
    LcdControl, Palette, Shade,
};

/// Visible screen width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Visible screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
