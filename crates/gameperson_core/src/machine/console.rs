use crate::cpu::{Bus, Cpu};
use crate::error::{LoadError, StepError};

use super::display::DisplayController;
use super::interrupts::Interrupt;
use super::AddressBus;

/// Cycle budget the frame loop hands out per scanline and per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    pub cycles_per_scanline: u32,
    pub scanlines_per_frame: u32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            cycles_per_scanline: 456,
            scanlines_per_frame: 154,
        }
    }
}

impl FrameTiming {
    pub fn cycles_per_frame(&self) -> u64 {
        u64::from(self.cycles_per_scanline) * u64::from(self.scanlines_per_frame)
    }
}

/// A whole machine: the CPU and the bus it drives.
#[derive(Clone)]
pub struct Console {
    pub cpu: Cpu,
    bus: AddressBus,
}

impl Console {
    /// Power on with `boot_rom` mapped, starting at `0x0000`.
    pub fn new(boot_rom: &[u8], cartridge: Vec<u8>) -> Result<Self, LoadError> {
        Ok(Self {
            cpu: Cpu::new(),
            bus: AddressBus::new(boot_rom, cartridge)?,
        })
    }

    /// Start at `0x0100` with the CPU and LCD registers the boot ROM would
    /// have left behind.
    pub fn without_boot_rom(cartridge: Vec<u8>) -> Self {
        let mut cpu = Cpu::new();
        cpu.apply_post_boot_state();
        let mut console = Self {
            cpu,
            bus: AddressBus::without_boot_rom(cartridge),
        };
        // LCDC first so the BGP redraw reads tile data from 0x8000.
        for (addr, value) in [(0xFF40, 0x91), (0xFF47, 0xFC)] {
            if let Err(err) = console.bus.write8(addr, value) {
                log::warn!("post-boot LCD setup: {err}");
            }
        }
        console
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<u32, StepError> {
        self.cpu.step(&mut self.bus)
    }

    pub fn start_frame(&mut self) {
        self.bus.display_mut().start_frame();
    }

    /// Advance the display by one line, requesting VBlank on entry to
    /// line 144.
    pub fn step_scanline(&mut self) {
        if self.bus.display_mut().step() {
            self.bus.interrupts().request(Interrupt::VBlank);
        }
    }

    /// Run one frame: reset the scanline counter, then interleave CPU steps
    /// with one display step per `cycles_per_scanline`.
    ///
    /// Returns the cycles executed. Stops at the first CPU error; the CPU is
    /// locked afterwards.
    pub fn run_frame(&mut self, timing: &FrameTiming) -> Result<u64, StepError> {
        self.start_frame();

        let per_line = u64::from(timing.cycles_per_scanline);
        let mut elapsed = 0u64;
        for line in 1..=u64::from(timing.scanlines_per_frame) {
            while elapsed < line * per_line {
                elapsed += u64::from(self.step()?);
            }
            self.step_scanline();
        }

        Ok(elapsed)
    }

    pub fn bus(&self) -> &AddressBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut AddressBus {
        &mut self.bus
    }

    pub fn display(&self) -> &DisplayController {
        self.bus.display()
    }

    pub fn framebuffer(&self) -> &[u32] {
        self.bus.display().framebuffer()
    }

    /// Copy the framebuffer into `buffer` as packed RGB24.
    ///
    /// `buffer` should hold `SCREEN_WIDTH * SCREEN_HEIGHT * 3` bytes; a
    /// shorter buffer receives only the leading pixels.
    pub fn video_frame(&self, buffer: &mut [u8]) {
        for (dst, &pixel) in buffer.chunks_exact_mut(3).zip(self.framebuffer()) {
            let [r, g, b, _] = pixel.to_le_bytes();
            dst.copy_from_slice(&[r, g, b]);
        }
    }
}
