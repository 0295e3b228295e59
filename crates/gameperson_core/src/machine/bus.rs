use crate::cpu::Bus;
use crate::error::{BusError, LoadError};

use super::display::{DisplayController, LCD_REGISTER_BASE};
use super::interrupts::InterruptController;
use super::BOOT_ROM_SIZE;

mod mmio;

const VRAM_SIZE: usize = 0x2000;
const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;

/// The 64 KiB address space.
///
/// Owns every byte store (boot ROM, cartridge, VRAM, WRAM, HRAM) plus the
/// display and interrupt controllers that sit behind memory-mapped
/// registers. Address decoding lives in `bus/mmio.rs`.
#[derive(Clone)]
pub struct AddressBus {
    boot_rom: Box<[u8; BOOT_ROM_SIZE]>,
    boot_rom_enabled: bool,
    cartridge: Vec<u8>,
    vram: Box<[u8; VRAM_SIZE]>,
    wram: Box<[u8; WRAM_SIZE]>,
    hram: [u8; HRAM_SIZE],
    display: DisplayController,
    interrupts: InterruptController,
    soft_faults: u64,
}

impl AddressBus {
    /// Build a bus that starts with `boot_rom` overlaid on `0x0000..0x0100`.
    ///
    /// The boot ROM must be exactly 256 bytes. The cartridge is a flat ROM
    /// image; anything past 32 KiB is never mapped.
    pub fn new(boot_rom: &[u8], cartridge: Vec<u8>) -> Result<Self, LoadError> {
        let boot_rom: [u8; BOOT_ROM_SIZE] =
            boot_rom.try_into().map_err(|_| LoadError::BootRomSize {
                len: boot_rom.len(),
                expected: BOOT_ROM_SIZE,
            })?;

        let mut bus = Self::without_boot_rom(cartridge);
        bus.boot_rom = Box::new(boot_rom);
        bus.boot_rom_enabled = true;
        Ok(bus)
    }

    /// Build a bus with the cartridge visible from `0x0000`.
    pub fn without_boot_rom(cartridge: Vec<u8>) -> Self {
        Self {
            boot_rom: Box::new([0; BOOT_ROM_SIZE]),
            boot_rom_enabled: false,
            cartridge,
            vram: Box::new([0; VRAM_SIZE]),
            wram: Box::new([0; WRAM_SIZE]),
            hram: [0; HRAM_SIZE],
            display: DisplayController::new(),
            interrupts: InterruptController::new(),
            soft_faults: 0,
        }
    }

    pub fn boot_rom_enabled(&self) -> bool {
        self.boot_rom_enabled
    }

    pub fn display(&self) -> &DisplayController {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayController {
        &mut self.display
    }

    pub fn interrupt_controller(&self) -> &InterruptController {
        &self.interrupts
    }

    pub fn vram(&self) -> &[u8] {
        &self.vram[..]
    }

    /// Redraw the background from the current VRAM contents.
    pub fn refresh_display(&mut self) -> Result<(), BusError> {
        self.display.refresh(&self.vram[..])
    }

    /// Number of non-fatal errors returned from writes so far.
    pub fn soft_faults(&self) -> u64 {
        self.soft_faults
    }

    fn lcd_offset(addr: u16) -> u8 {
        (addr - LCD_REGISTER_BASE) as u8
    }
}

impl Bus for AddressBus {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError> {
        self.mmio_read(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        let result = self.mmio_write(addr, value);
        if let Err(err) = &result {
            if !err.is_fatal() {
                self.soft_faults += 1;
            }
        }
        result
    }

    fn interrupts(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }
}
