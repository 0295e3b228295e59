use crate::error::BusError;

use super::AddressBus;

impl AddressBus {
    /// Reads resolve the boot ROM overlay first, then the cartridge image
    /// for every address up to and including its length, then the fixed
    /// regions. A cartridge longer than 32 KiB shadows whatever lies below
    /// its end. The byte at exactly `len` has no backing and is unmapped.
    pub(super) fn mmio_read(&mut self, addr: u16) -> Result<u8, BusError> {
        let boot_overlay = addr < 0x0100 && self.boot_rom_enabled;
        if !boot_overlay && usize::from(addr) <= self.cartridge.len() {
            return self
                .cartridge
                .get(usize::from(addr))
                .copied()
                .ok_or(BusError::UnmappedRead { addr });
        }

        let value = match addr {
            0x0000..=0x00FF if boot_overlay => self.boot_rom[addr as usize],

            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize],
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            // Echo RAM mirrors the first 7.5 KiB of work RAM.
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],

            // No joypad: every line reads as released.
            0xFF00 => 0xFF,
            0xFF0F => self.interrupts.read_flags(),
            0xFFFF => self.interrupts.read_enable(),
            0xFF40..=0xFF4F => return self.display.read(Self::lcd_offset(addr)),

            _ => return Err(BusError::UnmappedRead { addr }),
        };
        Ok(value)
    }

    /// Writes only reach the fixed regions; the cartridge is read-only, so
    /// its size plays no part here.
    pub(super) fn mmio_write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match addr {
            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize] = value,
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = value,
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = value,

            0xFF00 => {}
            0xFF0F => self.interrupts.write_flags(value),
            0xFFFF => self.interrupts.write_enable(value),
            0xFF40..=0xFF4F => {
                return self
                    .display
                    .write(Self::lcd_offset(addr), value, &self.vram[..]);
            }

            // Once unmapped the boot ROM stays unmapped.
            0xFF50 => {
                if value == 1 && self.boot_rom_enabled {
                    self.boot_rom_enabled = false;
                    log::debug!("boot ROM unmapped");
                }
            }

            // ROM, cartridge RAM, OAM and the remaining I/O ports.
            _ => return Err(BusError::UnmappedWrite { addr, value }),
        }
        Ok(())
    }
}
