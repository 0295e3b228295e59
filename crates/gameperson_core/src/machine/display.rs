use bitflags::bitflags;

use crate::error::{Access, BusError, Feature};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

mod palette;
mod render;

pub use palette::{ObjectPalette, Palette, Shade};

/// First address of the LCD register block; register offsets are relative
/// to it.
pub const LCD_REGISTER_BASE: u16 = 0xFF40;

/// Last scanline; `step` holds here until the next frame starts.
const LAST_SCANLINE: u8 = 153;
/// First line of the vertical blanking period.
const VBLANK_SCANLINE: u8 = 144;

const REG_LCDC: u8 = 0x0;
const REG_STAT: u8 = 0x1;
const REG_SCY: u8 = 0x2;
const REG_SCX: u8 = 0x3;
const REG_LY: u8 = 0x4;
const REG_BGP: u8 = 0x7;
const REG_OBP0: u8 = 0x8;
const REG_OBP1: u8 = 0x9;
const REG_WY: u8 = 0xA;
const REG_WX: u8 = 0xB;

bitflags! {
    /// LCDC (`0xFF40`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const DISPLAY_ENABLE = 1 << 7;
        const WINDOW_TILE_MAP = 1 << 6;
        const WINDOW_ENABLE = 1 << 5;
        /// Set: tiles are read from `0x8000` with unsigned indices.
        const TILE_DATA = 1 << 4;
        /// Set: the background uses the map at `0x9C00` instead of `0x9800`.
        const BG_TILE_MAP = 1 << 3;
        const OBJ_SIZE = 1 << 2;
        const OBJ_ENABLE = 1 << 1;
        const BG_ENABLE = 1 << 0;
    }
}

/// LCD registers, the scanline counter and the background renderer.
///
/// Video RAM belongs to the address bus and is passed in wherever a redraw
/// can happen. Scroll and BGP writes redraw the background immediately.
#[derive(Clone)]
pub struct DisplayController {
    lcdc: LcdControl,
    stat_select: u8,
    scroll_y: u8,
    scroll_x: u8,
    scanline: u8,
    bgp: u8,
    bg_palette: Palette,
    obp: [u8; 2],
    obj_palettes: [ObjectPalette; 2],
    window_y: u8,
    window_x: u8,
    framebuffer: Vec<u32>,
}

impl Default for DisplayController {
    fn default() -> Self {
        Self {
            lcdc: LcdControl::empty(),
            stat_select: 0,
            scroll_y: 0,
            scroll_x: 0,
            scanline: 0,
            bgp: 0,
            bg_palette: Palette::default(),
            obp: [0; 2],
            obj_palettes: [ObjectPalette::default(); 2],
            window_y: 0,
            window_x: 0,
            framebuffer: vec![Shade::White.rgba(); SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl DisplayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the register at `0xFF40 + offset`.
    pub fn read(&self, offset: u8) -> Result<u8, BusError> {
        Ok(match offset {
            REG_LCDC => self.lcdc.bits(),
            REG_STAT => 0x80 | (self.stat_select & 0x78) | self.mode(),
            REG_SCY => self.scroll_y,
            REG_SCX => self.scroll_x,
            REG_LY => self.scanline,
            REG_BGP => self.bgp,
            REG_OBP0 => self.obp[0],
            REG_OBP1 => self.obp[1],
            REG_WY => self.window_y,
            REG_WX => self.window_x,
            _ => return Err(unimplemented(offset, Access::Read, Feature::LcdRegister(offset))),
        })
    }

    /// Write the register at `0xFF40 + offset`, redrawing from `vram` when
    /// the visible background changes.
    pub(crate) fn write(&mut self, offset: u8, value: u8, vram: &[u8]) -> Result<(), BusError> {
        match offset {
            REG_LCDC => {
                let lcdc = LcdControl::from_bits_retain(value);
                if lcdc != self.lcdc {
                    log::debug!("LCDC {:?} -> {:?}", self.lcdc, lcdc);
                }
                self.lcdc = lcdc;
            }
            REG_STAT => self.stat_select = value & 0x78,
            REG_SCY => {
                self.scroll_y = value;
                return self.redraw(offset, vram);
            }
            REG_SCX => {
                self.scroll_x = value;
                return self.redraw(offset, vram);
            }
            REG_LY => {
                return Err(unimplemented(offset, Access::Write, Feature::ScanlineWrite));
            }
            REG_BGP => {
                self.bgp = value;
                self.bg_palette = Palette::from_register(value);
                return self.redraw(offset, vram);
            }
            REG_OBP0 | REG_OBP1 => {
                let slot = usize::from(offset - REG_OBP0);
                self.obp[slot] = value;
                self.obj_palettes[slot] = ObjectPalette::from_register(value);
            }
            REG_WY => self.window_y = value,
            REG_WX => self.window_x = value,
            _ => {
                return Err(unimplemented(offset, Access::Write, Feature::LcdRegister(offset)));
            }
        }
        Ok(())
    }

    /// Redraw the background from `vram` (the full 8 KiB block) with the
    /// current registers. Callers outside the crate go through
    /// `AddressBus::refresh_display`, which owns VRAM.
    pub(crate) fn refresh(&mut self, vram: &[u8]) -> Result<(), BusError> {
        self.redraw(REG_LCDC, vram)
    }

    fn redraw(&mut self, offset: u8, vram: &[u8]) -> Result<(), BusError> {
        self.render_background(vram)
            .map_err(|feature| unimplemented(offset, Access::Write, feature))
    }

    pub fn start_frame(&mut self) {
        self.scanline = 0;
    }

    /// Advance one scanline. Returns true when this step entered VBlank.
    pub fn step(&mut self) -> bool {
        if self.scanline >= LAST_SCANLINE {
            return false;
        }
        self.scanline += 1;
        self.scanline == VBLANK_SCANLINE
    }

    pub fn scanline(&self) -> u8 {
        self.scanline
    }

    /// STAT mode bits: 1 during VBlank, 0 otherwise.
    fn mode(&self) -> u8 {
        u8::from(self.scanline >= VBLANK_SCANLINE)
    }

    pub fn lcd_control(&self) -> LcdControl {
        self.lcdc
    }

    pub fn display_enabled(&self) -> bool {
        self.lcdc.contains(LcdControl::DISPLAY_ENABLE)
    }

    pub fn bg_enabled(&self) -> bool {
        self.lcdc.contains(LcdControl::BG_ENABLE)
    }

    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn bg_palette(&self) -> Palette {
        self.bg_palette
    }

    pub fn obj_palette(&self, index: usize) -> Option<ObjectPalette> {
        self.obj_palettes.get(index).copied()
    }

    /// Packed RGBA8888 pixels, row-major, `SCREEN_WIDTH * SCREEN_HEIGHT`
    /// entries.
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }
}

fn unimplemented(offset: u8, access: Access, feature: Feature) -> BusError {
    BusError::Unimplemented {
        addr: LCD_REGISTER_BASE + u16::from(offset),
        access,
        feature,
    }
}
