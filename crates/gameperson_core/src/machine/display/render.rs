use crate::error::Feature;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::{DisplayController, LcdControl, Shade};

const TILE_MAP_LOW: usize = 0x1800;
const TILE_MAP_HIGH: usize = 0x1C00;
const TILE_BYTES: usize = 16;
const MAP_TILES: usize = 32;

// Visible area in tiles plus one extra row/column for a partial tile at
// either edge when the scroll is not a multiple of 8.
const TILES_ACROSS: usize = SCREEN_WIDTH / 8 + 1;
const TILES_DOWN: usize = SCREEN_HEIGHT / 8 + 1;

impl DisplayController {
    /// Redraw the background layer into the framebuffer.
    ///
    /// `vram` is the 8 KiB block mapped at `0x8000`. Only the unsigned tile
    /// data table at `0x8000` is supported; with LCDC bit 4 clear the
    /// framebuffer is left as it was and the missing feature is returned.
    pub(super) fn render_background(&mut self, vram: &[u8]) -> Result<(), Feature> {
        if !self.lcdc.contains(LcdControl::TILE_DATA) {
            return Err(Feature::SignedTileData);
        }

        self.framebuffer.fill(Shade::White.rgba());

        let map_base = if self.lcdc.contains(LcdControl::BG_TILE_MAP) {
            TILE_MAP_HIGH
        } else {
            TILE_MAP_LOW
        };
        let first_row = usize::from(self.scroll_y / 8);
        let first_col = usize::from(self.scroll_x / 8);

        for tile_y in 0..TILES_DOWN {
            let row = (first_row + tile_y) % MAP_TILES;
            for tile_x in 0..TILES_ACROSS {
                let col = (first_col + tile_x) % MAP_TILES;
                let tile = usize::from(vram[map_base + row * MAP_TILES + col]);
                let data = &vram[tile * TILE_BYTES..(tile + 1) * TILE_BYTES];
                self.draw_tile(data, row, col);
            }
        }

        Ok(())
    }

    fn draw_tile(&mut self, data: &[u8], row: usize, col: usize) {
        for (py, planes) in data.chunks_exact(2).enumerate() {
            let (lo, hi) = (planes[0], planes[1]);
            // Background space is 256x256 and wraps, so u8 arithmetic does
            // the wrapping for us.
            let bg_y = (row * 8 + py) as u8;
            let y = usize::from(bg_y.wrapping_sub(self.scroll_y));
            if y >= SCREEN_HEIGHT {
                continue;
            }

            for bit in 0..8 {
                let index = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
                if index == 0 {
                    continue;
                }
                // Bit 7 is the leftmost pixel.
                let bg_x = (col * 8 + 7 - bit) as u8;
                let x = usize::from(bg_x.wrapping_sub(self.scroll_x));
                if x < SCREEN_WIDTH {
                    self.framebuffer[y * SCREEN_WIDTH + x] = self.bg_palette.shade(index).rgba();
                }
            }
        }
    }
}
