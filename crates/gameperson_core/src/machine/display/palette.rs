/// One of the four grey levels the LCD can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shade {
    #[default]
    White,
    LightGray,
    DarkGray,
    Black,
}

impl Shade {
    /// Decode the low two bits of a palette field.
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            _ => Shade::Black,
        }
    }

    /// Packed RGBA8888 value, stored as `u32::from_le_bytes([r, g, b, a])`.
    #[inline]
    pub fn rgba(self) -> u32 {
        let level = match self {
            Shade::White => 0xFF,
            Shade::LightGray => 0xAA,
            Shade::DarkGray => 0x88,
            Shade::Black => 0x00,
        };
        u32::from_le_bytes([level, level, level, 0xFF])
    }
}

/// Background palette: each 2-bit field of BGP picks the shade for one
/// colour index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Palette {
    colors: [Shade; 4],
}

impl Palette {
    pub fn from_register(value: u8) -> Self {
        Self {
            colors: std::array::from_fn(|i| Shade::from_bits(value >> (2 * i))),
        }
    }

    #[inline]
    pub fn shade(&self, index: u8) -> Shade {
        self.colors[usize::from(index & 0x03)]
    }

    pub fn colors(&self) -> [Shade; 4] {
        self.colors
    }
}

/// Object palette (OBP0/OBP1). Colour index 0 is transparent for sprites, so
/// only indices 1..=3 carry a shade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ObjectPalette {
    colors: [Shade; 3],
}

impl ObjectPalette {
    pub fn from_register(value: u8) -> Self {
        Self {
            colors: std::array::from_fn(|i| Shade::from_bits(value >> (2 * (i + 1)))),
        }
    }

    pub fn shade(&self, index: u8) -> Option<Shade> {
        match index & 0x03 {
            0 => None,
            i => Some(self.colors[usize::from(i - 1)]),
        }
    }
}
