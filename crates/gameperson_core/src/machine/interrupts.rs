use bitflags::bitflags;

/// Interrupt sources in priority order (VBlank is serviced first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    Stat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::Stat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit position in IF/IE, which is also the priority rank.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Handler address: `0x40 + 8 * index`.
    #[inline]
    pub fn vector(self) -> u16 {
        0x40 + 8 * self as u16
    }

    #[inline]
    pub fn mask(self) -> InterruptMask {
        InterruptMask::from_bits_truncate(1 << self.index())
    }
}

bitflags! {
    /// IE/IF bit layout.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptMask: u8 {
        const VBLANK = 1 << 0;
        const STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// Pending requests, the IE mask and the master enable.
///
/// Requests are counted per source rather than kept as a single flag bit,
/// so two requests for the same source before it is serviced produce two
/// dispatches.
///
/// `ime` is what EI/DI/RETI write. `prev_ime` is the value latched at the
/// previous step; dispatch needs both, which delays EI by one instruction
/// while DI takes effect at once.
#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    pending: [u8; 5],
    enable: InterruptMask,
    ime: bool,
    prev_ime: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, kind: Interrupt) {
        let slot = &mut self.pending[kind.index()];
        *slot = slot.saturating_add(1);
        log::trace!("request {kind:?} (pending {})", *slot);
    }

    /// Handle a write to IF (`0xFF0F`): each set bit adds one request.
    /// Clear bits do not cancel anything already pending.
    pub fn write_flags(&mut self, value: u8) {
        let mask = InterruptMask::from_bits_truncate(value);
        for kind in Interrupt::ALL {
            if mask.contains(kind.mask()) {
                self.request(kind);
            }
        }
    }

    /// IF as software sees it: a bit per source with at least one request,
    /// upper three bits reading as 1.
    pub fn read_flags(&self) -> u8 {
        0xE0 | self.pending_mask().bits()
    }

    pub fn write_enable(&mut self, value: u8) {
        self.enable = InterruptMask::from_bits_retain(value);
    }

    pub fn enable_mask(&self) -> InterruptMask {
        self.enable
    }

    pub fn read_enable(&self) -> u8 {
        self.enable.bits()
    }

    pub fn set_ime(&mut self, enabled: bool) {
        self.ime = enabled;
    }

    /// Set IME and its latch together, so the next `poll` can already
    /// deliver. RETI uses this; EI goes through `set_ime` and waits a step.
    pub fn enable_now(&mut self) {
        self.ime = true;
        self.prev_ime = true;
    }

    pub fn ime(&self) -> bool {
        self.ime
    }

    pub fn pending_count(&self, kind: Interrupt) -> u8 {
        self.pending[kind.index()]
    }

    fn pending_mask(&self) -> InterruptMask {
        Interrupt::ALL
            .into_iter()
            .filter(|kind| self.pending[kind.index()] > 0)
            .fold(InterruptMask::empty(), |acc, kind| acc | kind.mask())
    }

    /// True when some enabled source has a request, regardless of IME.
    /// Wakes the CPU from HALT.
    pub fn has_enabled_pending(&self) -> bool {
        self.pending_mask().intersects(self.enable)
    }

    /// Take the highest-priority deliverable request, clearing IME.
    pub fn poll(&mut self) -> Option<Interrupt> {
        if !(self.prev_ime && self.ime) {
            return None;
        }

        let kind = Interrupt::ALL.into_iter().find(|kind| {
            self.pending[kind.index()] > 0 && self.enable.contains(kind.mask())
        })?;

        self.pending[kind.index()] -= 1;
        self.ime = false;
        Some(kind)
    }

    /// Record the current IME for the next step's `poll`.
    pub fn latch_ime(&mut self) {
        self.prev_ime = self.ime;
    }
}
