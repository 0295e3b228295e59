use std::fmt;

use thiserror::Error;

/// Failure while assembling a machine from its ROM images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("boot ROM must be exactly {expected} bytes, got {len}")]
    BootRomSize { len: usize, expected: usize },
}

/// Direction of a bus access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Hardware behaviour that is recognised but deliberately not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// LCD register at `0xFF40 + offset` with no backing implementation.
    LcdRegister(u8),
    /// LY is read-only on this core.
    ScanlineWrite,
    /// Background rendering from the signed `0x8800` tile-data table.
    SignedTileData,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::LcdRegister(offset) => write!(f, "LCD register 0x{offset:02X}"),
            Feature::ScanlineWrite => f.write_str("scanline register"),
            Feature::SignedTileData => f.write_str("signed tile data addressing"),
        }
    }
}

/// Errors raised by the address bus.
///
/// Reads of unmapped memory are fatal because the caller would otherwise
/// continue with a made-up value. Stray writes only lose data, so they are
/// reported but execution carries on. See [`BusError::is_fatal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("unmapped read at 0x{addr:04X}")]
    UnmappedRead { addr: u16 },
    #[error("unmapped write of 0x{value:02X} at 0x{addr:04X}")]
    UnmappedWrite { addr: u16, value: u8 },
    #[error("unimplemented {feature} ({access} at 0x{addr:04X})")]
    Unimplemented {
        addr: u16,
        access: Access,
        feature: Feature,
    },
}

impl BusError {
    pub fn is_fatal(&self) -> bool {
        match self {
            BusError::UnmappedRead { .. } => true,
            BusError::UnmappedWrite { .. } => false,
            BusError::Unimplemented { access, .. } => *access == Access::Read,
        }
    }
}

/// Errors returned from [`crate::Cpu::step`]. Any of them locks the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("unknown opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("CPU is locked after an earlier failure (PC=0x{pc:04X})")]
    Locked { pc: u16 },
}
