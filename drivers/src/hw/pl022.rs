//! ARM PrimeCell PL022 Synchronous Serial Port register map.
//!
//! The layout below covers the registers the blocking transfer engine
//! touches plus the configuration registers around them, so the struct
//! can be overlaid on the peripheral's base address as-is.

use bitflags::bitflags;

/// Depth of the transmit and receive FIFOs, in frames.
pub const FIFO_DEPTH: usize = 8;

cfg_if::cfg_if! {
    if #[cfg(feature = "rp2040")] {
        pub const SPI0_BASE: usize = 0x4003_C000;
        pub const SPI1_BASE: usize = 0x4004_0000;
    } else {
        compile_error!(
            "No PL022 platform selected!\n\
            Use: cargo build --features rp2040"
        );
    }
}

/// Memory-mapped PL022 SSP registers
#[repr(C)]
pub struct Pl022Regs {
    pub cr0: u32,
    pub cr1: u32,
    pub dr: u32,
    pub sr: u32,
    pub cpsr: u32,
    pub imsc: u32,
    pub ris: u32,
    pub mis: u32,
    pub icr: u32,
    pub dmacr: u32,
}

bitflags! {
    /// SSPSR status bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        /// Transmit FIFO empty.
        const TFE = 1 << 0;
        /// Transmit FIFO not full.
        const TNF = 1 << 1;
        /// Receive FIFO not empty.
        const RNE = 1 << 2;
        /// Receive FIFO full.
        const RFF = 1 << 3;
        /// Frame in flight or transmit FIFO not empty.
        const BSY = 1 << 4;
    }
}

bitflags! {
    /// SSPRIS / SSPMIS / SSPICR interrupt bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupt: u32 {
        /// Receive overrun: a frame arrived while the RX FIFO was full.
        const ROR = 1 << 0;
        /// Receive timeout.
        const RT = 1 << 1;
        /// RX FIFO half full or more.
        const RX = 1 << 2;
        /// TX FIFO half empty or less.
        const TX = 1 << 3;
    }
}

/// One of the two PL022 instances.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instance {
    Spi0,
    Spi1,
}

impl Instance {
    /// Base address of the instance's register block.
    pub const fn base(self) -> usize {
        match self {
            Instance::Spi0 => SPI0_BASE,
            Instance::Spi1 => SPI1_BASE,
        }
    }

    /// Hardware instance number, 0 or 1.
    pub const fn index(self) -> usize {
        match self {
            Instance::Spi0 => 0,
            Instance::Spi1 => 1,
        }
    }

    /// Resolve a raw register-block address to an instance.
    ///
    /// Returns `None` unless `base` is exactly one of the two known
    /// base addresses.
    pub const fn from_base(base: usize) -> Option<Self> {
        match base {
            SPI0_BASE => Some(Instance::Spi0),
            SPI1_BASE => Some(Instance::Spi1),
            _ => None,
        }
    }
}
