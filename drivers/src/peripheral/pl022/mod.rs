//! ARM PrimeCell PL022 SSP (SPI) Driver
//!
//! Blocking, polled transfers for an already configured PL022. The
//! controller clocks data in full duplex through 8-frame TX and RX
//! FIFOs; this driver keeps both FIFOs fed and drained by polling the
//! status register, without interrupts or DMA.
//!
//! # Modes
//!
//! - [`Pl022::transfer`]: full duplex, `src` out while `dst` fills
//! - [`Pl022::write`]: transmit only, received frames are discarded
//! - [`Pl022::read`]: receive only, a fill byte is clocked out per frame
//!
//! The receive FIFO keeps shifting when it is full and drops the new
//! frame, setting a sticky overrun flag. Duplex transfers therefore never
//! keep more than [`FIFO_DEPTH`] frames in flight, so a transfer that is
//! preempted right after a push still cannot lose data.
//!
//! # Example
//!
//! ```no_run
//! use spi_drivers::hw::pl022::Instance;
//! use spi_drivers::peripheral::pl022::Pl022;
//!
//! // SAFETY: SPI0 is configured and not shared with `spi_drivers::spi`.
//! let mut spi = unsafe { Pl022::new(Instance::Spi0) };
//! let mut response = [0u8; 4];
//! spi.write(&[0x40, 0x00, 0x00, 0x00, 0x00, 0x95])?;
//! spi.read(0xFF, &mut response)?;
//! # Ok::<(), spi_drivers::hal::spi::SpiError>(())
//! ```

#[cfg(test)]
pub(crate) mod sim;

use crate::hal::spi::{SpiBus, SpiError};
use crate::hw::pl022::{FIFO_DEPTH, Instance, Interrupt, Pl022Regs, Status};
use core::ptr::{read_volatile, write_volatile};

/// Register access used by the transfer engine.
///
/// Every call must reach the hardware; implementations may not cache.
pub trait Registers {
    /// Read SSPSR.
    fn status(&self) -> Status;

    /// Read SSPRIS.
    fn raw_interrupts(&self) -> Interrupt;

    /// Pop one frame from the RX FIFO (SSPDR read).
    fn read_data(&mut self) -> u32;

    /// Push one frame into the TX FIFO (SSPDR write).
    fn write_data(&mut self, value: u32);

    /// Write SSPICR.
    fn clear_interrupts(&mut self, bits: Interrupt);
}

/// Volatile access to a PL022 register block.
pub struct Mmio {
    instance: Instance,
    regs: *mut Pl022Regs,
}

impl Mmio {
    /// # Safety
    ///
    /// - The instance's register block must be mapped as device memory
    /// - Only one `Mmio` should exist per instance
    pub const unsafe fn new(instance: Instance) -> Self {
        Self {
            instance,
            regs: instance.base() as *mut Pl022Regs,
        }
    }

    pub const fn instance(&self) -> Instance {
        self.instance
    }
}

impl Registers for Mmio {
    #[inline]
    fn status(&self) -> Status {
        Status::from_bits_retain(unsafe { read_volatile(&raw const (*self.regs).sr) })
    }

    #[inline]
    fn raw_interrupts(&self) -> Interrupt {
        Interrupt::from_bits_retain(unsafe { read_volatile(&raw const (*self.regs).ris) })
    }

    #[inline]
    fn read_data(&mut self) -> u32 {
        unsafe { read_volatile(&raw const (*self.regs).dr) }
    }

    #[inline]
    fn write_data(&mut self, value: u32) {
        unsafe { write_volatile(&raw mut (*self.regs).dr, value) }
    }

    #[inline]
    fn clear_interrupts(&mut self, bits: Interrupt) {
        unsafe { write_volatile(&raw mut (*self.regs).icr, bits.bits()) }
    }
}

// SAFETY: Mmio only addresses one of the fixed PL022 register blocks;
// callers serialize access (see `crate::spi`).
unsafe impl Send for Mmio {}

/// Spin until `done` returns true.
#[inline]
fn spin_until(mut done: impl FnMut() -> bool) {
    while !done() {
        core::hint::spin_loop();
    }
}

/// Transmit side of a paced transfer.
enum Source<'a> {
    Buffer(&'a [u8]),
    Repeat(u8),
}

impl Source<'_> {
    #[inline]
    fn word(&self, index: usize) -> u8 {
        match self {
            Source::Buffer(buf) => buf[index],
            Source::Repeat(byte) => *byte,
        }
    }
}

/// PL022 SSP driver.
pub struct Pl022<R = Mmio> {
    regs: R,
}

impl Pl022<Mmio> {
    /// Create a driver for one of the on-chip instances.
    ///
    /// The peripheral must already be clocked, configured for 8-bit
    /// frames and enabled.
    ///
    /// # Safety
    ///
    /// - The instance's register block must be mapped as device memory
    /// - Only one driver should exist per instance; the globals in
    ///   [`crate::spi`] already own one for each
    pub const unsafe fn new(instance: Instance) -> Self {
        Self {
            regs: unsafe { Mmio::new(instance) },
        }
    }

    pub const fn instance(&self) -> Instance {
        self.regs.instance()
    }
}

impl<R: Registers> Pl022<R> {
    /// Create a driver on top of an arbitrary register implementation.
    pub const fn from_registers(regs: R) -> Self {
        Self { regs }
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Give the register implementation back.
    pub fn release(self) -> R {
        self.regs
    }

    /// True if the TX FIFO has room for another frame.
    #[inline]
    pub fn writable(&self) -> bool {
        self.regs.status().contains(Status::TNF)
    }

    /// True if the RX FIFO holds at least one frame.
    #[inline]
    pub fn readable(&self) -> bool {
        self.regs.status().contains(Status::RNE)
    }

    /// True while a frame is shifting or the TX FIFO is not empty.
    #[inline]
    pub fn busy(&self) -> bool {
        self.regs.status().contains(Status::BSY)
    }

    /// True if the sticky receive-overrun flag is set.
    #[inline]
    pub fn overrun(&self) -> bool {
        self.regs.raw_interrupts().contains(Interrupt::ROR)
    }

    /// Write `src` while reading `src.len()` bytes into `dst`.
    ///
    /// # Errors
    ///
    /// [`SpiError::LengthMismatch`] if the buffers differ in length. The
    /// hardware is not touched in that case.
    pub fn transfer(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, SpiError> {
        if src.len() != dst.len() {
            return Err(SpiError::LengthMismatch);
        }
        log::trace!("pl022: transfer {} bytes", src.len());
        Ok(self.paced_transfer(Source::Buffer(src), dst))
    }

    /// Write `src` and discard whatever comes back.
    ///
    /// Returns once the last frame has left the shift register, with both
    /// FIFOs empty and the overrun flag cleared.
    pub fn write(&mut self, src: &[u8]) -> Result<usize, SpiError> {
        log::trace!("pl022: write {} bytes", src.len());

        // RX is not drained here. A full RX FIFO only drops frames and sets
        // the sticky overrun flag; shifting carries on.
        for &byte in src {
            spin_until(|| self.writable());
            self.regs.write_data(u32::from(byte));
        }

        // BSY can outlast an empty TX FIFO while the last frame shifts out,
        // and that frame's RX word lands after the first drain.
        self.drain_rx();
        spin_until(|| !self.busy());
        self.drain_rx();

        if self.overrun() {
            log::warn!("pl022: receive overrun during write, clearing");
        }
        self.regs.clear_interrupts(Interrupt::ROR);

        Ok(src.len())
    }

    /// Fill `dst`, clocking out `fill` for every byte received.
    pub fn read(&mut self, fill: u8, dst: &mut [u8]) -> Result<usize, SpiError> {
        log::trace!("pl022: read {} bytes, fill {:#04x}", dst.len(), fill);
        Ok(self.paced_transfer(Source::Repeat(fill), dst))
    }

    fn paced_transfer(&mut self, src: Source<'_>, dst: &mut [u8]) -> usize {
        let len = dst.len();
        let mut tx_remaining = len;
        let mut rx_remaining = len;

        while tx_remaining > 0 || rx_remaining > 0 {
            // Frames in flight are rx_remaining - tx_remaining; keep that
            // within the RX FIFO.
            if tx_remaining > 0 && self.writable() && rx_remaining < tx_remaining + FIFO_DEPTH {
                self.regs.write_data(u32::from(src.word(len - tx_remaining)));
                tx_remaining -= 1;
            }
            if rx_remaining > 0 && self.readable() {
                dst[len - rx_remaining] = self.regs.read_data() as u8;
                rx_remaining -= 1;
            }
        }

        len
    }

    fn drain_rx(&mut self) {
        while self.readable() {
            let _ = self.regs.read_data();
        }
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl<R: Registers> SpiBus for Pl022<R> {
    type Error = SpiError;

    fn transfer(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, SpiError> {
        Pl022::transfer(self, src, dst)
    }

    fn write(&mut self, src: &[u8]) -> Result<usize, SpiError> {
        Pl022::write(self, src)
    }

    fn read(&mut self, fill: u8, dst: &mut [u8]) -> Result<usize, SpiError> {
        Pl022::read(self, fill, dst)
    }
}
