//! Serial Peripheral Interface (SPI) Hardware Abstraction Layer.
//!
//! This module defines the platform-independent blocking bus interface
//! used by SPI device drivers (SD cards, codecs, displays).
//!
//! Every operation blocks until the whole buffer has been clocked
//! through the bus. Buses run at a fixed bit rate, so there is no
//! timeout: a call either transfers everything or does not return.

/// SPI bus errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpiError {
    /// Transmit and receive buffers have different lengths.
    LengthMismatch,
}

/// Blocking, full-duplex SPI bus.
pub trait SpiBus {
    /// Error type for bus operations.
    type Error: core::fmt::Debug + From<SpiError>;

    /// Write `src` while reading the same number of bytes into `dst`.
    ///
    /// Returns the number of bytes exchanged in each direction.
    fn transfer(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `src`, discarding everything received meanwhile.
    fn write(&mut self, src: &[u8]) -> Result<usize, Self::Error>;

    /// Fill `dst` from the bus, clocking out `fill` for every byte read.
    ///
    /// Most devices accept 0x00 here; SD cards expect 0xFF.
    fn read(&mut self, fill: u8, dst: &mut [u8]) -> Result<usize, Self::Error>;

    /// Exchange a single byte.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut received = [0u8; 1];
        self.transfer(&[byte], &mut received)?;
        Ok(received[0])
    }

    /// Dispatch on the shape of the buffers.
    ///
    /// - no `r`: write `w`
    /// - `w` empty: read into `r` with a zero fill byte
    /// - `w` a single byte and `r` longer: read into `r` repeating `w[0]`
    /// - otherwise: full-duplex transfer, lengths must match
    fn tx(&mut self, w: &[u8], r: Option<&mut [u8]>) -> Result<usize, Self::Error> {
        match r {
            None => self.write(w),
            Some(r) if w.is_empty() => self.read(0x00, r),
            Some(r) if w.len() == 1 && r.len() > 1 => self.read(w[0], r),
            Some(r) if w.len() == r.len() => self.transfer(w, r),
            Some(_) => Err(SpiError::LengthMismatch.into()),
        }
    }
}
