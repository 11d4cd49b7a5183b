//! SPI Driver Subsystem
//!
//! Blocking, polled transfers for the two ARM PrimeCell PL022 SSP
//! controllers, split in the usual layers:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent bus trait
//! - [`hw`]: Register layout, status bits and instance addresses
//! - [`peripheral`]: The PL022 transfer engine
//! - [`spi`]: Lock-protected access to the on-chip instances
//!
//! # Usage Example
//!
//! ```no_run
//! use spi_drivers::hal::spi::SpiBus;
//! use spi_drivers::hw::pl022::Instance;
//! use spi_drivers::spi::with_spi;
//!
//! let status = with_spi(Instance::Spi1, |spi| {
//!     spi.write(&[0x05])?;
//!     spi.transfer_byte(0x00)
//! })?;
//! let _write_in_progress = status & 0x01 != 0;
//! # Ok::<(), spi_drivers::hal::spi::SpiError>(())
//! ```
//!
//! Clocking, pin muxing and enabling the controller happen elsewhere;
//! the drivers here assume a configured peripheral with 8-bit frames.

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod hw;
pub mod peripheral;
pub mod spi;

// Re-export commonly used types
pub use hal::spi::{SpiBus, SpiError};
pub use hw::pl022::{FIFO_DEPTH, Instance};
pub use peripheral::pl022::Pl022;
