//! Peripheral Drivers
//!
//! This module contains drivers for reusable peripherals that
//! can be found across different platforms.
//!
//! # Available Peripherals
//!
//! - [`pl022`]: ARM PrimeCell PL022 synchronous serial port (SPI)

pub mod pl022;
