//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with hardware
//! peripherals. These traits are implemented by peripheral drivers,
//! allowing device drivers (SD cards, audio codecs) to be written
//! against a bus rather than a particular controller.
//!
//! # Available Interfaces
//!
//! - [`spi`]: Blocking SPI bus transfers

pub mod spi;
