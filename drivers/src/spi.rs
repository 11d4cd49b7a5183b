use crate::hw::pl022::Instance;
use crate::peripheral::pl022::Pl022;
use spin::Mutex;

/// Global SPI instances, each protected by a spinlock
// SAFETY: these are the only drivers created for the two instances.
static SPI0: Mutex<Pl022> = Mutex::new(unsafe { Pl022::new(Instance::Spi0) });
static SPI1: Mutex<Pl022> = Mutex::new(unsafe { Pl022::new(Instance::Spi1) });

/// Execute a closure with exclusive access to one SPI instance
///
/// The lock is held for the whole closure, so a transfer started inside
/// it cannot interleave with one from another core or context.
///
/// # Example
/// ```no_run
/// use spi_drivers::hw::pl022::Instance;
/// use spi_drivers::spi::with_spi;
///
/// let mut block = [0u8; 512];
/// with_spi(Instance::Spi0, |spi| spi.read(0xFF, &mut block)).unwrap();
/// ```
pub fn with_spi<F, R>(instance: Instance, f: F) -> R
where
    F: FnOnce(&mut Pl022) -> R,
{
    let mut spi = match instance {
        Instance::Spi0 => SPI0.lock(),
        Instance::Spi1 => SPI1.lock(),
    };
    f(&mut spi)
}
