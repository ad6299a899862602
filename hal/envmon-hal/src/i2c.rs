//! I2C bus abstractions
//!
//! Provides the blocking I2C master trait the device drivers are written
//! against, plus helpers for sharing one bus between several drivers.

use core::cell::RefCell;

/// Lowest address probed by [`scan`] (0x00-0x07 are reserved)
pub const SCAN_FIRST_ADDRESS: u8 = 0x08;

/// Highest address probed by [`scan`] (0x78-0x7F are reserved)
pub const SCAN_LAST_ADDRESS: u8 = 0x77;

/// I2C bus master
///
/// Both operations block until the transfer finishes or the implementation's
/// own timeout expires. They report how many bytes actually moved so callers
/// can reject short transfers.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    ///
    /// Returns the number of bytes acknowledged by the device.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    ///
    /// Returns the number of bytes received.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(address, buf)
    }
}

/// Generic I2C failure classification
///
/// Chip HALs map their native error types into this so drivers and logs
/// don't depend on a particular HAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Address or data byte was not acknowledged
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Bus error (misplaced start/stop)
    Bus,
    /// Transfer timed out
    Timeout,
    /// Other error
    Other,
}

/// Shared handle to a bus owned by a `RefCell`
///
/// Lets the sensor and display drivers each own a bus handle while one task
/// owns the physical bus. The cell is borrowed for a single transfer only, so
/// callers must still run one driver operation to completion before starting
/// another.
pub struct RefCellBus<'a, T> {
    bus: &'a RefCell<T>,
}

impl<'a, T> RefCellBus<'a, T> {
    /// Create a new handle to the shared bus
    pub fn new(bus: &'a RefCell<T>) -> Self {
        Self { bus }
    }
}

impl<T: I2cBus> I2cBus for RefCellBus<'_, T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error> {
        self.bus.borrow_mut().write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.bus.borrow_mut().read(address, buf)
    }
}

/// Probe every non-reserved address and report responders
///
/// A device counts as present when a one-byte read is acknowledged.
/// Returns the number of devices found.
pub fn scan<B: I2cBus>(bus: &mut B, mut found: impl FnMut(u8)) -> usize {
    let mut count = 0;
    let mut probe = [0u8; 1];

    for address in SCAN_FIRST_ADDRESS..=SCAN_LAST_ADDRESS {
        if let Ok(n) = bus.read(address, &mut probe) {
            if n > 0 {
                found(address);
                count += 1;
            }
        }
    }

    count
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}
