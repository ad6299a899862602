//! I2C bus driver for RP2040
//!
//! Wraps the embassy-rp blocking I2C master so the sensor and display
//! drivers can use it through [`envmon_hal::I2cBus`].

use embassy_rp::i2c::{AbortReason, Blocking, Config, Error as I2cError, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;

use envmon_hal::{BusFault, I2cBus, I2cConfig};

/// Classify an embassy-rp I2C error
fn bus_fault(e: I2cError) -> BusFault {
    match e {
        I2cError::Abort(AbortReason::NoAcknowledge) => BusFault::Nack,
        I2cError::Abort(AbortReason::ArbitrationLoss) => BusFault::ArbitrationLost,
        I2cError::Abort(_) => BusFault::Bus,
        _ => BusFault::Other,
    }
}

/// Blocking I2C master on one of the RP2040 I2C blocks
pub struct Rp2040I2c<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> Rp2040I2c<'d, T> {
    /// Configure the I2C block on the given pins
    pub fn new(
        peri: Peri<'d, T>,
        scl: Peri<'d, impl SclPin<T>>,
        sda: Peri<'d, impl SdaPin<T>>,
        config: I2cConfig,
    ) -> Self {
        let mut cfg = Config::default();
        cfg.frequency = config.frequency;

        Self {
            i2c: I2c::new_blocking(peri, scl, sda, cfg),
        }
    }
}

impl<T: Instance> I2cBus for Rp2040I2c<'_, T> {
    type Error = BusFault;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.blocking_write(address, data).map_err(bus_fault)?;
        Ok(data.len())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.blocking_read(address, buf).map_err(bus_fault)?;
        Ok(buf.len())
    }
}
