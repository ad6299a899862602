//! DHT20 humidity/temperature sensor (I2C)
//!
//! # Protocol
//!
//! - Soft reset: write `0xBA`, wait 20 ms
//! - Measurement: write `[0xAC, 0x33, 0x00]`, wait 80 ms, read 7 bytes
//!
//! # Frame Layout
//!
//! ```text
//! byte 0      status (bit 7 = busy)
//! byte 1..3   humidity, 20 bits: b1[7:0] b2[7:0] b3[7:4]
//! byte 3..5   temperature, 20 bits: b3[3:0] b4[7:0] b5[7:0]
//! byte 6      CRC-8 over bytes 0..6
//! ```
//!
//! Humidity is `raw / 2^20 * 100` %, temperature is `raw / 2^20 * 200 - 50` °C.

use embedded_hal::delay::DelayNs;
use envmon_core::traits::{EnvironmentSensor, SensorError};
use envmon_core::Reading;
use envmon_hal::I2cBus;

/// Factory-fixed bus address
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// Command bytes
pub mod cmd {
    /// Soft reset
    pub const SOFT_RESET: u8 = 0xBA;
    /// Trigger measurement
    pub const TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];
}

/// Time for a soft reset to complete (ms)
pub const RESET_TIME_MS: u32 = 20;

/// Conversion time after a trigger (ms)
pub const MEASUREMENT_TIME_MS: u32 = 80;

/// Measurement response length
pub const FRAME_LEN: usize = 7;

/// Status bit set while a conversion is in progress
const STATUS_BUSY: u8 = 0x80;

/// 2^20, full scale of both 20-bit fields
const FULL_SCALE: f32 = 1_048_576.0;

/// CRC-8 used by the sensor (polynomial 0x31, init 0xFF)
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0xFFu8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x31;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Raw 7-byte measurement response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(pub [u8; FRAME_LEN]);

impl Frame {
    pub fn status(&self) -> u8 {
        self.0[0]
    }

    /// Conversion still in progress
    pub fn is_busy(&self) -> bool {
        self.status() & STATUS_BUSY != 0
    }

    /// 20-bit humidity field
    pub fn humidity_raw(&self) -> u32 {
        let b = &self.0;
        (b[1] as u32) << 12 | (b[2] as u32) << 4 | (b[3] as u32) >> 4
    }

    /// 20-bit temperature field
    pub fn temperature_raw(&self) -> u32 {
        let b = &self.0;
        ((b[3] & 0x0F) as u32) << 16 | (b[4] as u32) << 8 | b[5] as u32
    }

    /// Whether the trailing CRC matches the first six bytes
    pub fn crc_valid(&self) -> bool {
        crc8(&self.0[..6]) == self.0[6]
    }

    /// Convert both fields to physical units
    pub fn decode(&self) -> Reading {
        Reading {
            humidity: self.humidity_raw() as f32 / FULL_SCALE * 100.0,
            temperature: self.temperature_raw() as f32 / FULL_SCALE * 200.0 - 50.0,
        }
    }
}

/// DHT20 driver
///
/// Owns its bus handle and delay source. The driver performs no retries;
/// a `Busy` result is for the caller to handle.
pub struct Dht20<B, D> {
    bus: B,
    delay: D,
    address: u8,
    initialized: bool,
    verify_crc: bool,
}

impl<B: I2cBus, D: DelayNs> Dht20<B, D> {
    /// Create a driver at the default address
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_address(bus, delay, DEFAULT_ADDRESS)
    }

    /// Create a driver at a specific address
    pub fn with_address(bus: B, delay: D, address: u8) -> Self {
        Self {
            bus,
            delay,
            address,
            initialized: false,
            verify_crc: false,
        }
    }

    /// Reject frames whose CRC byte does not match
    ///
    /// Off by default: any complete, non-busy frame is accepted.
    pub fn set_crc_check(&mut self, enabled: bool) {
        self.verify_crc = enabled;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the bus and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Write a command; a partial write counts as a bus failure
    fn send(&mut self, command: &[u8]) -> Result<(), SensorError> {
        let n = self
            .bus
            .write(self.address, command)
            .map_err(|_| SensorError::Bus)?;
        if n != command.len() {
            return Err(SensorError::Bus);
        }
        Ok(())
    }

    /// Trigger a conversion and fetch the raw response
    fn measure(&mut self) -> Result<Frame, SensorError> {
        self.send(&cmd::TRIGGER)?;
        self.delay.delay_ms(MEASUREMENT_TIME_MS);

        let mut frame = [0u8; FRAME_LEN];
        let n = self
            .bus
            .read(self.address, &mut frame)
            .map_err(|_| SensorError::Bus)?;
        if n != FRAME_LEN {
            return Err(SensorError::Bus);
        }
        Ok(Frame(frame))
    }
}

impl<B: I2cBus, D: DelayNs> EnvironmentSensor for Dht20<B, D> {
    fn init(&mut self) -> Result<(), SensorError> {
        self.send(&[cmd::SOFT_RESET])?;
        self.delay.delay_ms(RESET_TIME_MS);
        self.initialized = true;
        Ok(())
    }

    fn read(&mut self) -> Result<Reading, SensorError> {
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }

        let frame = self.measure()?;
        if frame.is_busy() {
            return Err(SensorError::Busy);
        }
        if self.verify_crc && !frame.crc_valid() {
            return Err(SensorError::Bus);
        }
        Ok(frame.decode())
    }
}
