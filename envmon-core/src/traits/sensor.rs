//! Humidity/temperature sensor trait

use crate::reading::Reading;

/// Errors that can occur while reading the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed or returned the wrong number of bytes
    Bus,
    /// Sensor reported a measurement still in progress
    Busy,
    /// `read` called before a successful `init`
    NotInitialized,
}

/// Trait for combined humidity and temperature sensors
///
/// Implementations own their bus handle and timing source; a measurement
/// may block for the sensor's conversion time.
pub trait EnvironmentSensor {
    /// Reset the sensor and prepare it for measurements
    fn init(&mut self) -> Result<(), SensorError>;

    /// Trigger one measurement and return the calibrated values
    ///
    /// A failed read never yields a partial reading.
    fn read(&mut self) -> Result<Reading, SensorError>;
}
