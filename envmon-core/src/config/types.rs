//! Configuration type definitions
//!
//! Every field has a default matching the reference board wiring, so an
//! empty configuration file yields a working monitor.

use crate::reading::TemperatureUnit;

/// Lowest 7-bit address a device may use (0x00-0x07 are reserved)
pub const MIN_DEVICE_ADDRESS: u8 = 0x08;

/// Highest 7-bit address a device may use (0x78-0x7F are reserved)
pub const MAX_DEVICE_ADDRESS: u8 = 0x77;

/// Widest supported character display
pub const MAX_COLUMNS: u8 = 40;

/// Tallest supported character display
pub const MAX_ROWS: u8 = 4;

/// Maximum number of discrete humidity bar LEDs
pub const MAX_BAR_LEDS: u8 = 8;

/// Shortest allowed sampling interval; the sensor needs 80 ms per conversion
pub const MIN_SAMPLE_INTERVAL_MS: u32 = 100;

/// Shared I2C bus settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// SCL frequency in Hz
    pub frequency_hz: u32,
    /// Attempts per display write before giving up
    pub write_attempts: u8,
    /// Delay between write attempts (µs)
    pub retry_delay_us: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 100_000,
            write_attempts: 3,
            retry_delay_us: 100,
        }
    }
}

/// Humidity/temperature sensor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Time between measurements (ms)
    pub sample_interval_ms: u32,
    /// Reject frames with a bad CRC byte
    pub verify_crc: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: 0x38,
            sample_interval_ms: 1000,
            verify_crc: false,
        }
    }
}

/// Character display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// 7-bit address of the I/O expander
    pub address: u8,
    pub columns: u8,
    pub rows: u8,
    /// Backlight state after init
    pub backlight: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: 0x27,
            columns: 16,
            rows: 2,
            backlight: true,
        }
    }
}

/// How the temperature band is drawn on the pixel strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorPattern {
    /// Light a band-dependent number of pixels, rest off
    #[default]
    Fill,
    /// Light every pixel in the band colour
    Solid,
}

/// LED indicator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    pub pattern: IndicatorPattern,
    /// Number of discrete LEDs in the humidity bar
    pub bar_leds: u8,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            pattern: IndicatorPattern::Fill,
            bar_leds: 6,
        }
    }
}

/// Serial console settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleConfig {
    /// Unit used at startup
    pub unit: TemperatureUnit,
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    pub bus: BusConfig,
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
    pub indicator: IndicatorConfig,
    pub console: ConsoleConfig,
}

impl MonitorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }
}
