//! Physical reading and temperature unit types

/// One calibrated sensor measurement
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Relative humidity in percent (0-100)
    pub humidity: f32,
    /// Temperature in degrees Celsius
    pub temperature: f32,
}

impl Reading {
    /// Reading shown before the first successful measurement
    pub const INITIAL: Self = Self {
        humidity: 50.0,
        temperature: 25.0,
    };

    /// Create a reading from humidity (%) and temperature (°C)
    pub const fn new(humidity: f32, temperature: f32) -> Self {
        Self {
            humidity,
            temperature,
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Unit used when presenting temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit
    pub fn convert(self, celsius: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Single-letter unit symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Long unit name
    pub const fn name(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
        }
    }
}
