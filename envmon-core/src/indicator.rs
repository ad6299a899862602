//! LED indicator mapping
//!
//! The temperature is shown on an 8-pixel WS2812 strip as one of seven
//! colour bands. Humidity is shown on a bar of discrete LEDs, one LED per
//! started 20 %.
//!
//! Colours are 24-bit GRB words, the order the strip shifts them in.

use crate::config::IndicatorPattern;

/// Pixels on the temperature strip
pub const STRIP_LEN: usize = 8;

/// Humidity covered by one bar LED (%)
pub const HUMIDITY_PER_LED: u32 = 20;

/// Pixel off
pub const OFF: u32 = 0x00_00_00;

/// Temperature colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempBand {
    /// Below -10 °C
    Purple,
    /// -10 to -2 °C
    Blue,
    /// -2 to 6 °C
    Teal,
    /// 6 to 14 °C
    Green,
    /// 14 to 22 °C
    Yellow,
    /// 22 to 29 °C
    Orange,
    /// 29 °C and above
    Red,
}

impl TempBand {
    /// Band for a temperature in °C; lower bounds are inclusive
    pub fn from_celsius(celsius: f32) -> Self {
        if celsius < -10.0 {
            TempBand::Purple
        } else if celsius < -2.0 {
            TempBand::Blue
        } else if celsius < 6.0 {
            TempBand::Teal
        } else if celsius < 14.0 {
            TempBand::Green
        } else if celsius < 22.0 {
            TempBand::Yellow
        } else if celsius < 29.0 {
            TempBand::Orange
        } else {
            // NaN lands here too
            TempBand::Red
        }
    }

    /// GRB colour of the band
    pub const fn color(self) -> u32 {
        match self {
            TempBand::Purple => 0x00_05_0E,
            TempBand::Blue => 0x00_00_11,
            TempBand::Teal => 0x11_00_11,
            TempBand::Green => 0x11_00_00,
            TempBand::Yellow => 0x11_11_00,
            TempBand::Orange => 0x05_11_00,
            TempBand::Red => 0x00_11_00,
        }
    }

    /// Pixels lit in the fill pattern (2 for the coldest band, 8 for the hottest)
    pub const fn fill_count(self) -> usize {
        self as usize + 2
    }
}

/// Strip frame for a temperature
pub fn strip_frame(pattern: IndicatorPattern, celsius: f32) -> [u32; STRIP_LEN] {
    let band = TempBand::from_celsius(celsius);
    let lit = match pattern {
        IndicatorPattern::Solid => STRIP_LEN,
        IndicatorPattern::Fill => band.fill_count().min(STRIP_LEN),
    };

    let mut frame = [OFF; STRIP_LEN];
    for px in frame.iter_mut().take(lit) {
        *px = band.color();
    }
    frame
}

/// Number of humidity bar LEDs to light
///
/// One LED per started 20 % of the whole-percent humidity, capped at `leds`.
/// Negative and NaN humidity light nothing.
pub fn humidity_bar_count(humidity: f32, leds: usize) -> usize {
    // Saturating float-to-int cast; NaN and negatives become 0
    let percent = humidity as u32;
    let count = percent.div_ceil(HUMIDITY_PER_LED) as usize;
    count.min(leds)
}
