//! Discrete LED bar graph
//!
//! A row of GPIO-driven LEDs lit from the first pin upward. Used for the
//! humidity level, one LED per started 20 %.

use envmon_core::indicator::humidity_bar_count;
use envmon_hal::OutputPin;

/// Bar graph over up to `N` output pins
pub struct LedBar<P, const N: usize> {
    pins: [P; N],
    /// Number of pins actually wired (<= N)
    len: usize,
    lit: usize,
}

impl<P: OutputPin, const N: usize> LedBar<P, N> {
    /// Create a bar using all `N` pins, initially dark
    pub fn new(pins: [P; N]) -> Self {
        Self::with_len(pins, N)
    }

    /// Create a bar that only uses the first `len` pins
    pub fn with_len(pins: [P; N], len: usize) -> Self {
        let mut bar = Self {
            pins,
            len: len.min(N),
            lit: 0,
        };
        bar.set_level(0);
        bar
    }

    /// Light the first `count` LEDs and switch off the rest
    pub fn set_level(&mut self, count: usize) {
        let count = count.min(self.len);
        for (i, pin) in self.pins.iter_mut().enumerate() {
            pin.set_state(i < count);
        }
        self.lit = count;
    }

    /// Show a relative humidity in percent
    pub fn show_humidity(&mut self, humidity: f32) {
        self.set_level(humidity_bar_count(humidity, self.len));
    }

    /// Number of LEDs currently lit
    pub fn level(&self) -> usize {
        self.lit
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
