//! Latest-reading state shared by the sensor loop, display and console
//!
//! The sampler holds the most recent reading and a data-ready flag.
//! A failed measurement keeps the previous values and marks them stale
//! instead of replacing them. Failures before the first real reading are
//! only counted; the placeholder reading is never published. Console
//! overrides ("mock mode") take precedence over the sensor until switched
//! off.

use crate::reading::Reading;
use crate::traits::SensorError;

/// Snapshot handed to presentation code
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub reading: Reading,
    /// The last sensor read failed; `reading` is the previous value
    pub stale: bool,
    /// `reading` comes from console overrides
    pub mock: bool,
}

/// Sensor state machine
#[derive(Debug, Clone)]
pub struct Sampler {
    reading: Reading,
    data_ready: bool,
    /// A measurement or override has replaced the initial reading
    has_reading: bool,
    stale: bool,
    mock: bool,
    consecutive_failures: u32,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    /// Create a sampler holding the initial reading
    ///
    /// Nothing is ready until the first measurement or override.
    pub const fn new() -> Self {
        Self {
            reading: Reading::INITIAL,
            data_ready: false,
            has_reading: false,
            stale: false,
            mock: false,
            consecutive_failures: 0,
        }
    }

    /// Whether the sensor should be read on this tick
    pub fn wants_measurement(&self) -> bool {
        !self.mock
    }

    /// Record the outcome of a sensor read
    ///
    /// Ignored while mock mode is active.
    pub fn record(&mut self, result: Result<Reading, SensorError>) {
        if self.mock {
            return;
        }

        match result {
            Ok(reading) => {
                self.reading = reading;
                self.stale = false;
                self.consecutive_failures = 0;
                self.has_reading = true;
                self.data_ready = true;
            }
            Err(_) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                // Only the transition to stale is news for the display, and
                // only once there is a real reading to mark
                if self.has_reading && !self.stale {
                    self.stale = true;
                    self.data_ready = true;
                }
            }
        }
    }

    /// Override the temperature and enter mock mode
    pub fn set_mock_temperature(&mut self, celsius: f32) {
        self.reading.temperature = celsius;
        self.enter_mock();
    }

    /// Override the humidity and enter mock mode
    pub fn set_mock_humidity(&mut self, percent: f32) {
        self.reading.humidity = percent;
        self.enter_mock();
    }

    /// Leave mock mode; the next sensor read replaces the overrides
    pub fn clear_mock(&mut self) {
        self.mock = false;
    }

    fn enter_mock(&mut self) {
        self.mock = true;
        self.has_reading = true;
        self.stale = false;
        self.data_ready = true;
    }

    pub fn is_mock(&self) -> bool {
        self.mock
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Failed reads since the last success
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Current state regardless of the ready flag
    pub fn current(&self) -> Sample {
        Sample {
            reading: self.reading,
            stale: self.stale,
            mock: self.mock,
        }
    }

    /// Current state, once a real reading or override exists
    pub fn latest(&self) -> Option<Sample> {
        self.has_reading.then(|| self.current())
    }

    /// Return the current state once per update
    pub fn take(&mut self) -> Option<Sample> {
        if !self.data_ready {
            return None;
        }
        self.data_ready = false;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let mut sampler = Sampler::new();
        assert!(sampler.take().is_none());
        let sample = sampler.current();
        assert_eq!(sample.reading, Reading::new(50.0, 25.0));
        assert!(!sample.stale);
        assert!(!sample.mock);
    }

    #[test]
    fn test_failure_before_first_reading_is_not_published() {
        let mut sampler = Sampler::new();
        sampler.record(Err(SensorError::Bus));
        sampler.record(Err(SensorError::Busy));

        assert!(sampler.take().is_none());
        assert!(sampler.latest().is_none());
        assert!(!sampler.is_stale());
        assert_eq!(sampler.consecutive_failures(), 2);

        sampler.record(Ok(Reading::new(41.0, 19.5)));
        let sample = sampler.take().unwrap();
        assert_eq!(sample.reading, Reading::new(41.0, 19.5));
        assert!(!sample.stale);

        sampler.record(Err(SensorError::Bus));
        assert!(sampler.take().unwrap().stale);
    }

    #[test]
    fn test_failure_after_override_marks_stale() {
        let mut sampler = Sampler::new();
        sampler.set_mock_humidity(70.0);
        sampler.clear_mock();
        sampler.take();

        sampler.record(Err(SensorError::Bus));
        let sample = sampler.take().unwrap();
        assert!(sample.stale);
        assert_eq!(sample.reading.humidity, 70.0);
    }

    #[test]
    fn test_success_replaces_reading() {
        let mut sampler = Sampler::new();
        sampler.take();

        sampler.record(Ok(Reading::new(41.0, 19.5)));
        let sample = sampler.take().unwrap();
        assert_eq!(sample.reading, Reading::new(41.0, 19.5));
        assert!(!sample.stale);
    }

    #[test]
    fn test_failure_keeps_previous_and_marks_stale() {
        let mut sampler = Sampler::new();
        sampler.record(Ok(Reading::new(41.0, 19.5)));
        sampler.take();

        sampler.record(Err(SensorError::Busy));
        let sample = sampler.take().unwrap();
        assert_eq!(sample.reading, Reading::new(41.0, 19.5));
        assert!(sample.stale);

        // Repeated failures are not new updates
        sampler.record(Err(SensorError::Bus));
        assert!(sampler.take().is_none());
        assert_eq!(sampler.consecutive_failures(), 2);

        sampler.record(Ok(Reading::new(42.0, 20.0)));
        assert!(!sampler.take().unwrap().stale);
        assert_eq!(sampler.consecutive_failures(), 0);
    }

    #[test]
    fn test_mock_overrides_sensor() {
        let mut sampler = Sampler::new();
        sampler.take();

        sampler.set_mock_temperature(30.5);
        assert!(sampler.is_mock());
        assert!(!sampler.wants_measurement());
        let sample = sampler.take().unwrap();
        assert_eq!(sample.reading.temperature, 30.5);
        assert!(sample.mock);

        sampler.record(Ok(Reading::new(10.0, 10.0)));
        assert!(sampler.take().is_none());
        assert_eq!(sampler.current().reading.temperature, 30.5);

        sampler.set_mock_humidity(80.0);
        assert_eq!(sampler.current().reading, Reading::new(80.0, 30.5));

        sampler.clear_mock();
        assert!(sampler.wants_measurement());
        sampler.record(Ok(Reading::new(10.0, 10.0)));
        assert_eq!(sampler.take().unwrap().reading, Reading::new(10.0, 10.0));
    }
}
