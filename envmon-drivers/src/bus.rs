//! Bounded retry for bus writes
//!
//! Transient noise on the shared bus is retried a fixed number of times
//! with a short pause between attempts. A write that reports fewer bytes
//! than requested counts as a failed attempt.

use embedded_hal::delay::DelayNs;
use envmon_core::config::BusConfig;
use envmon_hal::I2cBus;

/// Retry ceiling and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub attempts: u8,
    /// Pause before each retry (µs)
    pub delay_us: u32,
}

impl RetryPolicy {
    /// Three attempts, 100 µs apart
    pub const DEFAULT: Self = Self {
        attempts: 3,
        delay_us: 100,
    };

    /// Single attempt, no retry
    pub const NONE: Self = Self {
        attempts: 1,
        delay_us: 0,
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&BusConfig> for RetryPolicy {
    fn from(config: &BusConfig) -> Self {
        Self {
            attempts: config.write_attempts.max(1),
            delay_us: config.retry_delay_us,
        }
    }
}

/// Outcome of the final failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryError<E> {
    /// The bus reported an error
    Bus(E),
    /// The bus accepted fewer bytes than requested
    Incomplete { written: usize },
}

/// Write `data` to `address`, retrying per `policy`
///
/// Returns the error of the last attempt once all attempts failed.
pub fn write_with_retry<B, D>(
    bus: &mut B,
    delay: &mut D,
    address: u8,
    data: &[u8],
    policy: RetryPolicy,
) -> Result<(), RetryError<B::Error>>
where
    B: I2cBus,
    D: DelayNs,
{
    let attempts = policy.attempts.max(1);
    let mut last = RetryError::Incomplete { written: 0 };

    for attempt in 0..attempts {
        if attempt > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "I2C write to {=u8:#x} failed, retry {}/{}",
                address,
                attempt,
                attempts - 1
            );
            delay.delay_us(policy.delay_us);
        }

        match bus.write(address, data) {
            Ok(n) if n == data.len() => return Ok(()),
            Ok(n) => last = RetryError::Incomplete { written: n },
            Err(e) => last = RetryError::Bus(e),
        }
    }

    Err(last)
}
