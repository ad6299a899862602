//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in envmon-core for the monitor's peripherals:
//!
//! - Humidity/temperature sensor (DHT20)
//! - Character LCD (HD44780 behind a PCF8574 I/O expander)
//! - Discrete LED bar
//! - Bus write retry helper shared by the I2C drivers
//!
//! All drivers are synchronous. Timing uses `embedded_hal::delay::DelayNs`
//! busy-waits, so one driver call runs to completion before the bus is
//! used again.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod display;
pub mod indicator;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
