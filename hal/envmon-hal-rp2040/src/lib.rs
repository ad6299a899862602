//! RP2040-specific HAL for the environmental monitor firmware
//!
//! This crate provides RP2040 implementations of the shared `envmon-hal`
//! traits, plus RP2040-specific functionality:
//!
//! - Blocking I2C master (implements `envmon_hal::I2cBus`)
//! - GPIO indicator outputs (implements `envmon_hal::OutputPin`)
//! - PIO-based WS2812 pixel strip output

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod ws2812;

// Re-export shared traits from envmon-hal for convenience
pub use envmon_hal::{I2cBus, OutputPin};
