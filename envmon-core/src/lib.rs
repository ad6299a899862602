//! Board-agnostic core logic for the environmental monitor firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Device traits (humidity/temperature sensor, character display)
//! - Reading and temperature unit types
//! - Sampler state (latest reading, staleness, console overrides)
//! - Serial command console (line assembly, parsing, execution)
//! - LED indicator mapping
//! - Screen formatting for the character display
//! - Configuration type definitions and parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod indicator;
pub mod reading;
pub mod sampler;
pub mod screen;
pub mod traits;

pub use reading::{Reading, TemperatureUnit};
