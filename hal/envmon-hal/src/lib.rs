//! envmon Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the drivers are
//! written against. Chip-specific crates (currently RP2040) implement them,
//! and host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Drivers (envmon-drivers, envmon-core)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  envmon-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  envmon-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Blocking I2C master with transfer counts
//! - [`gpio::OutputPin`] - Digital output

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::{BusFault, I2cBus, I2cConfig, RefCellBus};
