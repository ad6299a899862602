//! Device abstraction traits
//!
//! These traits define the interface between the application logic
//! and the concrete sensor and display drivers.

pub mod display;
pub mod sensor;

pub use display::{CharacterDisplay, DisplayError, DisplayExt};
pub use sensor::{EnvironmentSensor, SensorError};
