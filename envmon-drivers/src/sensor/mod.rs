//! Humidity/temperature sensor drivers

pub mod dht20;

pub use dht20::Dht20;
