//! Character display drivers

pub mod hd44780;
pub mod pcf8574;

pub use hd44780::{Geometry, Lcd};
pub use pcf8574::ExpanderByte;
