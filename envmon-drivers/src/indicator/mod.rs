//! Indicator outputs

pub mod led_bar;

pub use led_bar::LedBar;
