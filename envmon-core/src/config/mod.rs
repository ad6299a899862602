//! Configuration types
//!
//! Board-agnostic configuration structures and the parser for the
//! `monitor.toml` text embedded in the firmware image.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
