//! Minimal TOML parser for the monitor configuration
//!
//! Handles only the subset `monitor.toml` uses:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - Integers in decimal or `0x` hexadecimal
//! - Comments (# ...)
//!
//! Unknown keys are ignored so older firmware accepts newer files.

use super::types::{
    IndicatorPattern, MonitorConfig, MAX_BAR_LEDS, MAX_COLUMNS, MAX_DEVICE_ADDRESS, MAX_ROWS,
    MIN_DEVICE_ADDRESS, MIN_SAMPLE_INTERVAL_MS,
};
use crate::reading::TemperatureUnit;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or syntax
    InvalidValue,
    /// Value parsed but is outside the supported range
    OutOfRange,
    /// Sensor and display configured at the same bus address
    AddressConflict,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Sensor,
    Display,
    Indicator,
    Console,
}

/// Parse TOML configuration into MonitorConfig
pub fn parse_config(input: &str) -> Result<MonitorConfig, ParseError> {
    let mut config = MonitorConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let end = line.find(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(&line[1..end])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    if config.sensor.address == config.display.address {
        return Err(ParseError::AddressConflict);
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "bus" | "i2c" => Ok(Section::Bus),
        "sensor" => Ok(Section::Sensor),
        "display" => Ok(Section::Display),
        "indicator" => Ok(Section::Indicator),
        "console" => Ok(Section::Console),
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip an inline comment unless the # sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_u32(value: &str) -> Result<u32, ParseError> {
    // Integer literals may use `_` separators, e.g. `100_000`
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }

    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_in_range(value: &str, min: u32, max: u32) -> Result<u32, ParseError> {
    let v = parse_u32(value)?;
    if v < min || v > max {
        return Err(ParseError::OutOfRange);
    }
    Ok(v)
}

fn parse_address(value: &str) -> Result<u8, ParseError> {
    parse_in_range(value, MIN_DEVICE_ADDRESS as u32, MAX_DEVICE_ADDRESS as u32).map(|v| v as u8)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_pattern(value: &str) -> Result<IndicatorPattern, ParseError> {
    match parse_string(value) {
        "fill" => Ok(IndicatorPattern::Fill),
        "solid" => Ok(IndicatorPattern::Solid),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_unit(value: &str) -> Result<TemperatureUnit, ParseError> {
    match parse_string(value) {
        "celsius" | "C" => Ok(TemperatureUnit::Celsius),
        "fahrenheit" | "F" => Ok(TemperatureUnit::Fahrenheit),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MonitorConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Bus => match key {
            "frequency_hz" => config.bus.frequency_hz = parse_in_range(value, 10_000, 1_000_000)?,
            "write_attempts" => config.bus.write_attempts = parse_in_range(value, 1, 10)? as u8,
            "retry_delay_us" => config.bus.retry_delay_us = parse_in_range(value, 0, 100_000)?,
            _ => {}
        },
        Section::Sensor => match key {
            "address" => config.sensor.address = parse_address(value)?,
            "sample_interval_ms" => {
                config.sensor.sample_interval_ms =
                    parse_in_range(value, MIN_SAMPLE_INTERVAL_MS, 3_600_000)?
            }
            "verify_crc" => config.sensor.verify_crc = parse_bool(value)?,
            _ => {}
        },
        Section::Display => match key {
            "address" => config.display.address = parse_address(value)?,
            "columns" => {
                config.display.columns = parse_in_range(value, 8, MAX_COLUMNS as u32)? as u8
            }
            "rows" => config.display.rows = parse_in_range(value, 2, MAX_ROWS as u32)? as u8,
            "backlight" => config.display.backlight = parse_bool(value)?,
            _ => {}
        },
        Section::Indicator => match key {
            "pattern" => config.indicator.pattern = parse_pattern(value)?,
            "bar_leds" => {
                config.indicator.bar_leds = parse_in_range(value, 0, MAX_BAR_LEDS as u32)? as u8
            }
            _ => {}
        },
        Section::Console => {
            if key == "unit" {
                config.console.unit = parse_unit(value)?;
            }
        }
        Section::Root => {}
    }
    Ok(())
}
