//! Console command parsing

use crate::reading::TemperatureUnit;

/// A parsed console command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Override the temperature (°C) and enable mock mode
    MockTemp(f32),
    /// Override the relative humidity (%) and enable mock mode
    MockHumid(f32),
    /// Return to real sensor readings
    MockOff,
    Status,
    Help,
    /// Switch the presentation unit
    Unit(TemperatureUnit),
}

/// Command parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line contained only whitespace
    Empty,
    /// Name did not match any command
    Unknown,
    /// Command requires a value that was not given
    MissingArgument(&'static str),
    /// Value could not be parsed as a number
    InvalidArgument(&'static str),
}

/// Every command name with its help text
pub const COMMANDS: &[(&str, &str)] = &[
    ("MOCK_TEMP <value>", "Set mock temperature (enables mock mode)"),
    ("MOCK_HUMID <value>", "Set mock humidity (enables mock mode)"),
    ("MOCK_OFF", "Disable mock mode (use real sensor)"),
    ("STATUS", "Show current readings and mock state"),
    ("F | FAHRENHEIT", "Show temperatures in Fahrenheit"),
    ("C | CELSIUS", "Show temperatures in Celsius"),
    ("HELP", "Show this help message"),
];

impl Command {
    /// Parse one command line; the name is case-insensitive
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_ascii_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;
        let arg = tokens.next();

        let is = |candidate: &str| name.eq_ignore_ascii_case(candidate);

        if is("MOCK_TEMP") {
            parse_value("MOCK_TEMP", arg).map(Command::MockTemp)
        } else if is("MOCK_HUMID") {
            parse_value("MOCK_HUMID", arg).map(Command::MockHumid)
        } else if is("MOCK_OFF") {
            Ok(Command::MockOff)
        } else if is("STATUS") {
            Ok(Command::Status)
        } else if is("HELP") {
            Ok(Command::Help)
        } else if is("F") || is("FAHRENHEIT") {
            Ok(Command::Unit(TemperatureUnit::Fahrenheit))
        } else if is("C") || is("CELSIUS") {
            Ok(Command::Unit(TemperatureUnit::Celsius))
        } else {
            Err(CommandError::Unknown)
        }
    }
}

fn parse_value(command: &'static str, arg: Option<&str>) -> Result<f32, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(command))?;
    let value: f32 = arg
        .parse()
        .map_err(|_| CommandError::InvalidArgument(command))?;
    if !value.is_finite() {
        return Err(CommandError::InvalidArgument(command));
    }
    Ok(value)
}
