//! Serial command console
//!
//! Bytes from the UART are assembled into lines by [`LineBuffer`], parsed
//! into a [`Command`] and executed against the [`Sampler`] and the active
//! [`TemperatureUnit`]. Responses are plain text with CRLF line endings.

pub mod command;
pub mod line;

pub use command::{Command, CommandError, COMMANDS};
pub use line::{LineBuffer, LineEvent, ERASE_SEQUENCE, LINE_CAPACITY};

use core::fmt::{self, Write};

use crate::reading::TemperatureUnit;
use crate::sampler::Sampler;

/// Greeting written when the console starts
pub const BANNER: &str = "\r\n=== Environment Monitor Console ===\r\nType HELP for available commands\r\n\r\n";

/// State the console commands act on
pub struct ConsoleContext<'a> {
    pub sampler: &'a mut Sampler,
    pub unit: &'a mut TemperatureUnit,
}

/// Parse and run one line, writing the response to `out`
///
/// Blank lines produce no output.
pub fn run_line<W: Write>(line: &str, ctx: &mut ConsoleContext<'_>, out: &mut W) -> fmt::Result {
    match Command::parse(line) {
        Ok(cmd) => execute(cmd, ctx, out),
        Err(CommandError::Empty) => Ok(()),
        Err(e) => write_error(e, line, out),
    }
}

/// Execute a parsed command
pub fn execute<W: Write>(cmd: Command, ctx: &mut ConsoleContext<'_>, out: &mut W) -> fmt::Result {
    match cmd {
        Command::MockTemp(celsius) => {
            ctx.sampler.set_mock_temperature(celsius);
            write!(
                out,
                "OK: Mock temperature set to {:.2} C (Mock mode: ON)\r\n",
                celsius
            )
        }
        Command::MockHumid(percent) => {
            if !(0.0..=100.0).contains(&percent) {
                write!(
                    out,
                    "WARNING: Humidity value {:.2} is outside normal range (0-100%)\r\n",
                    percent
                )?;
            }
            ctx.sampler.set_mock_humidity(percent);
            write!(
                out,
                "OK: Mock humidity set to {:.2}% (Mock mode: ON)\r\n",
                percent
            )
        }
        Command::MockOff => {
            ctx.sampler.clear_mock();
            out.write_str("OK: Mock mode disabled (using real sensor)\r\n")
        }
        Command::Status => write_status(ctx, out),
        Command::Help => write_help(out),
        Command::Unit(unit) => {
            *ctx.unit = unit;
            write!(out, "OK: Temperature unit set to {}\r\n", unit.name())
        }
    }
}

fn write_status<W: Write>(ctx: &ConsoleContext<'_>, out: &mut W) -> fmt::Result {
    let sample = ctx.sampler.current();
    let unit = *ctx.unit;

    out.write_str("\r\n=== System Status ===\r\n")?;
    write!(
        out,
        "Mock mode: {}\r\n",
        if sample.mock { "ENABLED" } else { "DISABLED" }
    )?;
    write!(
        out,
        "Temperature: {:.2} {}\r\n",
        unit.convert(sample.reading.temperature),
        unit.symbol()
    )?;
    write!(out, "Humidity: {:.2}%\r\n", sample.reading.humidity)?;
    if sample.stale {
        write!(
            out,
            "Sensor: last read failed ({} in a row), showing previous values\r\n",
            ctx.sampler.consecutive_failures()
        )?;
    }
    out.write_str("\r\n")
}

fn write_help<W: Write>(out: &mut W) -> fmt::Result {
    out.write_str("\r\n=== Available Commands ===\r\n")?;
    for (usage, description) in COMMANDS {
        write!(out, "{:<20}- {}\r\n", usage, description)?;
    }
    out.write_str("\r\nExamples:\r\n  MOCK_TEMP 28.5\r\n  MOCK_HUMID 75\r\n  MOCK_OFF\r\n")?;
    out.write_str("\r\nCommands are case-insensitive.\r\n\r\n")
}

/// Describe a parse failure
pub fn write_error<W: Write>(err: CommandError, line: &str, out: &mut W) -> fmt::Result {
    match err {
        CommandError::Empty => Ok(()),
        CommandError::Unknown => {
            let name = line.split_ascii_whitespace().next().unwrap_or("");
            write!(
                out,
                "ERROR: Unknown command '{}'. Type HELP for available commands.\r\n",
                name
            )
        }
        CommandError::MissingArgument(cmd) => write!(
            out,
            "ERROR: {} requires a value\r\nUsage: {} <value>\r\n",
            cmd, cmd
        ),
        CommandError::InvalidArgument(cmd) => {
            write!(out, "ERROR: {} value must be a number\r\n", cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use heapless::String;

    fn run(line: &str, sampler: &mut Sampler, unit: &mut TemperatureUnit) -> String<1024> {
        let mut out = String::new();
        let mut ctx = ConsoleContext { sampler, unit };
        run_line(line, &mut ctx, &mut out).unwrap();
        out
    }

    #[test]
    fn test_mock_temp_sets_sampler() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;

        let out = run("MOCK_TEMP 28.5", &mut sampler, &mut unit);
        assert_eq!(
            out.as_str(),
            "OK: Mock temperature set to 28.50 C (Mock mode: ON)\r\n"
        );
        assert!(sampler.is_mock());
        assert_eq!(sampler.current().reading.temperature, 28.5);
    }

    #[test]
    fn test_mock_humid_out_of_range_warns() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;

        let out = run("mock_humid 120", &mut sampler, &mut unit);
        assert!(out.starts_with("WARNING: Humidity value 120.00"));
        assert!(out.ends_with("OK: Mock humidity set to 120.00% (Mock mode: ON)\r\n"));
        assert_eq!(sampler.current().reading.humidity, 120.0);
    }

    #[test]
    fn test_mock_off() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;
        sampler.set_mock_temperature(10.0);

        run("MOCK_OFF", &mut sampler, &mut unit);
        assert!(!sampler.is_mock());
    }

    #[test]
    fn test_unit_switch_and_status() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;
        sampler.record(Ok(Reading::new(40.0, 20.0)));

        let out = run("F", &mut sampler, &mut unit);
        assert_eq!(out.as_str(), "OK: Temperature unit set to Fahrenheit\r\n");
        assert_eq!(unit, TemperatureUnit::Fahrenheit);

        let out = run("STATUS", &mut sampler, &mut unit);
        assert!(out.contains("Mock mode: DISABLED"));
        assert!(out.contains("Temperature: 68.00 F"));
        assert!(out.contains("Humidity: 40.00%"));
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;
        let out = run("help", &mut sampler, &mut unit);
        for (usage, _) in COMMANDS {
            assert!(out.contains(usage));
        }
    }

    #[test]
    fn test_errors_reported() {
        let mut sampler = Sampler::new();
        let mut unit = TemperatureUnit::Celsius;

        let out = run("reboot now", &mut sampler, &mut unit);
        assert_eq!(
            out.as_str(),
            "ERROR: Unknown command 'reboot'. Type HELP for available commands.\r\n"
        );

        let out = run("MOCK_TEMP", &mut sampler, &mut unit);
        assert!(out.starts_with("ERROR: MOCK_TEMP requires a value"));
        assert!(!sampler.is_mock());

        assert_eq!(run("   ", &mut sampler, &mut unit).as_str(), "");
    }
}
