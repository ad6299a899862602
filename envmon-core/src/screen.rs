//! Character display layout
//!
//! ```text
//! +----------------+
//! |Temp: 23.4 C    |   last column: '*' when the reading is stale
//! |Hum : 45.6 %    |
//! +----------------+
//! ```
//!
//! Each line is padded to the panel width so shorter values overwrite
//! leftovers from the previous frame without a full clear.

use core::fmt::Write;

use heapless::String;

use crate::config::MAX_COLUMNS;
use crate::reading::TemperatureUnit;
use crate::sampler::Sample;
use crate::traits::{CharacterDisplay, DisplayError, DisplayExt};

/// One formatted display row
pub type Line = String<{ MAX_COLUMNS as usize }>;

/// Marker drawn in the last column of the temperature row when stale
pub const STALE_MARKER: char = '*';

const STARTUP_TITLE: &str = "Env Monitor";
const STARTUP_STATUS: &str = "Starting...";

/// Format `args` into a line exactly `columns` wide, with `marker` in the
/// last column
fn fit(args: core::fmt::Arguments<'_>, columns: usize, marker: char) -> Line {
    let columns = columns.clamp(1, MAX_COLUMNS as usize);
    let mut raw: Line = String::new();
    // Overflow only truncates; the line is cut to width below anyway
    let _ = raw.write_fmt(args);

    let mut line: Line = String::new();
    for c in raw.chars().take(columns - 1) {
        let _ = line.push(c);
    }
    while line.len() < columns - 1 {
        let _ = line.push(' ');
    }
    let _ = line.push(marker);
    line
}

/// Temperature row, converted to `unit`
pub fn temperature_line(celsius: f32, unit: TemperatureUnit, stale: bool, columns: u8) -> Line {
    let marker = if stale { STALE_MARKER } else { ' ' };
    fit(
        format_args!("Temp: {:4.1} {}", unit.convert(celsius), unit.symbol()),
        columns as usize,
        marker,
    )
}

/// Humidity row
pub fn humidity_line(humidity: f32, columns: u8) -> Line {
    fit(format_args!("Hum : {:4.1} %", humidity), columns as usize, ' ')
}

/// Show the startup screen
pub fn render_startup<D: CharacterDisplay>(display: &mut D) -> Result<(), DisplayError> {
    display.clear()?;
    display.write_line(0, STARTUP_TITLE)?;
    display.write_line(1, STARTUP_STATUS)
}

/// Draw a sample; the cursor is re-positioned before every row
pub fn render_sample<D: CharacterDisplay>(
    display: &mut D,
    sample: &Sample,
    unit: TemperatureUnit,
) -> Result<(), DisplayError> {
    let (columns, _) = display.dimensions();
    let temp = temperature_line(sample.reading.temperature, unit, sample.stale, columns);
    let hum = humidity_line(sample.reading.humidity, columns);

    display.write_line(0, &temp)?;
    display.write_line(1, &hum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;

    /// In-memory 16x2 panel
    struct MockDisplay {
        cells: [[u8; 16]; 2],
        col: usize,
        row: usize,
        cursor_moves: usize,
        fail: bool,
    }

    impl MockDisplay {
        fn new() -> Self {
            Self {
                cells: [[b' '; 16]; 2],
                col: 0,
                row: 0,
                cursor_moves: 0,
                fail: false,
            }
        }

        fn row(&self, row: usize) -> &str {
            core::str::from_utf8(&self.cells[row]).unwrap()
        }
    }

    impl CharacterDisplay for MockDisplay {
        fn init(&mut self) -> Result<(), DisplayError> {
            self.clear()
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.cells = [[b' '; 16]; 2];
            self.home()
        }

        fn home(&mut self) -> Result<(), DisplayError> {
            self.col = 0;
            self.row = 0;
            Ok(())
        }

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
            self.cursor_moves += 1;
            if col < 16 && row < 2 {
                self.col = col as usize;
                self.row = row as usize;
            }
            Ok(())
        }

        fn print(&mut self, text: &str) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            for b in text.bytes() {
                if self.col < 16 {
                    self.cells[self.row][self.col] = b;
                }
                self.col += 1;
            }
            Ok(())
        }

        fn set_backlight(&mut self, _on: bool) -> Result<(), DisplayError> {
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (16, 2)
        }
    }

    fn sample(humidity: f32, temperature: f32, stale: bool) -> Sample {
        Sample {
            reading: Reading::new(humidity, temperature),
            stale,
            mock: false,
        }
    }

    #[test]
    fn test_line_format() {
        let line = temperature_line(23.44, TemperatureUnit::Celsius, false, 16);
        assert_eq!(line.as_str(), "Temp: 23.4 C    ");
        let line = humidity_line(5.31, 16);
        assert_eq!(line.as_str(), "Hum :  5.3 %    ");
    }

    #[test]
    fn test_stale_marker_in_last_column() {
        let line = temperature_line(-3.0, TemperatureUnit::Celsius, true, 16);
        assert_eq!(line.as_str(), "Temp: -3.0 C   *");
    }

    #[test]
    fn test_fahrenheit_line() {
        let line = temperature_line(100.0, TemperatureUnit::Fahrenheit, false, 16);
        assert_eq!(line.as_str(), "Temp: 212.0 F   ");
    }

    #[test]
    fn test_narrow_panel_truncates() {
        let line = temperature_line(23.4, TemperatureUnit::Celsius, true, 8);
        assert_eq!(line.as_str(), "Temp: 2*");
    }

    #[test]
    fn test_render_sample() {
        let mut lcd = MockDisplay::new();
        render_sample(&mut lcd, &sample(45.6, 23.4, false), TemperatureUnit::Celsius).unwrap();
        assert_eq!(lcd.row(0), "Temp: 23.4 C    ");
        assert_eq!(lcd.row(1), "Hum : 45.6 %    ");
        assert_eq!(lcd.cursor_moves, 2);
    }

    #[test]
    fn test_render_startup() {
        let mut lcd = MockDisplay::new();
        render_startup(&mut lcd).unwrap();
        assert!(lcd.row(0).starts_with("Env Monitor"));
        assert!(lcd.row(1).starts_with("Starting..."));
    }

    #[test]
    fn test_render_propagates_failure() {
        let mut lcd = MockDisplay::new();
        lcd.fail = true;
        let result = render_sample(&mut lcd, &sample(45.6, 23.4, false), TemperatureUnit::Celsius);
        assert_eq!(result, Err(DisplayError::Communication));
    }
}
