//! Character display trait

/// Errors that can occur while driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// A bus write still failed after all retry attempts
    Communication,
    /// Operation attempted before a successful `init`
    NotInitialized,
}

/// Trait for text-mode character displays
///
/// Rows and columns are zero-based. Positions outside the panel are
/// ignored rather than reported as errors.
pub trait CharacterDisplay {
    /// Run the power-on sequence and leave the display cleared
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear all characters and return the cursor to (0, 0)
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Return the cursor to (0, 0) without clearing
    fn home(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor; out-of-range positions are a no-op
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Write text at the cursor
    ///
    /// `'\n'` moves to the start of the second row. Other bytes are sent
    /// unchanged.
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Switch the backlight on or off
    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Panel size as (columns, rows)
    fn dimensions(&self) -> (u8, u8);
}

/// Helper trait for common display layouts
pub trait DisplayExt: CharacterDisplay {
    /// Write `text` at the start of `row`
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(0, row)?;
        self.print(text)
    }
}

// Blanket implementation for all CharacterDisplay types
impl<T: CharacterDisplay> DisplayExt for T {}
