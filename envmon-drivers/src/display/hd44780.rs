//! HD44780 character LCD behind a PCF8574 I/O expander
//!
//! The controller runs in 4-bit mode. Every logical byte is sent as two
//! nibble transfers, high nibble first. One nibble transfer is three
//! register writes:
//!
//! 1. data + RS with EN low (setup)
//! 2. same with EN high, hold >= 1 µs
//! 3. EN low again (controller latches on the falling edge), hold >= 50 µs
//!
//! Each register write goes through [`write_with_retry`]; a write that
//! still fails after the retry ceiling aborts the operation with
//! [`DisplayError::Communication`]. After such a failure the controller's
//! address counter may be off, so callers should `set_cursor` before
//! writing again.

use embedded_hal::delay::DelayNs;
use envmon_core::traits::{CharacterDisplay, DisplayError};
use envmon_hal::I2cBus;

use super::pcf8574::{ExpanderByte, DEFAULT_ADDRESS};
use crate::bus::{write_with_retry, RetryPolicy};

/// Controller instructions
pub mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    /// Increment address, no display shift
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit interface, 2 lines, 5x8 font
    pub const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
    /// Upper nibble sent alone while forcing 8-bit mode
    pub const WAKE_8BIT: u8 = 0x30;
    /// Upper nibble sent alone to switch to the 4-bit interface
    pub const SELECT_4BIT: u8 = 0x20;
}

/// Power-up settle time before the first write (ms)
const POWER_ON_MS: u32 = 50;
/// Wait after the first wake nibble (ms)
const WAKE_FIRST_MS: u32 = 5;
/// Wait after the later wake nibbles and the mode switch (µs)
const WAKE_US: u32 = 150;
/// Execution time of clear and home (ms)
const CLEAR_HOME_MS: u32 = 2;
/// Enable pulse width (µs)
const ENABLE_PULSE_US: u32 = 1;
/// Execution time of ordinary instructions and data writes (µs)
const SETTLE_US: u32 = 50;

/// Panel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub columns: u8,
    pub rows: u8,
}

impl Geometry {
    pub const LCD_16X2: Self = Self {
        columns: 16,
        rows: 2,
    };

    pub const LCD_20X4: Self = Self {
        columns: 20,
        rows: 4,
    };

    /// DDRAM address of the first cell of each row
    ///
    /// Rows 2 and 3 continue rows 0 and 1 past the visible width.
    /// The 7-bit DDRAM address wraps, so oversized widths never overflow.
    pub const fn row_offsets(&self) -> [u8; 4] {
        [0x00, 0x40, self.columns, 0x40u8.wrapping_add(self.columns)]
    }

    pub const fn contains(&self, col: u8, row: u8) -> bool {
        col < self.columns && row < self.rows && row < 4
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::LCD_16X2
    }
}

/// HD44780 LCD driver over an I2C expander
pub struct Lcd<B, D> {
    bus: B,
    delay: D,
    address: u8,
    geometry: Geometry,
    backlight: bool,
    retry: RetryPolicy,
    initialized: bool,
}

impl<B: I2cBus, D: DelayNs> Lcd<B, D> {
    /// Create a 16x2 driver at the default expander address
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_config(bus, delay, DEFAULT_ADDRESS, Geometry::LCD_16X2)
    }

    /// Create a driver for a specific address and panel size
    pub fn with_config(bus: B, delay: D, address: u8, geometry: Geometry) -> Self {
        Self {
            bus,
            delay,
            address,
            geometry,
            backlight: true,
            retry: RetryPolicy::DEFAULT,
            initialized: false,
        }
    }

    /// Set the retry policy for register writes
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Backlight state used from `init` on
    pub fn with_backlight(mut self, on: bool) -> Self {
        self.backlight = on;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Release the bus and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    /// Write one expander register value
    fn write_register(&mut self, value: ExpanderByte) -> Result<(), DisplayError> {
        write_with_retry(
            &mut self.bus,
            &mut self.delay,
            self.address,
            &[value.bits()],
            self.retry,
        )
        .map_err(|_| DisplayError::Communication)
    }

    /// Transfer the upper nibble of `value`
    fn write4bits(&mut self, value: u8, data: bool) -> Result<(), DisplayError> {
        let reg = ExpanderByte::new()
            .nibble(value)
            .data(data)
            .backlight(self.backlight);

        self.write_register(reg)?;
        self.write_register(reg.enable(true))?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.write_register(reg.enable(false))?;
        self.delay.delay_us(SETTLE_US);
        Ok(())
    }

    fn send(&mut self, value: u8, data: bool) -> Result<(), DisplayError> {
        self.write4bits(value & 0xF0, data)?;
        self.write4bits(value << 4, data)
    }

    fn command(&mut self, instruction: u8) -> Result<(), DisplayError> {
        self.send(instruction, false)
    }

    fn write_char(&mut self, c: u8) -> Result<(), DisplayError> {
        self.send(c, true)
    }

    fn clear_raw(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR_DISPLAY)?;
        self.delay.delay_ms(CLEAR_HOME_MS);
        Ok(())
    }

    fn set_cursor_raw(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if !self.geometry.contains(col, row) {
            return Ok(());
        }
        let offset = self.geometry.row_offsets()[row as usize];
        self.command(cmd::SET_DDRAM_ADDR | col.wrapping_add(offset))
    }

    /// Power-on sequence up to and including the entry mode
    fn init_sequence(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(POWER_ON_MS);

        // Force 8-bit mode three times, then switch to 4-bit. Only upper
        // nibbles are sent until the controller is in 4-bit mode.
        self.write4bits(cmd::WAKE_8BIT, false)?;
        self.delay.delay_ms(WAKE_FIRST_MS);
        self.write4bits(cmd::WAKE_8BIT, false)?;
        self.delay.delay_us(WAKE_US);
        self.write4bits(cmd::WAKE_8BIT, false)?;
        self.delay.delay_us(WAKE_US);
        self.write4bits(cmd::SELECT_4BIT, false)?;
        self.delay.delay_us(WAKE_US);

        self.command(cmd::FUNCTION_SET_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.command(cmd::ENTRY_MODE_INCREMENT)?;
        self.clear_raw()
    }
}

impl<B: I2cBus, D: DelayNs> CharacterDisplay for Lcd<B, D> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.initialized = false;
        self.init_sequence()?;
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.clear_raw()
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::RETURN_HOME)?;
        self.delay.delay_ms(CLEAR_HOME_MS);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.set_cursor_raw(col, row)
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        for b in text.bytes() {
            if b == b'\n' {
                self.set_cursor_raw(0, 1)?;
            } else {
                self.write_char(b)?;
            }
        }
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.backlight = on;
        self.write_register(ExpanderByte::new().backlight(on))
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.geometry.columns, self.geometry.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::pcf8574::{BL, EN, RS};
    use crate::mock::{MockBus, MockDelay};
    use heapless::Vec;

    /// Behavioural model of the controller fed with expander register values
    struct Controller {
        ddram: [u8; 128],
        addr: usize,
        four_bit: bool,
        pending: Option<u8>,
        last_en: bool,
        backlight: bool,
        instructions: Vec<u8, 64>,
    }

    impl Controller {
        fn new() -> Self {
            Self {
                ddram: [b' '; 128],
                addr: 0,
                four_bit: false,
                pending: None,
                last_en: false,
                backlight: false,
                instructions: Vec::new(),
            }
        }

        fn run(bus: &MockBus) -> Self {
            let mut c = Self::new();
            for reg in bus.bytes() {
                c.feed(reg);
            }
            c
        }

        fn feed(&mut self, reg: u8) {
            let en = reg & EN != 0;
            self.backlight = reg & BL != 0;
            if self.last_en && !en {
                self.latch(reg & 0xF0, reg & RS != 0);
            }
            self.last_en = en;
        }

        fn latch(&mut self, nibble: u8, rs: bool) {
            if !self.four_bit {
                if nibble == cmd::SELECT_4BIT {
                    self.four_bit = true;
                }
                self.instructions.push(nibble).unwrap();
                return;
            }
            match self.pending.take() {
                None => self.pending = Some(nibble),
                Some(high) => self.execute(high | (nibble >> 4), rs),
            }
        }

        fn execute(&mut self, value: u8, rs: bool) {
            if rs {
                self.ddram[self.addr] = value;
                self.addr = (self.addr + 1) & 0x7F;
                return;
            }
            self.instructions.push(value).unwrap();
            if value == cmd::CLEAR_DISPLAY {
                self.ddram = [b' '; 128];
                self.addr = 0;
            } else if value == cmd::RETURN_HOME {
                self.addr = 0;
            } else if value & cmd::SET_DDRAM_ADDR != 0 {
                self.addr = (value & 0x7F) as usize;
            }
        }

        fn text(&self, addr: usize, len: usize) -> &str {
            core::str::from_utf8(&self.ddram[addr..addr + len]).unwrap()
        }
    }

    fn ready_lcd() -> Lcd<MockBus, MockDelay> {
        let mut lcd = Lcd::new(MockBus::new(), MockDelay::new());
        lcd.init().unwrap();
        lcd
    }

    #[test]
    fn test_init_sequence() {
        let lcd = ready_lcd();
        let (bus, delay) = lcd.release();

        let ctrl = Controller::run(&bus);
        assert_eq!(
            ctrl.instructions.as_slice(),
            &[0x30, 0x30, 0x30, 0x20, 0x28, 0x0C, 0x06, 0x01]
        );
        assert!(ctrl.four_bit);
        assert!(ctrl.pending.is_none());
        assert!(bus.writes.iter().all(|w| w.address == 0x27));
        assert!(bus.bytes().all(|reg| reg & BL != 0));

        // Power-up wait comes before any bus traffic
        assert_eq!(delay.calls[0], 50_000_000);
        assert!(delay.total_ns >= 57_450_000);
    }

    #[test]
    fn test_nibble_transfer_framing() {
        let mut lcd = ready_lcd();
        lcd.bus.writes.clear();
        lcd.delay = MockDelay::new();

        lcd.print("A").unwrap();
        let regs: Vec<u8, 8> = lcd.bus.bytes().collect();
        assert_eq!(regs.as_slice(), &[0x49, 0x4D, 0x49, 0x19, 0x1D, 0x19]);
        assert_eq!(
            lcd.delay.calls.as_slice(),
            &[1_000, 50_000, 1_000, 50_000]
        );
    }

    #[test]
    fn test_print_newline_moves_to_second_row() {
        let mut lcd = ready_lcd();
        lcd.print("AB\nCD").unwrap();

        let ctrl = Controller::run(&lcd.bus);
        assert_eq!(ctrl.text(0x00, 2), "AB");
        assert_eq!(ctrl.text(0x40, 2), "CD");
        assert_eq!(ctrl.text(0x02, 1), " ");
    }

    #[test]
    fn test_print_after_init_starts_at_origin() {
        let mut lcd = ready_lcd();
        lcd.print("X").unwrap();
        assert_eq!(Controller::run(&lcd.bus).text(0, 1), "X");
    }

    #[test]
    fn test_empty_print_is_noop() {
        let mut lcd = ready_lcd();
        let before = lcd.bus.writes.len();
        lcd.print("").unwrap();
        assert_eq!(lcd.bus.writes.len(), before);
    }

    #[test]
    fn test_set_cursor_out_of_range_is_noop() {
        let mut lcd = ready_lcd();
        let before = lcd.bus.writes.len();
        lcd.set_cursor(16, 0).unwrap();
        lcd.set_cursor(0, 2).unwrap();
        assert_eq!(lcd.bus.writes.len(), before);

        lcd.set_cursor(5, 1).unwrap();
        assert_eq!(Controller::run(&lcd.bus).addr, 0x45);
    }

    #[test]
    fn test_row_offsets_20x4() {
        let mut lcd = Lcd::with_config(
            MockBus::new(),
            MockDelay::new(),
            0x27,
            Geometry::LCD_20X4,
        );
        lcd.init().unwrap();

        lcd.set_cursor(0, 2).unwrap();
        assert_eq!(Controller::run(&lcd.bus).addr, 0x14);
        lcd.set_cursor(3, 3).unwrap();
        assert_eq!(Controller::run(&lcd.bus).addr, 0x57);
        assert_eq!(lcd.dimensions(), (20, 4));
    }

    #[test]
    fn test_operations_before_init() {
        let mut lcd = Lcd::new(MockBus::new(), MockDelay::new());
        assert_eq!(lcd.clear(), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.home(), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.set_cursor(0, 0), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.print("hi"), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.set_backlight(false), Err(DisplayError::NotInitialized));
        assert!(lcd.bus.writes.is_empty());
    }

    #[test]
    fn test_transient_write_failure_retried() {
        let mut lcd = ready_lcd();
        lcd.bus.fail_writes = 2;
        lcd.print("Z").unwrap();
        assert_eq!(Controller::run(&lcd.bus).text(0, 1), "Z");
    }

    #[test]
    fn test_retry_exhaustion_fails() {
        let mut lcd = ready_lcd();
        let before = lcd.bus.writes.len();
        lcd.bus.fail_writes = 3;
        assert_eq!(lcd.print("Z"), Err(DisplayError::Communication));
        assert_eq!(lcd.bus.writes.len(), before);
    }

    #[test]
    fn test_init_failure() {
        let mut bus = MockBus::new();
        bus.fail_writes = 3;
        let mut lcd = Lcd::new(bus, MockDelay::new());
        assert_eq!(lcd.init(), Err(DisplayError::Communication));
        assert!(!lcd.is_initialized());
    }

    #[test]
    fn test_backlight_written_immediately() {
        let mut lcd = ready_lcd();
        lcd.set_backlight(false).unwrap();
        assert_eq!(lcd.bus.writes.last().unwrap().data.as_slice(), &[0x00]);

        lcd.print("a").unwrap();
        let regs: Vec<u8, 512> = lcd.bus.bytes().collect();
        assert!(regs[regs.len() - 6..].iter().all(|reg| reg & BL == 0));

        lcd.set_backlight(true).unwrap();
        assert_eq!(lcd.bus.writes.last().unwrap().data.as_slice(), &[BL]);
    }

    #[test]
    fn test_home() {
        let mut lcd = ready_lcd();
        lcd.print("abc").unwrap();
        lcd.delay = MockDelay::new();
        lcd.home().unwrap();
        let ctrl = Controller::run(&lcd.bus);
        assert_eq!(ctrl.addr, 0);
        assert_eq!(ctrl.text(0, 3), "abc");

        // Return home needs its full execution time after the last nibble
        assert_eq!(
            lcd.delay.calls.as_slice(),
            &[1_000, 50_000, 1_000, 50_000, 2_000_000]
        );
    }

    #[test]
    fn test_clear_waits_execution_time() {
        let mut lcd = ready_lcd();
        lcd.print("abc").unwrap();
        lcd.delay = MockDelay::new();
        lcd.clear().unwrap();

        assert_eq!(lcd.delay.calls.last(), Some(&2_000_000));
        assert!(lcd.delay.total_ns >= 2_000_000);

        let ctrl = Controller::run(&lcd.bus);
        assert_eq!(ctrl.instructions.last(), Some(&cmd::CLEAR_DISPLAY));
    }

    #[test]
    fn test_row_offsets_wide_geometry() {
        let wide = Geometry {
            columns: 200,
            rows: 4,
        };
        assert_eq!(wide.row_offsets(), [0x00, 0x40, 200, 0x08]);
        assert_eq!(Geometry::LCD_16X2.row_offsets(), [0x00, 0x40, 0x10, 0x50]);
    }
}
