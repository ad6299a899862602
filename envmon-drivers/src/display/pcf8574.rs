//! PCF8574 output register layout for HD44780 backpacks
//!
//! ```text
//! bit  7   6   5   4   3   2   1   0
//!     D7  D6  D5  D4  BL  EN  RW  RS
//! ```
//!
//! The LCD runs in 4-bit mode, so each data nibble travels in bits 7..4.
//! RW is always 0 (write only).

/// Default address of common backpacks (A0-A2 high)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Register select: 1 = character data, 0 = instruction
pub const RS: u8 = 0x01;
/// Read/write select (unused, always write)
pub const RW: u8 = 0x02;
/// Enable strobe
pub const EN: u8 = 0x04;
/// Backlight transistor
pub const BL: u8 = 0x08;
/// Data nibble bits
pub const DATA_MASK: u8 = 0xF0;

/// Builder for one expander register value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpanderByte(u8);

impl ExpanderByte {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Place the upper nibble of `value` on D7..D4
    pub const fn nibble(self, value: u8) -> Self {
        Self((self.0 & !DATA_MASK) | (value & DATA_MASK))
    }

    pub const fn data(self, data: bool) -> Self {
        self.set(RS, data)
    }

    pub const fn enable(self, on: bool) -> Self {
        self.set(EN, on)
    }

    pub const fn backlight(self, on: bool) -> Self {
        self.set(BL, on)
    }

    const fn set(self, mask: u8, on: bool) -> Self {
        if on {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_positions() {
        assert_eq!(ExpanderByte::new().data(true).bits(), 0x01);
        assert_eq!(ExpanderByte::new().enable(true).bits(), 0x04);
        assert_eq!(ExpanderByte::new().backlight(true).bits(), 0x08);
        assert_eq!(RW, 0x02);
    }

    #[test]
    fn test_nibble_keeps_control_bits() {
        let b = ExpanderByte::new().backlight(true).data(true).nibble(0x4A);
        assert_eq!(b.bits(), 0x49);
        assert_eq!(b.nibble(0x30).bits(), 0x39);
    }

    #[test]
    fn test_clear_bits() {
        let b = ExpanderByte::new().nibble(0xF0).enable(true).backlight(true);
        assert_eq!(b.bits(), 0xFC);
        assert_eq!(b.enable(false).bits(), 0xF8);
        assert_eq!(b.backlight(false).enable(false).bits(), 0xF0);
    }
}
