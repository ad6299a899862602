//! Line assembly for the serial console

use heapless::String;

/// Maximum command line length; further input is dropped
pub const LINE_CAPACITY: usize = 64;

/// Terminal sequence that erases the character left of the cursor
pub const ERASE_SEQUENCE: &str = "\x08 \x08";

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Result of feeding one input byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Nothing to do (empty line, ignored control byte, overflow)
    None,
    /// Byte was accepted and should be echoed
    Echo(u8),
    /// Last character was removed; send [`ERASE_SEQUENCE`]
    Erase,
    /// A complete line was entered
    Line(String<LINE_CAPACITY>),
}

/// Accumulates console input bytes into command lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: String<LINE_CAPACITY>,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Process one received byte
    pub fn feed(&mut self, byte: u8) -> LineEvent {
        match byte {
            b'\r' | b'\n' => {
                if self.buf.is_empty() {
                    LineEvent::None
                } else {
                    LineEvent::Line(core::mem::take(&mut self.buf))
                }
            }
            BACKSPACE | DELETE => match self.buf.pop() {
                Some(_) => LineEvent::Erase,
                None => LineEvent::None,
            },
            0x20..=0x7E => match self.buf.push(byte as char) {
                Ok(()) => LineEvent::Echo(byte),
                Err(()) => LineEvent::None,
            },
            _ => LineEvent::None,
        }
    }

    /// Text entered so far
    pub fn pending(&self) -> &str {
        &self.buf
    }
}
