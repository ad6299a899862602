//! PIO-based WS2812 pixel strip output
//!
//! Uses RP2040's Programmable I/O to generate the single-wire WS2812
//! bit stream. Each bit is 10 PIO cycles long (T1 + T2 + T3); the clock
//! divider is chosen so one bit lasts 1.25 µs (800 kHz).
//!
//! Pixels are shifted out MSB first as 24-bit GRB words left-aligned in
//! the 32-bit FIFO word.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, PioPin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;

/// WS2812 bit rate in Hz
pub const BIT_RATE_HZ: u32 = 800_000;

/// Cycles the line is low before the data decision
const T1: u32 = 2;
/// Cycles the line carries the data bit
const T2: u32 = 5;
/// Cycles the line is low after the data bit
const T3: u32 = 3;

/// PIO cycles per transmitted bit
pub const CYCLES_PER_BIT: u32 = T1 + T2 + T3;

/// Bits per pixel (GRB, 8 bits each)
const BITS_PER_PIXEL: u8 = 24;

/// Calculate the 16.8 fixed-point clock divider for the WS2812 bit rate
///
/// Returns (integer_part, fractional_part).
pub fn calc_clock_divider(sys_clk_hz: u32) -> (u16, u8) {
    let divisor = BIT_RATE_HZ as u64 * CYCLES_PER_BIT as u64;
    let divider_x256 = (sys_clk_hz as u64 * 256) / divisor;

    let int_part = (divider_x256 / 256).min(0xFFFF) as u16;
    let frac_part = (divider_x256 % 256) as u8;

    (int_part, frac_part)
}

/// Left-align a 24-bit GRB colour for the output shift register
pub const fn fifo_word(grb: u32) -> u32 {
    (grb & 0x00FF_FFFF) << 8
}

/// WS2812 strip driven by one PIO state machine
pub struct PixelStrip<'d, P: Instance, const S: usize> {
    sm: StateMachine<'d, P, S>,
}

impl<'d, P: Instance, const S: usize> PixelStrip<'d, P, S> {
    /// Load the WS2812 program and start the state machine on `pin`
    pub fn new(
        common: &mut Common<'d, P>,
        mut sm: StateMachine<'d, P, S>,
        pin: Peri<'d, impl PioPin>,
    ) -> Self {
        let prg = pio_proc::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1        side 0 [2]",
            "    jmp !x do_zero  side 1 [1]",
            "    jmp bitloop     side 1 [4]",
            "do_zero:",
            "    nop             side 0 [4]",
            ".wrap",
        );

        let out_pin = common.make_pio_pin(pin);
        let loaded = common.load_program(&prg.program);

        let mut cfg = Config::default();
        cfg.use_program(&loaded, &[&out_pin]);

        let (int_part, frac_part) = calc_clock_divider(clk_sys_freq());
        cfg.clock_divider = U24F8::from_bits(((int_part as u32) << 8) | frac_part as u32);

        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: BITS_PER_PIXEL,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(Direction::Out, &[&out_pin]);
        sm.set_enable(true);

        Self { sm }
    }

    /// Shift out one frame of GRB colours
    ///
    /// The strip latches once the line stays low for the reset time, which
    /// the caller's next frame interval always exceeds.
    pub async fn write(&mut self, pixels: &[u32]) {
        for &grb in pixels {
            self.sm.tx().wait_push(fifo_word(grb)).await;
        }
    }
}
