//! envmon - Environmental Monitor Firmware
//!
//! Main firmware binary for RP2040-based monitor boards. Reads a DHT20
//! humidity/temperature sensor over I2C and shows the values on an
//! HD44780 character LCD (behind a PCF8574 expander), a humidity LED bar
//! and a WS2812 temperature strip. A serial console on UART0 can override
//! the readings for testing.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use envmon_core::config::{parse_config, MonitorConfig};
use envmon_drivers::indicator::LedBar;
use envmon_hal::I2cConfig;
use envmon_hal_rp2040::gpio::LedPin;
use envmon_hal_rp2040::i2c::Rp2040I2c;
use envmon_hal_rp2040::ws2812::PixelStrip;

use crate::channels::UNIT;
use crate::tasks::MonitorHardware;

/// Embedded configuration (compiled into firmware)
/// Edit monitor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../monitor.toml");

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("envmon firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    *UNIT.lock().await = config.console.unit;
    info!(
        "Config: sensor={=u8:#x} display={=u8:#x} {}x{} interval={}ms",
        config.sensor.address,
        config.display.address,
        config.display.columns,
        config.display.rows,
        config.sensor.sample_interval_ms
    );

    // I2C0 shared by the sensor and the LCD backpack
    // Pin assignments: SDA=GPIO4, SCL=GPIO5
    let i2c = Rp2040I2c::new(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        I2cConfig {
            frequency: config.bus.frequency_hz,
        },
    );
    info!("I2C initialized at {} Hz", config.bus.frequency_hz);

    // Humidity bar on GPIO10..GPIO15
    let bar = LedBar::with_len(
        [
            LedPin::new(p.PIN_10),
            LedPin::new(p.PIN_11),
            LedPin::new(p.PIN_12),
            LedPin::new(p.PIN_13),
            LedPin::new(p.PIN_14),
            LedPin::new(p.PIN_15),
        ],
        config.indicator.bar_leds as usize,
    );

    // Temperature strip data line on GPIO2, driven by PIO0 SM0
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let strip = PixelStrip::new(&mut common, sm0, p.PIN_2);
    info!("LED outputs initialized");

    // Console UART (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for console");

    let hardware = MonitorHardware { i2c, bar, strip };

    // Spawn tasks
    spawner
        .spawn(tasks::tick_task(config.sensor.sample_interval_ms))
        .unwrap();
    spawner.spawn(tasks::monitor_task(hardware, config)).unwrap();
    spawner.spawn(tasks::console_task(tx, rx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration
///
/// Falls back to built-in defaults if monitor.toml is broken, which the
/// build script should already have caught.
fn load_config() -> MonitorConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            MonitorConfig::default()
        }
    }
}
