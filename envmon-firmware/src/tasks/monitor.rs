//! Sensor sampling and output rendering
//!
//! Owns the I2C bus. The sensor and the display share it through
//! `RefCell` handles, so every driver call finishes before the next one
//! starts. Measurements run on each tick; the LCD, LED bar and pixel strip
//! are redrawn whenever the sampler has news or the console asks for it.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::{I2C0, PIO0};
use embassy_time::{Delay, Timer};

use envmon_core::config::{IndicatorPattern, MonitorConfig};
use envmon_core::indicator::{strip_frame, OFF, STRIP_LEN};
use envmon_core::sampler::Sample;
use envmon_core::screen::{render_sample, render_startup};
use envmon_core::traits::{CharacterDisplay, DisplayError, EnvironmentSensor, SensorError};
use envmon_core::TemperatureUnit;
use envmon_drivers::bus::RetryPolicy;
use envmon_drivers::display::{Geometry, Lcd};
use envmon_drivers::indicator::LedBar;
use envmon_drivers::sensor::Dht20;
use envmon_hal::i2c::{scan, RefCellBus};
use envmon_hal_rp2040::gpio::LedPin;
use envmon_hal_rp2040::i2c::Rp2040I2c;
use envmon_hal_rp2040::ws2812::PixelStrip;

use super::tick::TICK_SIGNAL;
use crate::channels::{REFRESH, SAMPLER, UNIT};

/// Humidity bar LEDs wired on the board (GPIO10..GPIO15)
pub const BAR_PINS: usize = 6;

/// Dim white used by the startup sweep
const SWEEP_COLOR: u32 = 0x08_08_08;

/// Time each sweep step stays lit
const SWEEP_STEP_MS: u64 = 300;

pub type HumidityBar = LedBar<LedPin<'static>, BAR_PINS>;
pub type TempStrip = PixelStrip<'static, PIO0, 0>;

/// Peripherals handed to the monitor task
pub struct MonitorHardware {
    pub i2c: Rp2040I2c<'static, I2C0>,
    pub bar: HumidityBar,
    pub strip: TempStrip,
}

/// Monitor task - samples the sensor and drives all outputs
#[embassy_executor::task]
pub async fn monitor_task(hw: MonitorHardware, config: MonitorConfig) {
    info!("Monitor task started");

    let MonitorHardware {
        i2c,
        mut bar,
        mut strip,
    } = hw;
    let bus = RefCell::new(i2c);

    let found = scan(&mut RefCellBus::new(&bus), |address| {
        info!("I2C device at {=u8:#x}", address)
    });
    info!("I2C scan found {} device(s)", found);

    let mut sensor = Dht20::with_address(RefCellBus::new(&bus), Delay, config.sensor.address);
    sensor.set_crc_check(config.sensor.verify_crc);
    match sensor.init() {
        Ok(()) => info!("Sensor ready at {=u8:#x}", config.sensor.address),
        Err(e) => error!("Sensor init failed: {:?}", e),
    }

    let geometry = Geometry {
        columns: config.display.columns,
        rows: config.display.rows,
    };
    let mut lcd = Lcd::with_config(RefCellBus::new(&bus), Delay, config.display.address, geometry)
        .with_retry(RetryPolicy::from(&config.bus))
        .with_backlight(config.display.backlight);
    match lcd.init().and_then(|()| render_startup(&mut lcd)) {
        Ok(()) => info!("Display ready at {=u8:#x}", config.display.address),
        Err(e) => error!("Display init failed: {:?}", e),
    }

    self_test(&mut bar, &mut strip).await;

    loop {
        let refresh = match select(TICK_SIGNAL.wait(), REFRESH.wait()).await {
            Either::First(_) => {
                measure(&mut sensor).await;
                false
            }
            Either::Second(()) => true,
        };

        let sample = {
            let mut sampler = SAMPLER.lock().await;
            match sampler.take() {
                Some(sample) => Some(sample),
                None if refresh => sampler.latest(),
                None => None,
            }
        };

        if let Some(sample) = sample {
            let unit = *UNIT.lock().await;
            show_lcd(&mut lcd, &sample, unit);
            bar.show_humidity(sample.reading.humidity);
            show_strip(&mut strip, config.indicator.pattern, sample.reading.temperature).await;
        }
    }
}

/// Take one measurement unless console overrides are active
async fn measure(sensor: &mut impl EnvironmentSensor) {
    if !SAMPLER.lock().await.wants_measurement() {
        return;
    }

    let result = match sensor.read() {
        // Sensor was absent at boot; try to bring it up now
        Err(SensorError::NotInitialized) => sensor.init().and_then(|()| sensor.read()),
        other => other,
    };

    match &result {
        Ok(reading) => debug!(
            "Measured {}% {}C",
            reading.humidity, reading.temperature
        ),
        Err(e) => warn!("Sensor read failed: {:?}", e),
    }

    SAMPLER.lock().await.record(result);
}

fn show_lcd(lcd: &mut impl CharacterDisplay, sample: &Sample, unit: TemperatureUnit) {
    let result = match render_sample(lcd, sample, unit) {
        Err(DisplayError::NotInitialized) => lcd
            .init()
            .and_then(|()| render_sample(lcd, sample, unit)),
        other => other,
    };
    if let Err(e) = result {
        // Next render repositions the cursor before each row
        warn!("Display update failed: {:?}", e);
    }
}

async fn show_strip(strip: &mut TempStrip, pattern: IndicatorPattern, celsius: f32) {
    strip.write(&strip_frame(pattern, celsius)).await;
}

/// Light the bar and strip one step at a time, then switch everything off
async fn self_test(bar: &mut HumidityBar, strip: &mut TempStrip) {
    info!("LED self-test");

    let mut frame = [OFF; STRIP_LEN];
    for step in 0..bar.len().max(STRIP_LEN) {
        bar.set_level(step + 1);
        if let Some(px) = frame.get_mut(step) {
            *px = SWEEP_COLOR;
        }
        strip.write(&frame).await;
        Timer::after_millis(SWEEP_STEP_MS).await;
    }

    bar.set_level(0);
    strip.write(&[OFF; STRIP_LEN]).await;
}
