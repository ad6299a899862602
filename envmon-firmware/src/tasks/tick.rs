//! Sample interval ticker

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Signal to the monitor task that a measurement is due
///
/// Carries milliseconds since the task started.
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Tick task - signals a measurement every `interval_ms`
#[embassy_executor::task]
pub async fn tick_task(interval_ms: u32) {
    info!("Tick task started ({} ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));
    let start = Instant::now();

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(start.elapsed().as_millis() as u32);
    }
}
