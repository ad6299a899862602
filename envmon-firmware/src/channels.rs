//! Inter-task shared state
//!
//! The sampler and the display unit are touched by both the monitor task
//! and the console task; each access holds the mutex for the whole
//! operation.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use envmon_core::sampler::Sampler;
use envmon_core::TemperatureUnit;

/// Latest reading, staleness and console overrides
pub static SAMPLER: Mutex<CriticalSectionRawMutex, Sampler> = Mutex::new(Sampler::new());

/// Unit used on the display and in console output
pub static UNIT: Mutex<CriticalSectionRawMutex, TemperatureUnit> =
    Mutex::new(TemperatureUnit::Celsius);

/// Console changed something the outputs should show right away
pub static REFRESH: Signal<CriticalSectionRawMutex, ()> = Signal::new();
