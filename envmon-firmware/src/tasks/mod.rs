//! Embassy async tasks
//!
//! Each task runs independently and communicates via the shared state in
//! [`crate::channels`].

pub mod console;
pub mod monitor;
pub mod tick;

pub use console::console_task;
pub use monitor::{monitor_task, MonitorHardware};
pub use tick::tick_task;
