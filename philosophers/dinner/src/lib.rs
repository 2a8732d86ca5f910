//! Dining Philosophers Driver Library
//!
//! Seats a table of philosopher actors around a shared
//! [`ResourceMonitor`](philosophers_monitor::ResourceMonitor), narrates what
//! they do, and reports how the dinner went.

pub mod actor;
mod config;
pub mod constants;
mod dinner;
pub mod structured_logging;

pub use config::{DinnerConfig, parse_philosopher_count};
pub use dinner::{Dinner, DinnerSummary, SeatedDinner, ShutdownHandle};
