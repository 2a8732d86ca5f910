//! Dining Philosophers Coordination Monitor
//!
//! A single shared object that hands out chopstick pairs and the talking floor
//! to a ring of concurrent philosophers. Every state transition happens under one
//! lock; waiters park on a broadcast notification and re-check their own
//! predicate when woken.

mod error;
mod monitor;
mod permit;
pub mod types;

pub use error::MonitorError;
pub use monitor::ResourceMonitor;
pub use permit::{FloorPermit, UtensilPermit};
pub use types::{ActorId, MonitorSnapshot};
