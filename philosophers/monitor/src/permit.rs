//! Owned proof that a resource was granted.
//!
//! A permit can only be obtained from a successful acquire, and handing it
//! back is the only way to release, so a release can never happen without a
//! matching acquire. Dropping a permit releases it as well.

use crate::monitor::ResourceMonitor;
use crate::types::ActorId;

/// Both chopsticks of one philosopher.
#[derive(Debug)]
#[must_use = "dropping the permit puts the chopsticks straight back down"]
pub struct UtensilPermit {
    monitor: ResourceMonitor,
    holder: ActorId,
    chopsticks: (usize, usize),
}

impl UtensilPermit {
    pub(crate) fn new(monitor: ResourceMonitor, holder: ActorId, chopsticks: (usize, usize)) -> Self {
        Self {
            monitor,
            holder,
            chopsticks,
        }
    }

    pub fn holder(&self) -> ActorId {
        self.holder
    }

    /// Indices of the held chopsticks, left one first.
    pub fn chopsticks(&self) -> (usize, usize) {
        self.chopsticks
    }

    pub(crate) fn issued_by(&self, monitor: &ResourceMonitor) -> bool {
        self.monitor.same_table(monitor)
    }
}

impl Drop for UtensilPermit {
    fn drop(&mut self) {
        self.monitor.put_down_utensils(self.holder, self.chopsticks);
    }
}

/// Exclusive permission to talk.
#[derive(Debug)]
#[must_use = "dropping the permit gives the floor straight back"]
pub struct FloorPermit {
    monitor: ResourceMonitor,
}

impl FloorPermit {
    pub(crate) fn new(monitor: ResourceMonitor) -> Self {
        Self { monitor }
    }

    pub(crate) fn issued_by(&self, monitor: &ResourceMonitor) -> bool {
        self.monitor.same_table(monitor)
    }
}

impl Drop for FloorPermit {
    fn drop(&mut self) {
        self.monitor.put_down_floor();
    }
}
