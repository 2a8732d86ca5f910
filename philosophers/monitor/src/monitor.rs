//! The resource monitor: one lock over the chopstick ring and the floor flag,
//! plus a broadcast notification that every waiter parks on.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::error::MonitorError;
use crate::permit::{FloorPermit, UtensilPermit};
use crate::types::{ActorId, MonitorSnapshot};

/// Resource state. Only ever touched while holding [`Shared::table`].
#[derive(Debug)]
struct Table {
    chopsticks: Vec<bool>,
    floor_busy: bool,
}

impl Table {
    /// Take both chopsticks if both are on the table. With a single seat
    /// `left == right` and this degenerates to one slot.
    fn take_pair(&mut self, left: usize, right: usize) -> bool {
        if self.chopsticks[left] || self.chopsticks[right] {
            return false;
        }
        self.chopsticks[left] = true;
        self.chopsticks[right] = true;
        true
    }

    fn put_down_pair(&mut self, left: usize, right: usize) {
        debug_assert!(
            self.chopsticks[left] && self.chopsticks[right],
            "chopsticks {left} and {right} released without being held"
        );
        self.chopsticks[left] = false;
        self.chopsticks[right] = false;
    }

    fn take_floor(&mut self) -> bool {
        if self.floor_busy {
            return false;
        }
        self.floor_busy = true;
        true
    }

    fn put_down_floor(&mut self) {
        debug_assert!(self.floor_busy, "floor released without being held");
        self.floor_busy = false;
    }
}

#[derive(Debug)]
struct Shared {
    /// Fixed at construction, so readable without the lock.
    seats: usize,
    table: Mutex<Table>,
    /// Broadcast on every state change; each waiter re-checks its own predicate.
    changed: Notify,
}

/// Shared coordination object for a table of philosophers.
///
/// Cloning is cheap and every clone refers to the same table. Acquire
/// operations park the calling task until the resource is free and return an
/// owned permit; handing the permit back (or dropping it) releases the
/// resource and wakes every waiter.
///
/// All acquire futures are cancel safe: dropping one before it completes
/// leaves the table exactly as it was.
#[derive(Debug, Clone)]
pub struct ResourceMonitor {
    shared: Arc<Shared>,
}

impl ResourceMonitor {
    /// Set a table for `seats` philosophers, all chopsticks down and the floor free.
    pub fn new(seats: usize) -> Result<Self, MonitorError> {
        if seats == 0 {
            return Err(MonitorError::NoActors);
        }

        debug!("Setting a table for {seats} philosopher(s)");
        Ok(Self {
            shared: Arc::new(Shared {
                seats,
                table: Mutex::new(Table {
                    chopsticks: vec![false; seats],
                    floor_busy: false,
                }),
                changed: Notify::new(),
            }),
        })
    }

    /// Number of seats (and chopsticks) at this table.
    pub fn seats(&self) -> usize {
        self.shared.seats
    }

    /// The two chopsticks the philosopher at `id` needs, left one first.
    pub fn chopsticks_of(&self, id: ActorId) -> Result<(usize, usize), MonitorError> {
        let seats = self.seats();
        let seat = id.index();
        if seat >= seats {
            return Err(MonitorError::UnknownActor { id: seat, seats });
        }
        Ok((seat, (seat + 1) % seats))
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let table = self.lock();
        MonitorSnapshot {
            chopsticks: table.chopsticks.clone(),
            floor_busy: table.floor_busy,
        }
    }

    /// Wait until both of `id`'s chopsticks are free, then take them together.
    pub async fn acquire_utensils(&self, id: ActorId) -> Result<UtensilPermit, MonitorError> {
        let (left, right) = self.chopsticks_of(id)?;

        self.wait_until(|table| table.take_pair(left, right)).await;
        debug!("Philosopher {id} picked up chopsticks {left} and {right}");

        Ok(UtensilPermit::new(self.clone(), id, (left, right)))
    }

    /// Like [`acquire_utensils`](Self::acquire_utensils), but gives up with
    /// [`MonitorError::Cancelled`] once `cancel` completes. A cancellation that
    /// is already pending wins over a free pair.
    pub async fn acquire_utensils_or_cancel<C>(
        &self,
        id: ActorId,
        cancel: C,
    ) -> Result<UtensilPermit, MonitorError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                debug!("Philosopher {id} stopped waiting for chopsticks");
                Err(MonitorError::Cancelled)
            }
            permit = self.acquire_utensils(id) => permit,
        }
    }

    /// Put both chopsticks back on the table.
    pub fn release_utensils(&self, permit: UtensilPermit) {
        debug_assert!(
            permit.issued_by(self),
            "utensil permit returned to a different table"
        );
        drop(permit);
    }

    /// Wait until nobody is talking, then take the floor.
    pub async fn acquire_floor(&self) -> FloorPermit {
        self.wait_until(Table::take_floor).await;
        debug!("Floor taken");

        FloorPermit::new(self.clone())
    }

    /// Like [`acquire_floor`](Self::acquire_floor), but gives up with
    /// [`MonitorError::Cancelled`] once `cancel` completes.
    pub async fn acquire_floor_or_cancel<C>(&self, cancel: C) -> Result<FloorPermit, MonitorError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                debug!("Stopped waiting for the floor");
                Err(MonitorError::Cancelled)
            }
            permit = self.acquire_floor() => Ok(permit),
        }
    }

    /// Give the floor back.
    pub fn release_floor(&self, permit: FloorPermit) {
        debug_assert!(
            permit.issued_by(self),
            "floor permit returned to a different table"
        );
        drop(permit);
    }

    pub(crate) fn put_down_utensils(&self, id: ActorId, (left, right): (usize, usize)) {
        self.lock().put_down_pair(left, right);
        self.shared.changed.notify_waiters();
        debug!("Philosopher {id} put down chopsticks {left} and {right}");
    }

    pub(crate) fn put_down_floor(&self) {
        self.lock().put_down_floor();
        self.shared.changed.notify_waiters();
        debug!("Floor released");
    }

    pub(crate) fn same_table(&self, other: &ResourceMonitor) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Park until `attempt` succeeds against the table, then broadcast.
    ///
    /// The notification is registered before the predicate is checked, so a
    /// release that lands between the check and the park still wakes us.
    async fn wait_until<F>(&self, mut attempt: F)
    where
        F: FnMut(&mut Table) -> bool,
    {
        loop {
            let notified = self.shared.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let granted = attempt(&mut self.lock());
            if granted {
                self.shared.changed.notify_waiters();
                return;
            }

            trace!("Resource busy, parking until the next release");
            notified.await;
        }
    }

    /// Critical sections never panic outside debug assertions, so a poisoned
    /// lock still holds a consistent table.
    fn lock(&self) -> MutexGuard<'_, Table> {
        self.shared
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
