//! Seating a table, running it, and collecting the results.

use std::sync::Arc;

use anyhow::{Context, Result};
use philosophers_monitor::{ActorId, MonitorSnapshot, ResourceMonitor};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actor::{Actor, NarratorHandle, PhilosopherActor, PhilosopherReport};
use crate::config::DinnerConfig;

/// A table that has been set but where nobody has sat down yet.
pub struct Dinner {
    config: DinnerConfig,
    monitor: ResourceMonitor,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

/// Asks every philosopher still waiting for a resource to leave.
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Returns `false` if shutdown had already been asked for.
    pub fn trigger(&self) -> bool {
        !self.shutdown_tx.send_replace(true)
    }
}

/// A dinner in progress.
pub struct SeatedDinner {
    config: DinnerConfig,
    monitor: ResourceMonitor,
    philosophers: Vec<(ActorId, JoinHandle<PhilosopherReport>)>,
    // Keeps the shutdown channel open until everyone has left.
    _shutdown_tx: Arc<watch::Sender<bool>>,
}

/// How the whole dinner went.
#[derive(Debug, Clone, Serialize)]
pub struct DinnerSummary {
    pub philosophers: usize,
    pub rounds: usize,
    pub reports: Vec<PhilosopherReport>,
    /// Table state after everyone left.
    pub final_state: MonitorSnapshot,
}

impl DinnerSummary {
    pub fn total_meals(&self) -> usize {
        self.reports.iter().map(|r| r.meals).sum()
    }

    pub fn total_speeches(&self) -> usize {
        self.reports.iter().map(|r| r.speeches).sum()
    }
}

impl Dinner {
    pub fn new(config: DinnerConfig) -> Result<Self> {
        config.validate()?;
        let monitor = ResourceMonitor::new(config.philosophers)
            .context("Failed to set the table")?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            monitor,
            shutdown_tx: Arc::new(shutdown_tx),
        })
    }

    pub fn monitor(&self) -> &ResourceMonitor {
        &self.monitor
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Start one philosopher task per seat.
    pub fn seat(self, narrator: NarratorHandle) -> SeatedDinner {
        let philosophers = (0..self.config.philosophers)
            .map(ActorId::new)
            .map(|id| {
                let actor = PhilosopherActor::new(
                    id,
                    self.monitor.clone(),
                    narrator.clone(),
                    &self.config,
                    self.shutdown_tx.subscribe(),
                );
                (id, actor.spawn())
            })
            .collect();

        info!("Seated {} philosopher(s)", self.config.philosophers);
        SeatedDinner {
            config: self.config,
            monitor: self.monitor,
            philosophers,
            _shutdown_tx: self.shutdown_tx,
        }
    }
}

impl SeatedDinner {
    pub fn monitor(&self) -> &ResourceMonitor {
        &self.monitor
    }

    /// Wait for every philosopher to leave.
    pub async fn finish(self) -> Result<DinnerSummary> {
        let mut reports = Vec::with_capacity(self.philosophers.len());
        for (id, handle) in self.philosophers {
            let report = handle
                .await
                .with_context(|| format!("Philosopher {id} did not leave cleanly"))?;
            reports.push(report);
        }

        let final_state = self.monitor.snapshot();
        if !final_state.is_idle() {
            warn!("Table not cleared after dinner: {:?}", final_state);
        }

        info!("All {} philosopher(s) have left", reports.len());
        Ok(DinnerSummary {
            philosophers: self.config.philosophers,
            rounds: self.config.rounds,
            reports,
            final_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::task;
    use tokio_test::{assert_pending, assert_ready_ok};

    #[test]
    fn test_trigger_wakes_subscribers_once() {
        let dinner = Dinner::new(DinnerConfig::default()).unwrap();
        let shutdown = dinner.shutdown_handle();
        let mut shutdown_rx = dinner.shutdown_tx.subscribe();

        let mut changed = task::spawn(shutdown_rx.changed());
        assert_pending!(changed.poll());

        assert!(shutdown.trigger());
        assert!(changed.is_woken());
        assert_ready_ok!(changed.poll());
        drop(changed);

        assert!(!shutdown.trigger());
        assert!(!shutdown.clone().trigger());
        assert!(*shutdown_rx.borrow());
    }
}
