//! Philosopher actor - eats, thinks and sometimes talks
//!
//! Each round the philosopher picks up both chopsticks, eats, puts them down,
//! thinks, and with some probability asks for the floor and says something.
//! All coordination goes through the shared monitor.

use std::future::Future;
use std::time::Duration;

use philosophers_monitor::{ActorId, MonitorError, ResourceMonitor};
use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::yield_now;
use tracing::{debug, error, info};

use super::Actor;
use super::narrator::{Activity, Narration, NarratorHandle};
use crate::config::DinnerConfig;

/// Things a philosopher may say once they have the floor.
const PHRASES: &[&str] = &[
    "Eh, it's not easy to be a philosopher: eat, think, talk, eat...",
    "You know, true is false and false is true if you think of it",
    "2 + 2 = 5 for extremely large values of 2...",
    "If thee cannot speak, thee must be silent",
];

/// How one philosopher's dinner went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhilosopherReport {
    pub philosopher: ActorId,
    pub meals: usize,
    pub speeches: usize,
    /// Interrupted while waiting for a resource before finishing every round.
    pub left_early: bool,
}

impl PhilosopherReport {
    fn new(philosopher: ActorId) -> Self {
        Self {
            philosopher,
            meals: 0,
            speeches: 0,
            left_early: false,
        }
    }
}

pub struct PhilosopherActor {
    id: ActorId,
    monitor: ResourceMonitor,
    narrator: NarratorHandle,
    rounds: usize,
    max_action: Duration,
    talk_probability: f64,
    /// Flips to `true` when the dinner is being shut down.
    shutdown: watch::Receiver<bool>,
}

impl PhilosopherActor {
    pub fn new(
        id: ActorId,
        monitor: ResourceMonitor,
        narrator: NarratorHandle,
        config: &DinnerConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            monitor,
            narrator,
            rounds: config.rounds,
            max_action: config.max_action,
            talk_probability: config.talk_probability,
            shutdown,
        }
    }

    async fn dine_once(&self, report: &mut PhilosopherReport) -> Result<(), MonitorError> {
        let utensils = self
            .monitor
            .acquire_utensils_or_cancel(self.id, self.interrupted())
            .await?;
        self.eat().await;
        self.monitor.release_utensils(utensils);
        report.meals += 1;

        self.think().await;

        if self.wants_to_talk() {
            let floor = self.monitor.acquire_floor_or_cancel(self.interrupted()).await?;
            self.talk().await;
            self.monitor.release_floor(floor);
            report.speeches += 1;
            yield_now().await;
        }

        yield_now().await;
        Ok(())
    }

    async fn eat(&self) {
        self.act(Activity::Eating).await;
    }

    async fn think(&self) {
        self.act(Activity::Thinking).await;
    }

    async fn talk(&self) {
        self.narrate_started(Activity::Talking);
        yield_now().await;
        self.narrator.narrate(Narration::Said {
            philosopher: self.id,
            phrase: self.something_to_say(),
        });
        yield_now().await;
        self.narrate_finished(Activity::Talking);
    }

    async fn act(&self, activity: Activity) {
        self.narrate_started(activity);
        yield_now().await;
        let duration = self.action_duration();
        tokio::time::sleep(duration).await;
        yield_now().await;
        self.narrate_finished(activity);
    }

    fn narrate_started(&self, activity: Activity) {
        self.narrator.narrate(Narration::Started {
            philosopher: self.id,
            activity,
        });
    }

    fn narrate_finished(&self, activity: Activity) {
        self.narrator.narrate(Narration::Finished {
            philosopher: self.id,
            activity,
        });
    }

    fn action_duration(&self) -> Duration {
        let max = u64::try_from(self.max_action.as_millis()).unwrap_or(u64::MAX);
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max))
    }

    fn wants_to_talk(&self) -> bool {
        rand::rng().random_bool(self.talk_probability)
    }

    fn something_to_say(&self) -> String {
        // One slot past the fixed phrases is the philosopher's own number.
        let pick = rand::rng().random_range(0..=PHRASES.len());
        match PHRASES.get(pick) {
            Some(phrase) => phrase.to_string(),
            None => format!("My number is {}", self.id),
        }
    }

    /// Completes once the dinner is shut down. Never completes if the
    /// shutdown sender is dropped without firing.
    fn interrupted(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown = self.shutdown.clone();
        async move {
            let fired = shutdown.wait_for(|stop| *stop).await.is_ok();
            if !fired {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Actor for PhilosopherActor {
    type Output = PhilosopherReport;

    async fn run(self) -> PhilosopherReport {
        let mut report = PhilosopherReport::new(self.id);
        debug!("Philosopher {} sat down for {} round(s)", self.id, self.rounds);

        for _ in 0..self.rounds {
            match self.dine_once(&mut report).await {
                Ok(()) => {}
                Err(MonitorError::Cancelled) => {
                    info!("Philosopher {} was interrupted and leaves early", self.id);
                    report.left_early = true;
                    self.narrator.narrate(Narration::LeftEarly { philosopher: self.id });
                    break;
                }
                Err(e) => {
                    error!("Philosopher {} cannot dine: {}", self.id, e);
                    report.left_early = true;
                    break;
                }
            }
        }

        debug!(
            "Philosopher {} left after {} meal(s) and {} speech(es)",
            self.id, report.meals, report.speeches
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::NarrationSink;

    fn quick_config(rounds: usize, talk_probability: f64) -> DinnerConfig {
        DinnerConfig {
            philosophers: 1,
            rounds,
            max_action: Duration::ZERO,
            talk_probability,
        }
    }

    #[tokio::test]
    async fn test_lone_philosopher_eats_every_round() {
        let monitor = ResourceMonitor::new(1).unwrap();
        let (narrator, transcript) = NarratorHandle::new(NarrationSink::Silent);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let actor = PhilosopherActor::new(
            ActorId::new(0),
            monitor.clone(),
            narrator,
            &quick_config(3, 1.0),
            shutdown_rx,
        );
        let report = actor.spawn().await.unwrap();

        assert_eq!(report.meals, 3);
        assert_eq!(report.speeches, 3);
        assert!(!report.left_early);
        assert!(monitor.snapshot().is_idle());

        let said = transcript
            .await
            .unwrap()
            .into_iter()
            .filter(|n| matches!(n, Narration::Said { .. }))
            .count();
        assert_eq!(said, 3);
    }

    #[tokio::test]
    async fn test_silent_philosopher_never_takes_the_floor() {
        let monitor = ResourceMonitor::new(1).unwrap();
        let (narrator, _transcript) = NarratorHandle::new(NarrationSink::Silent);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let actor = PhilosopherActor::new(
            ActorId::new(0),
            monitor,
            narrator,
            &quick_config(5, 0.0),
            shutdown_rx,
        );
        let report = actor.spawn().await.unwrap();

        assert_eq!(report.meals, 5);
        assert_eq!(report.speeches, 0);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_blocked_philosopher() {
        let monitor = ResourceMonitor::new(2).unwrap();
        let (narrator, transcript) = NarratorHandle::new(NarrationSink::Silent);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Seat 0 holds both chopsticks of a two-seat table, so seat 1 blocks.
        let held = monitor.acquire_utensils(ActorId::new(0)).await.unwrap();
        let handle = PhilosopherActor::new(
            ActorId::new(1),
            monitor.clone(),
            narrator,
            &quick_config(2, 0.0),
            shutdown_rx,
        )
        .spawn();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        shutdown_tx.send_replace(true);

        let report = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(report.left_early);
        assert_eq!(report.meals, 0);
        assert_eq!(monitor.snapshot().held_chopsticks(), vec![0, 1]);

        drop(held);
        assert!(monitor.snapshot().is_idle());
        assert_eq!(
            transcript.await.unwrap(),
            vec![Narration::LeftEarly {
                philosopher: ActorId::new(1)
            }]
        );
    }

    #[tokio::test]
    async fn test_something_to_say_comes_from_the_phrase_book() {
        let monitor = ResourceMonitor::new(1).unwrap();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (narrator, _transcript) = NarratorHandle::new(NarrationSink::Silent);

        let actor = PhilosopherActor::new(
            ActorId::new(0),
            monitor,
            narrator,
            &quick_config(1, 0.5),
            shutdown_rx,
        );

        for _ in 0..50 {
            let phrase = actor.something_to_say();
            assert!(PHRASES.contains(&phrase.as_str()) || phrase == "My number is 0");
        }
    }
}
