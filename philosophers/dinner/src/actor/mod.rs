// Actors seated at the dinner table
//
// Following the Tokio actor pattern:
// - Each actor owns its state and runs on its own task
// - Handles are cheap to clone and talk to actors over channels
// - Philosophers never talk to each other, only to the monitor and the narrator

pub mod narrator;
pub mod philosopher;

use std::future::Future;
use tokio::task::JoinHandle;

pub use narrator::{Activity, Narration, NarrationSink, NarratorHandle};
pub use philosopher::{PhilosopherActor, PhilosopherReport};

/// A unit of work that runs to completion on its own task.
pub trait Actor: Sized + Send + 'static {
    /// What the actor hands back when it finishes.
    type Output: Send + 'static;

    fn run(self) -> impl Future<Output = Self::Output> + Send + 'static;

    fn spawn(self) -> JoinHandle<Self::Output> {
        tokio::spawn(self.run())
    }
}
