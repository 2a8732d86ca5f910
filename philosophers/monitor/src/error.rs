use thiserror::Error;

/// Errors reported by the [`ResourceMonitor`](crate::ResourceMonitor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A table needs at least one seat.
    #[error("a monitor needs at least one philosopher")]
    NoActors,

    #[error("philosopher {id} is not seated at a table of {seats}")]
    UnknownActor { id: usize, seats: usize },

    /// The caller stopped waiting before the resource was granted.
    /// Nothing was taken on its behalf.
    #[error("acquire was cancelled before the resource was granted")]
    Cancelled,
}
