//! Plain data shared between the monitor and its callers.

use serde::Serialize;
use std::fmt;

/// Seat number of a philosopher, in `0..N`.
///
/// A philosopher at seat `i` needs chopsticks `i` and `(i + 1) % N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActorId(usize);

impl ActorId {
    pub const fn new(seat: usize) -> Self {
        Self(seat)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ActorId {
    fn from(seat: usize) -> Self {
        Self(seat)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time copy of the monitor's resource state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    /// `true` for every chopstick currently held.
    pub chopsticks: Vec<bool>,
    /// `true` while someone holds the floor.
    pub floor_busy: bool,
}

impl MonitorSnapshot {
    /// Indices of the chopsticks currently held.
    pub fn held_chopsticks(&self) -> Vec<usize> {
        self.chopsticks
            .iter()
            .enumerate()
            .filter_map(|(slot, held)| held.then_some(slot))
            .collect()
    }

    /// Nothing is held: every chopstick is on the table and nobody is talking.
    pub fn is_idle(&self) -> bool {
        !self.floor_busy && self.chopsticks.iter().all(|held| !held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_chopsticks_lists_taken_slots() {
        let snapshot = MonitorSnapshot {
            chopsticks: vec![true, false, true, false],
            floor_busy: false,
        };

        assert_eq!(snapshot.held_chopsticks(), vec![0, 2]);
        assert!(!snapshot.is_idle());
    }

    #[test]
    fn test_floor_alone_makes_table_busy() {
        let snapshot = MonitorSnapshot {
            chopsticks: vec![false; 3],
            floor_busy: true,
        };

        assert!(snapshot.held_chopsticks().is_empty());
        assert!(!snapshot.is_idle());
    }

    #[test]
    fn test_actor_id_displays_seat_number() {
        assert_eq!(ActorId::new(3).to_string(), "3");
        assert_eq!(ActorId::from(7).index(), 7);
    }
}
