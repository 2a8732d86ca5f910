use std::time::Duration;

use anyhow::{Result, ensure};

use crate::constants::{DEFAULT_NUMBER_OF_PHILOSOPHERS, DINING_STEPS, TALK_PROBABILITY, TIME_TO_WASTE_MS};

/// How a dinner is run.
#[derive(Debug, Clone, PartialEq)]
pub struct DinnerConfig {
    /// Seats at the table, one philosopher per seat.
    pub philosophers: usize,

    /// Rounds of eat / think / maybe talk per philosopher.
    pub rounds: usize,

    /// Each action lasts a random duration in `[0, max_action)`.
    pub max_action: Duration,

    /// Chance of asking for the floor after thinking.
    pub talk_probability: f64,
}

impl Default for DinnerConfig {
    fn default() -> Self {
        Self {
            philosophers: DEFAULT_NUMBER_OF_PHILOSOPHERS,
            rounds: DINING_STEPS,
            max_action: Duration::from_millis(TIME_TO_WASTE_MS),
            talk_probability: TALK_PROBABILITY,
        }
    }
}

impl DinnerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.philosophers > 0, "a dinner needs at least one philosopher");
        ensure!(
            (0.0..=1.0).contains(&self.talk_probability),
            "talk probability must be between 0 and 1, got {}",
            self.talk_probability
        );
        Ok(())
    }
}

/// Parse a philosopher count from the command line.
///
/// Returns `None` unless `raw` is a positive 32-bit integer with no
/// surrounding whitespace; the caller decides what to fall back to.
pub fn parse_philosopher_count(raw: &str) -> Option<usize> {
    match raw.parse::<i32>() {
        Ok(count) if count > 0 => usize::try_from(count).ok(),
        _ => None,
    }
}
