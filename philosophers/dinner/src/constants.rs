//! Constants and configuration values used throughout the dinner driver

/// Philosophers seated when the command line does not name a valid count
pub const DEFAULT_NUMBER_OF_PHILOSOPHERS: usize = 4;

/// Dining rounds each philosopher runs before leaving
pub const DINING_STEPS: usize = 10;

/// Upper bound for a single eat, think or talk action, in milliseconds
pub const TIME_TO_WASTE_MS: u64 = 1000;

/// Chance that a philosopher asks for the floor after thinking
pub const TALK_PROBABILITY: f64 = 0.5;

/// Most narration lines the narrator keeps for its transcript
pub const MAX_TRANSCRIPT_LINES: usize = 4096;

/// Directory for temporary files (logs)
pub const TEMP_DIR: &str = "/tmp";

/// Default log file name for development mode
pub const DEV_LOG_FILENAME: &str = "philosophers.log";

/// Development log file path
pub fn dev_log_path() -> String {
    format!("{}/{}", TEMP_DIR, DEV_LOG_FILENAME)
}
