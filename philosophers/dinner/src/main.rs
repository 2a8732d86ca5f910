//! Dining Philosophers
//!
//! Seats a table of philosophers who eat, think and talk, coordinated by a
//! single shared monitor. Narration goes to stdout, diagnostics to stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use philosophers_dinner::{
    Dinner, DinnerConfig,
    actor::{NarrationSink, NarratorHandle},
    constants::{DEFAULT_NUMBER_OF_PHILOSOPHERS, DINING_STEPS, TALK_PROBABILITY, TIME_TO_WASTE_MS},
    parse_philosopher_count, structured_logging,
};

#[derive(Parser, Debug)]
#[command(name = "philosophers")]
#[command(about = "Dining philosophers around a shared coordination monitor")]
struct Args {
    /// Number of philosophers at the table (falls back to 4 if not a positive integer)
    #[arg(allow_hyphen_values = true)]
    count: Option<String>,

    /// Dining rounds per philosopher
    #[arg(long, default_value_t = DINING_STEPS)]
    rounds: usize,

    /// Longest a single eat, think or talk action may take, in milliseconds
    #[arg(long, default_value_t = TIME_TO_WASTE_MS)]
    max_action_ms: u64,

    /// Chance that a philosopher asks for the floor after thinking
    #[arg(long, default_value_t = TALK_PROBABILITY)]
    talk_probability: f64,

    /// Enable development logging to the default log file
    #[arg(long)]
    dev_log: bool,

    /// Print a JSON summary of the dinner before exiting
    #[arg(long)]
    summary_json: bool,
}

impl Args {
    fn philosophers(&self) -> usize {
        let Some(raw) = self.count.as_deref() else {
            return DEFAULT_NUMBER_OF_PHILOSOPHERS;
        };
        parse_philosopher_count(raw).unwrap_or_else(|| {
            println!("{raw} is not a positive integer.");
            println!("We will use {DEFAULT_NUMBER_OF_PHILOSOPHERS} number of philosophers.");
            DEFAULT_NUMBER_OF_PHILOSOPHERS
        })
    }

    fn dinner_config(&self) -> DinnerConfig {
        DinnerConfig {
            philosophers: self.philosophers(),
            rounds: self.rounds,
            max_action: Duration::from_millis(self.max_action_ms),
            talk_probability: self.talk_probability,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let flush_guard = structured_logging::init_component_tracing(args.dev_log)?;

    let config = args.dinner_config();
    let philosophers = config.philosophers;
    info!("Starting dinner with {:?}", config);

    let dinner = Dinner::new(config)?;
    println!("num philosophers: {philosophers}");

    // First Ctrl-C lets the philosophers finish what they hold and leave;
    // a second one quits without waiting for them.
    let shutdown = dinner.shutdown_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if shutdown.trigger() {
                warn!("Interrupted, asking waiting philosophers to leave (Ctrl-C again to quit)");
            } else {
                warn!("Interrupted again, quitting without waiting");
                std::process::exit(130);
            }
        }
    });

    let (narrator, transcript) = NarratorHandle::new(NarrationSink::Stdout);
    let seated = dinner.seat(narrator);
    println!("{philosophers} philosopher(s) came in for a dinner.");

    let summary = seated.finish().await?;

    // Every narrator handle is gone now; wait for the last lines to be written.
    transcript.await.context("Narrator did not shut down cleanly")?;

    info!(
        "Dinner over: {} meal(s), {} speech(es)",
        summary.total_meals(),
        summary.total_speeches()
    );
    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    println!("All philosophers have left. System terminates normally.");
    std::mem::drop(flush_guard);
    Ok(())
}
