//! Narrator actor - prints what the philosophers are doing
//!
//! Philosophers report their activity over a channel and a single actor writes
//! it out, so lines never interleave. The actor also keeps a bounded transcript
//! that it hands back once every handle is gone.

use std::collections::VecDeque;
use std::fmt;

use philosophers_monitor::ActorId;
use serde::Serialize;
use tokio::io::{self, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::Actor;
use crate::constants::MAX_TRANSCRIPT_LINES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Eating,
    Thinking,
    Talking,
}

impl Activity {
    fn as_str(self) -> &'static str {
        match self {
            Activity::Eating => "eating",
            Activity::Thinking => "thinking",
            Activity::Talking => "talking",
        }
    }
}

/// One line of narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    Started {
        philosopher: ActorId,
        activity: Activity,
    },
    Finished {
        philosopher: ActorId,
        activity: Activity,
    },
    Said {
        philosopher: ActorId,
        phrase: String,
    },
    /// The philosopher was interrupted while waiting and gave up on the dinner.
    LeftEarly { philosopher: ActorId },
}

impl Narration {
    pub fn philosopher(&self) -> ActorId {
        match self {
            Narration::Started { philosopher, .. }
            | Narration::Finished { philosopher, .. }
            | Narration::Said { philosopher, .. }
            | Narration::LeftEarly { philosopher } => *philosopher,
        }
    }
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narration::Started {
                philosopher,
                activity,
            } => write!(f, "Philosopher {philosopher} has started {}.", activity.as_str()),
            Narration::Finished {
                philosopher,
                activity,
            } => write!(f, "Philosopher {philosopher} has finished {}.", activity.as_str()),
            Narration::Said {
                philosopher,
                phrase,
            } => write!(f, "Philosopher {philosopher} says: {phrase}"),
            Narration::LeftEarly { philosopher } => {
                write!(f, "Philosopher {philosopher} has left the table early.")
            }
        }
    }
}

/// Where narration goes besides the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationSink {
    Stdout,
    /// Only keep the transcript.
    Silent,
}

struct NarratorActor {
    /// Actor terminates when every handle has been dropped.
    receiver: mpsc::UnboundedReceiver<Narration>,
    sink: NarrationSink,
    transcript: VecDeque<Narration>,
}

impl NarratorActor {
    fn new(receiver: mpsc::UnboundedReceiver<Narration>, sink: NarrationSink) -> Self {
        Self {
            receiver,
            sink,
            transcript: VecDeque::with_capacity(MAX_TRANSCRIPT_LINES),
        }
    }

    fn record(&mut self, narration: Narration) {
        if self.transcript.len() >= MAX_TRANSCRIPT_LINES {
            self.transcript.pop_front();
        }
        self.transcript.push_back(narration);
    }
}

impl Actor for NarratorActor {
    type Output = Vec<Narration>;

    async fn run(mut self) -> Vec<Narration> {
        debug!("Narrator started");
        let mut stdout = io::stdout();

        while let Some(narration) = self.receiver.recv().await {
            if self.sink == NarrationSink::Stdout {
                let line = format!("{narration}\n");
                let written = match stdout.write_all(line.as_bytes()).await {
                    Ok(()) => stdout.flush().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    // Keep draining so philosophers never notice.
                    error!("Failed to write narration to stdout: {}", e);
                    self.sink = NarrationSink::Silent;
                }
            }
            self.record(narration);
        }

        info!("Narrator stopped after {} line(s)", self.transcript.len());
        self.transcript.into()
    }
}

/// Handle for sending narration to the narrator actor
#[derive(Clone)]
pub struct NarratorHandle {
    sender: mpsc::UnboundedSender<Narration>,
}

impl NarratorHandle {
    /// Spawn a narrator. The join handle yields the transcript once every
    /// clone of the returned handle has been dropped.
    pub fn new(sink: NarrationSink) -> (Self, JoinHandle<Vec<Narration>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = NarratorActor::new(receiver, sink);
        let transcript = actor.spawn();

        (Self { sender }, transcript)
    }

    /// Never blocks, so it is safe to call while holding chopsticks.
    pub fn narrate(&self, narration: Narration) {
        if let Err(e) = self.sender.send(narration) {
            debug!("Narrator gone, dropping line: {}", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narration_lines() {
        let id = ActorId::new(2);

        let started = Narration::Started {
            philosopher: id,
            activity: Activity::Eating,
        };
        let finished = Narration::Finished {
            philosopher: id,
            activity: Activity::Thinking,
        };
        let said = Narration::Said {
            philosopher: id,
            phrase: "My number is 2".to_string(),
        };

        assert_eq!(started.to_string(), "Philosopher 2 has started eating.");
        assert_eq!(finished.to_string(), "Philosopher 2 has finished thinking.");
        assert_eq!(said.to_string(), "Philosopher 2 says: My number is 2");
        assert_eq!(
            Narration::LeftEarly { philosopher: id }.to_string(),
            "Philosopher 2 has left the table early."
        );
    }

    #[tokio::test]
    async fn test_transcript_keeps_order() {
        let (narrator, transcript) = NarratorHandle::new(NarrationSink::Silent);

        for seat in 0..3 {
            narrator.narrate(Narration::Started {
                philosopher: ActorId::new(seat),
                activity: Activity::Talking,
            });
        }
        drop(narrator);

        let transcript = transcript.await.unwrap();
        let seats: Vec<usize> = transcript.iter().map(|n| n.philosopher().index()).collect();
        assert_eq!(seats, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_transcript_is_bounded() {
        let (narrator, transcript) = NarratorHandle::new(NarrationSink::Silent);

        for _ in 0..MAX_TRANSCRIPT_LINES + 10 {
            narrator.narrate(Narration::LeftEarly {
                philosopher: ActorId::new(0),
            });
        }
        drop(narrator);

        assert_eq!(transcript.await.unwrap().len(), MAX_TRANSCRIPT_LINES);
    }
}
