//! Narrow interfaces through which the core reaches the outside world.
//!
//! Platform-specific crates provide implementations: a presentation adapter
//! that draws scenes and reports discrete input signals, a record sink that
//! persists the session log, and a clock measuring time since session launch.
use std::convert::Infallible;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::event::{EventRecord, SessionInfo};
use crate::scene::Scene;

/// Discrete input the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Move past an instruction or end screen.
    Advance,
    Pump,
    Collect,
    /// Abort the session; accepted at every wait point.
    Quit,
}

/// Signals accepted while a balloon is on screen.
pub const TRIAL_SIGNALS: [Signal; 3] = [Signal::Pump, Signal::Collect, Signal::Quit];
/// Signals accepted on the instruction and end screens.
pub const SCREEN_SIGNALS: [Signal; 2] = [Signal::Advance, Signal::Quit];

/// Draws scenes, blocks for input, and paces the session.
pub trait Presentation {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace whatever is on screen with `scene`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be shown.
    fn render(&mut self, scene: &Scene) -> Result<(), Self::Error>;

    /// Block until the participant produces one of `allowed`.
    ///
    /// Implementations must never return a signal outside `allowed`.
    ///
    /// # Errors
    ///
    /// Returns an error if input can no longer be read.
    fn wait_for_input(&mut self, allowed: &[Signal]) -> Result<Signal, Self::Error>;

    /// Block the session for `duration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pause is interrupted by a failure.
    fn pause(&mut self, duration: Duration) -> Result<(), Self::Error>;
}

/// Durable storage for a finished (or aborted) session log.
pub trait RecordSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write the ordered log for the session identified by `info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or written.
    fn write_records(&mut self, info: &SessionInfo, records: &[EventRecord])
    -> Result<(), Self::Error>;
}

/// In-memory sink that keeps every written log.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub writes: Vec<(SessionInfo, Vec<EventRecord>)>,
}

impl MemorySink {
    #[must_use]
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Records from the most recent write.
    #[must_use]
    pub fn last(&self) -> Option<&[EventRecord]> {
        self.writes.last().map(|(_, records)| records.as_slice())
    }
}

impl RecordSink for MemorySink {
    type Error = Infallible;

    fn write_records(
        &mut self,
        info: &SessionInfo,
        records: &[EventRecord],
    ) -> Result<(), Self::Error> {
        self.writes.push((info.clone(), records.to_vec()));
        Ok(())
    }
}

/// Monotonic session clock.
pub trait SessionClock {
    /// Begin measuring. Called once, when the first balloon is about to appear.
    fn start(&mut self);

    /// Time elapsed since [`SessionClock::start`].
    fn elapsed(&self) -> Duration;
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    origin: Option<Instant>,
}

impl Stopwatch {
    #[must_use]
    pub const fn new() -> Self {
        Self { origin: None }
    }
}

impl SessionClock for Stopwatch {
    fn start(&mut self) {
        self.origin = Some(Instant::now());
    }

    fn elapsed(&self) -> Duration {
        self.origin.map_or(Duration::ZERO, |origin| origin.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_is_zero_until_started() {
        let mut clock = Stopwatch::new();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        clock.start();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(second >= first);
    }

    #[test]
    fn memory_sink_keeps_each_write() {
        let mut sink = MemorySink::new();
        assert!(sink.last().is_none());
        sink.write_records(&SessionInfo::new("P002", "003"), &[]).unwrap();
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0].0.participant, "P002");
        assert_eq!(sink.last().map(<[EventRecord]>::len), Some(0));
    }

    #[test]
    fn signal_sets_always_allow_quit() {
        assert!(TRIAL_SIGNALS.contains(&Signal::Quit));
        assert!(SCREEN_SIGNALS.contains(&Signal::Quit));
        assert!(!SCREEN_SIGNALS.contains(&Signal::Pump));
    }
}
