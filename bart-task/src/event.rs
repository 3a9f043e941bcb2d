//! Append-only event log produced by the trial loop.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::balloon::{BalloonType, TrialConfig};
use crate::constants;
use crate::reward::RewardParams;

/// Identity of the participant and session a log belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionInfo {
    pub participant: String,
    pub session: String,
}

impl SessionInfo {
    #[must_use]
    pub fn new(participant: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            session: session.into(),
        }
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new(constants::DEFAULT_PARTICIPANT, constants::DEFAULT_SESSION)
    }
}

/// What happened at a logged moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Pump,
    Explode,
    Collect,
}

impl EventKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Explode => "explode",
            Self::Collect => "collect",
        }
    }
}

/// One immutable line of the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub participant: String,
    pub session: String,
    pub balloon_index: u32,
    pub balloon_type: BalloonType,
    /// Time since the session clock started at which the input was observed.
    pub timestamp: Duration,
    pub kind: EventKind,
    pub pump_number: u32,
    pub threshold: u32,
    /// Points paid by this pump; present only for [`EventKind::Pump`].
    pub gain: Option<u32>,
    pub reward: RewardParams,
    pub points_this_trial: u32,
    pub total_points: u32,
}

impl EventRecord {
    /// Build a record for the given trial.
    #[must_use]
    pub fn new(info: &SessionInfo, trial: &TrialConfig, kind: EventKind, at: Duration) -> Self {
        Self {
            participant: info.participant.clone(),
            session: info.session.clone(),
            balloon_index: trial.balloon_index,
            balloon_type: trial.balloon_type,
            timestamp: at,
            kind,
            pump_number: 0,
            threshold: trial.explosion_threshold,
            gain: None,
            reward: trial.reward,
            points_this_trial: 0,
            total_points: 0,
        }
    }

    #[must_use]
    pub fn with_pumps(mut self, pump_number: u32) -> Self {
        self.pump_number = pump_number;
        self
    }

    #[must_use]
    pub fn with_gain(mut self, gain: u32) -> Self {
        self.gain = Some(gain);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points_this_trial: u32, total_points: u32) -> Self {
        self.points_this_trial = points_this_trial;
        self.total_points = total_points;
        self
    }

    /// Seconds since session start, rounded to four decimals.
    #[must_use]
    pub fn event_time_secs(&self) -> f64 {
        (self.timestamp.as_secs_f64() * 10_000.0).round() / 10_000.0
    }
}

/// Ordered, append-only sequence of records for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    records: Vec<EventRecord>,
}

impl SessionLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = EventRecord>) {
        self.records.extend(records);
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }
}
