//! BART core
//!
//! Platform-agnostic engine for the Balloon Analogue Risk Task: balloon type
//! and threshold draws, the per-pump reward schedule, the pump/collect trial
//! state machine, session sequencing, and the CSV record layout. Rendering,
//! input, timing, and storage are reached only through the traits in [`ports`].

pub mod balloon;
pub mod config;
pub mod constants;
pub mod event;
pub mod export;
pub mod ports;
pub mod reward;
pub mod scene;
pub mod seed;
pub mod session;
pub mod threshold;
pub mod trial;

// Re-export commonly used types
pub use balloon::{BalloonProfile, BalloonType, ThresholdRange, TrialConfig};
pub use config::{ConfigError, KeyBindings, TaskConfig, TimingConfig, VisualConfig};
pub use event::{EventKind, EventRecord, SessionInfo, SessionLog};
pub use export::{CSV_COLUMNS, write_csv};
pub use ports::{
    MemorySink, Presentation, RecordSink, SCREEN_SIGNALS, SessionClock, Signal, Stopwatch,
    TRIAL_SIGNALS,
};
pub use reward::{RewardParams, gain_for_pump};
pub use scene::{BalloonView, Feedback, Scene};
pub use seed::{balloon_rng, derive_stream_seed};
pub use session::{SessionController, SessionError, SessionSummary};
pub use threshold::ThresholdGenerator;
pub use trial::{Trial, TrialAction, TrialEnd, TrialOutcome, TrialReport, TrialRunner, TrialState};
