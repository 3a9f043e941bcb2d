//! Default task parameters for the Balloon Analogue Risk Task.
//!
//! These are the values a session uses when no configuration file overrides
//! them. Only the orderings between the Safe and Risky profiles are part of
//! the behavioural contract; the magnitudes are conventional defaults.

// Session shape ------------------------------------------------------------
pub(crate) const DEFAULT_BALLOONS: u32 = 30;
pub(crate) const DEFAULT_P_SAFE: f64 = 0.5;
pub(crate) const DEFAULT_SHOW_TYPE_CUE: bool = true;

// Explosion thresholds -----------------------------------------------------
pub(crate) const SAFE_THRESHOLD_MIN: u32 = 18;
pub(crate) const SAFE_THRESHOLD_MAX: u32 = 40;
pub(crate) const RISKY_THRESHOLD_MIN: u32 = 5;
pub(crate) const RISKY_THRESHOLD_MAX: u32 = 22;

// Reward schedules ---------------------------------------------------------
pub(crate) const SAFE_BASE_GAIN: u32 = 1;
pub(crate) const SAFE_GAIN_STEP: u32 = 4;
pub(crate) const SAFE_MAX_GAIN: u32 = 5;
pub(crate) const RISKY_BASE_GAIN: u32 = 1;
pub(crate) const RISKY_GAIN_STEP: u32 = 2;
pub(crate) const RISKY_MAX_GAIN: u32 = 6;

// Visuals ------------------------------------------------------------------
pub(crate) const BALLOON_START_RADIUS: f32 = 0.06;
pub(crate) const BALLOON_RADIUS_STEP: f32 = 0.01;

// Pacing -------------------------------------------------------------------
pub(crate) const FEEDBACK_SECS: f64 = 0.5;
pub(crate) const INTER_TRIAL_SECS: f64 = 0.4;

// Participant defaults -----------------------------------------------------
pub const DEFAULT_PARTICIPANT: &str = "P001";
pub const DEFAULT_SESSION: &str = "001";

// Feedback text ------------------------------------------------------------
pub(crate) const FEEDBACK_EXPLODED: &str = "BOOM!";
pub(crate) const FEEDBACK_COLLECTED: &str = "Collected!";

// Seed derivation ----------------------------------------------------------
pub(crate) const BALLOON_STREAM_TAG: &[u8] = b"bart.balloons";
