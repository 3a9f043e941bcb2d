//! Static task configuration, loaded once and validated before a session runs.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balloon::{BalloonProfile, BalloonType, ThresholdRange};
use crate::constants;
use crate::ports::Signal;
use crate::reward::RewardParams;

/// Errors raised when task configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("balloon count must be positive")]
    NoBalloons,
    #[error("p_safe must lie within [0, 1] (got {0})")]
    SafeProbability(f64),
    #[error("{balloon} threshold range inverted (min {min} > max {max})")]
    ThresholdRange {
        balloon: BalloonType,
        min: u32,
        max: u32,
    },
    #[error("{balloon} reward schedule invalid: {reason}")]
    RewardParams {
        balloon: BalloonType,
        reason: &'static str,
    },
    #[error("safe balloons must explode later on average (safe mean {safe:.1}, risky mean {risky:.1})")]
    ThresholdOrdering { safe: f64, risky: f64 },
    #[error("risky gain {risky} falls below safe gain {safe} at pump {pump}")]
    GrowthOrdering { pump: u32, safe: u32, risky: u32 },
    #[error("{field} must be a positive finite number (got {value})")]
    Visual { field: &'static str, value: f32 },
    #[error("{field} must be a non-negative finite number of seconds (got {value})")]
    Pause { field: &'static str, value: f64 },
    #[error("no key bound to {0:?}")]
    UnboundSignal(Signal),
    #[error("key '{key}' is bound to both {first:?} and {second:?}")]
    KeyConflict {
        key: String,
        first: Signal,
        second: Signal,
    },
    #[error("configuration could not be parsed: {0}")]
    Parse(String),
}

/// Balloon drawing parameters handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub start_radius: f32,
    pub radius_step: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            start_radius: constants::BALLOON_START_RADIUS,
            radius_step: constants::BALLOON_RADIUS_STEP,
        }
    }
}

impl VisualConfig {
    /// Radius of a balloon after `pumps` successful pumps.
    #[must_use]
    pub fn radius_for(&self, pumps: u32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let pumps = pumps as f32;
        self.radius_step.mul_add(pumps, self.start_radius)
    }
}

/// Blocking pauses inserted between screens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the explode/collect feedback stays on screen.
    pub feedback_secs: f64,
    /// Blank interval before the next balloon.
    pub inter_trial_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            feedback_secs: constants::FEEDBACK_SECS,
            inter_trial_secs: constants::INTER_TRIAL_SECS,
        }
    }
}

/// Input tokens recognised for each signal.
///
/// Pump and Collect are only accepted during a trial and Advance only on the
/// instruction and end screens, so those may share keys. Quit keys must be
/// unique because Quit is accepted everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub pump: Vec<String>,
    pub collect: Vec<String>,
    pub advance: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pump: vec!["space".to_string(), "p".to_string()],
            collect: vec!["return".to_string(), "enter".to_string(), "c".to_string()],
            advance: vec!["space".to_string(), "return".to_string()],
            quit: vec!["escape".to_string(), "q".to_string()],
        }
    }
}

impl KeyBindings {
    /// Keys bound to `signal`.
    #[must_use]
    pub fn keys_for(&self, signal: Signal) -> &[String] {
        match signal {
            Signal::Advance => &self.advance,
            Signal::Pump => &self.pump,
            Signal::Collect => &self.collect,
            Signal::Quit => &self.quit,
        }
    }

    /// Translate an input token into a signal allowed at the current wait point.
    #[must_use]
    pub fn resolve(&self, token: &str, allowed: &[Signal]) -> Option<Signal> {
        let token = token.trim().to_ascii_lowercase();
        let bound = |signal: Signal| {
            self.keys_for(signal)
                .iter()
                .any(|key| key.eq_ignore_ascii_case(&token))
        };
        if allowed.contains(&Signal::Quit) && bound(Signal::Quit) {
            return Some(Signal::Quit);
        }
        allowed
            .iter()
            .copied()
            .filter(|signal| *signal != Signal::Quit)
            .find(|signal| bound(*signal))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for signal in [Signal::Advance, Signal::Pump, Signal::Collect, Signal::Quit] {
            if self.keys_for(signal).iter().all(|key| key.trim().is_empty()) {
                return Err(ConfigError::UnboundSignal(signal));
            }
        }
        let exclusive_pairs = [
            (Signal::Quit, Signal::Advance),
            (Signal::Quit, Signal::Pump),
            (Signal::Quit, Signal::Collect),
            (Signal::Pump, Signal::Collect),
        ];
        for (first, second) in exclusive_pairs {
            if let Some(key) = self
                .keys_for(first)
                .iter()
                .find(|key| {
                    self.keys_for(second)
                        .iter()
                        .any(|other| other.eq_ignore_ascii_case(key))
                })
            {
                return Err(ConfigError::KeyConflict {
                    key: key.clone(),
                    first,
                    second,
                });
            }
        }
        Ok(())
    }
}

/// Complete, immutable configuration for one task session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "TaskConfig::default_balloons")]
    pub balloons: u32,
    #[serde(default = "TaskConfig::default_p_safe")]
    pub p_safe: f64,
    #[serde(default = "TaskConfig::default_show_type_cue")]
    pub show_type_cue: bool,
    #[serde(default = "TaskConfig::default_safe")]
    pub safe: BalloonProfile,
    #[serde(default = "TaskConfig::default_risky")]
    pub risky: BalloonProfile,
    #[serde(default)]
    pub visuals: VisualConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub keys: KeyBindings,
}

impl TaskConfig {
    const fn default_balloons() -> u32 {
        constants::DEFAULT_BALLOONS
    }

    const fn default_p_safe() -> f64 {
        constants::DEFAULT_P_SAFE
    }

    const fn default_show_type_cue() -> bool {
        constants::DEFAULT_SHOW_TYPE_CUE
    }

    const fn default_safe() -> BalloonProfile {
        BalloonProfile {
            threshold: ThresholdRange::new(
                constants::SAFE_THRESHOLD_MIN,
                constants::SAFE_THRESHOLD_MAX,
            ),
            reward: RewardParams::new(
                constants::SAFE_BASE_GAIN,
                constants::SAFE_GAIN_STEP,
                constants::SAFE_MAX_GAIN,
            ),
        }
    }

    const fn default_risky() -> BalloonProfile {
        BalloonProfile {
            threshold: ThresholdRange::new(
                constants::RISKY_THRESHOLD_MIN,
                constants::RISKY_THRESHOLD_MAX,
            ),
            reward: RewardParams::new(
                constants::RISKY_BASE_GAIN,
                constants::RISKY_GAIN_STEP,
                constants::RISKY_MAX_GAIN,
            ),
        }
    }

    /// Parse a JSON document (missing fields take their defaults) and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Profile for the given balloon type.
    #[must_use]
    pub const fn profile(&self, balloon_type: BalloonType) -> &BalloonProfile {
        match balloon_type {
            BalloonType::Safe => &self.safe,
            BalloonType::Risky => &self.risky,
        }
    }

    /// Check every startup invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balloons == 0 {
            return Err(ConfigError::NoBalloons);
        }
        if !self.p_safe.is_finite() || !(0.0..=1.0).contains(&self.p_safe) {
            return Err(ConfigError::SafeProbability(self.p_safe));
        }
        for balloon in [BalloonType::Safe, BalloonType::Risky] {
            validate_profile(balloon, self.profile(balloon))?;
        }

        let safe_mean = self.safe.threshold.mean();
        let risky_mean = self.risky.threshold.mean();
        if safe_mean <= risky_mean {
            return Err(ConfigError::ThresholdOrdering {
                safe: safe_mean,
                risky: risky_mean,
            });
        }
        // Both schedules are flat past their plateaus.
        let last_pump = self
            .safe
            .reward
            .plateau_pump()
            .max(self.risky.reward.plateau_pump())
            .min(self.risky.threshold.max)
            .max(1);
        for pump in 1..=last_pump {
            let safe = self.safe.reward.gain(pump);
            let risky = self.risky.reward.gain(pump);
            if risky < safe {
                return Err(ConfigError::GrowthOrdering { pump, safe, risky });
            }
        }

        for (field, value) in [
            ("visuals.start_radius", self.visuals.start_radius),
            ("visuals.radius_step", self.visuals.radius_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Visual { field, value });
            }
        }
        for (field, value) in [
            ("timing.feedback_secs", self.timing.feedback_secs),
            ("timing.inter_trial_secs", self.timing.inter_trial_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Pause { field, value });
            }
        }

        self.keys.validate()
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            balloons: Self::default_balloons(),
            p_safe: Self::default_p_safe(),
            show_type_cue: Self::default_show_type_cue(),
            safe: Self::default_safe(),
            risky: Self::default_risky(),
            visuals: VisualConfig::default(),
            timing: TimingConfig::default(),
            keys: KeyBindings::default(),
        }
    }
}

fn validate_profile(balloon: BalloonType, profile: &BalloonProfile) -> Result<(), ConfigError> {
    let range = profile.threshold;
    if range.min > range.max {
        return Err(ConfigError::ThresholdRange {
            balloon,
            min: range.min,
            max: range.max,
        });
    }
    let reward = profile.reward;
    if reward.base_gain == 0 {
        return Err(ConfigError::RewardParams {
            balloon,
            reason: "base_gain must be positive",
        });
    }
    if reward.gain_step == 0 {
        return Err(ConfigError::RewardParams {
            balloon,
            reason: "gain_step must be positive",
        });
    }
    if reward.max_gain < reward.base_gain {
        return Err(ConfigError::RewardParams {
            balloon,
            reason: "max_gain must not be below base_gain",
        });
    }
    Ok(())
}
