//! Balloon types, their explosion ranges, and the per-trial configuration.
use serde::{Deserialize, Serialize};

use crate::reward::RewardParams;

/// Risk class assigned to a balloon for the whole of its trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalloonType {
    /// Explodes later on average, pays out slowly.
    Safe,
    /// Explodes earlier on average, pays out quickly.
    Risky,
}

impl BalloonType {
    /// Lowercase label used in the event log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Risky => "risky",
        }
    }
}

impl std::fmt::Display for BalloonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive range of explosion thresholds for one balloon type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min: u32,
    pub max: u32,
}

impl ThresholdRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Expected threshold under a uniform draw.
    #[must_use]
    pub fn mean(&self) -> f64 {
        (f64::from(self.min) + f64::from(self.max)) / 2.0
    }

    #[must_use]
    pub const fn contains(&self, threshold: u32) -> bool {
        threshold >= self.min && threshold <= self.max
    }
}

/// Everything the generator needs to know about one balloon type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalloonProfile {
    pub threshold: ThresholdRange,
    pub reward: RewardParams,
}

/// Read-only description of a single balloon, fixed at trial start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// One-based position of the balloon within the session.
    pub balloon_index: u32,
    pub balloon_type: BalloonType,
    /// Highest pump count the balloon survives; the next pump explodes it.
    pub explosion_threshold: u32,
    pub reward: RewardParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_mean_and_membership() {
        let range = ThresholdRange::new(5, 22);
        assert!((range.mean() - 13.5).abs() < f64::EPSILON);
        assert!(range.contains(5));
        assert!(range.contains(22));
        assert!(!range.contains(4));
        assert!(!range.contains(23));
    }

    #[test]
    fn balloon_type_labels_are_lowercase() {
        assert_eq!(BalloonType::Safe.to_string(), "safe");
        assert_eq!(BalloonType::Risky.label(), "risky");
        let json = serde_json::to_string(&BalloonType::Risky).unwrap();
        assert_eq!(json, "\"risky\"");
    }
}
