//! Step-plateau reward schedule applied to each successful pump.
use serde::{Deserialize, Serialize};

/// Parameters of a balloon type's reward growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RewardParams {
    /// Points paid by the first pump.
    pub base_gain: u32,
    /// Number of pumps spent at each gain level before it rises by one.
    pub gain_step: u32,
    /// Gain ceiling; once reached every further pump pays this amount.
    pub max_gain: u32,
}

impl RewardParams {
    #[must_use]
    pub const fn new(base_gain: u32, gain_step: u32, max_gain: u32) -> Self {
        Self {
            base_gain,
            gain_step,
            max_gain,
        }
    }

    /// Gain paid by the given one-based pump number.
    ///
    /// # Panics
    ///
    /// Panics when `pump_number` is zero or `gain_step` is zero.
    #[must_use]
    pub fn gain(&self, pump_number: u32) -> u32 {
        gain_for_pump(pump_number, self.base_gain, self.gain_step, self.max_gain)
    }

    /// First pump number that pays `max_gain`.
    ///
    /// Returns 1 when the base gain already sits at or above the cap.
    #[must_use]
    pub fn plateau_pump(&self) -> u32 {
        let levels = self.max_gain.saturating_sub(self.base_gain);
        levels.saturating_mul(self.gain_step).saturating_add(1)
    }

    /// Serialized form used in the event log: `base,step,max`.
    #[must_use]
    pub fn triple(&self) -> String {
        format!("{},{},{}", self.base_gain, self.gain_step, self.max_gain)
    }
}

/// Gain for a pump: `base + floor((pump - 1) / step)`, capped at `max`.
///
/// # Panics
///
/// Panics when `pump_number` is zero or `gain_step` is zero. Both indicate a
/// caller bug; the trial state machine never produces either.
#[must_use]
pub fn gain_for_pump(pump_number: u32, base_gain: u32, gain_step: u32, max_gain: u32) -> u32 {
    assert!(pump_number >= 1, "pump numbers are one-based");
    assert!(gain_step >= 1, "gain_step must be positive");
    let gain = base_gain.saturating_add((pump_number - 1) / gain_step);
    gain.min(max_gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFE: RewardParams = RewardParams::new(1, 4, 5);
    const RISKY: RewardParams = RewardParams::new(1, 2, 6);

    #[test]
    fn safe_schedule_rises_every_fourth_pump() {
        let gains: Vec<u32> = (1..=8).map(|p| SAFE.gain(p)).collect();
        assert_eq!(gains, vec![1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn risky_schedule_rises_every_second_pump() {
        let gains: Vec<u32> = (1..=8).map(|p| RISKY.gain(p)).collect();
        assert_eq!(gains, vec![1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn gain_plateaus_at_max() {
        assert_eq!(SAFE.plateau_pump(), 17);
        assert_eq!(SAFE.gain(16), 4);
        assert_eq!(SAFE.gain(17), 5);
        assert_eq!(SAFE.gain(500), 5);
        assert_eq!(RISKY.plateau_pump(), 11);
        assert_eq!(RISKY.gain(11), 6);
        assert_eq!(RISKY.gain(u32::MAX), 6);
    }

    #[test]
    fn gain_is_monotone_and_bounded() {
        for params in [SAFE, RISKY, RewardParams::new(3, 1, 4), RewardParams::new(2, 7, 2)] {
            let mut previous = 0;
            for pump in 1..=200 {
                let gain = params.gain(pump);
                assert!(gain >= previous, "{params:?} decreased at pump {pump}");
                assert!(gain <= params.max_gain, "{params:?} exceeded max at {pump}");
                previous = gain;
            }
        }
    }

    #[test]
    fn risky_never_pays_less_than_safe_early() {
        for pump in 1..=22 {
            assert!(RISKY.gain(pump) >= SAFE.gain(pump), "pump {pump}");
        }
    }

    #[test]
    fn base_above_cap_is_clamped() {
        assert_eq!(gain_for_pump(1, 9, 2, 4), 4);
        assert_eq!(RewardParams::new(9, 2, 4).plateau_pump(), 1);
    }

    #[test]
    fn triple_formats_comma_joined() {
        assert_eq!(SAFE.triple(), "1,4,5");
    }

    #[test]
    #[should_panic(expected = "one-based")]
    fn zero_pump_is_a_contract_violation() {
        let _ = gain_for_pump(0, 1, 4, 5);
    }
}
