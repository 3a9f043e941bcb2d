//! Random draw of balloon type and explosion threshold.
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::balloon::{BalloonType, TrialConfig};
use crate::config::TaskConfig;
use crate::seed;

/// Draws each balloon's type and, conditioned on it, its explosion threshold.
///
/// Every draw is independent of earlier balloons. The random source is owned
/// by the generator so tests can pass a seeded one.
#[derive(Debug, Clone)]
pub struct ThresholdGenerator<'cfg, R> {
    config: &'cfg TaskConfig,
    rng: R,
}

impl<'cfg> ThresholdGenerator<'cfg, ChaCha20Rng> {
    /// Generator over the balloon stream derived from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(config: &'cfg TaskConfig, user_seed: u64) -> Self {
        Self::new(config, seed::balloon_rng(user_seed))
    }
}

impl<'cfg, R: Rng> ThresholdGenerator<'cfg, R> {
    #[must_use]
    pub const fn new(config: &'cfg TaskConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Configuration for the balloon at one-based position `balloon_index`.
    pub fn next_trial_config(&mut self, balloon_index: u32) -> TrialConfig {
        let balloon_type = if self.rng.gen_bool(self.config.p_safe) {
            BalloonType::Safe
        } else {
            BalloonType::Risky
        };
        let profile = self.config.profile(balloon_type);
        let range = profile.threshold;
        let explosion_threshold = self.rng.gen_range(range.min..=range.max);
        TrialConfig {
            balloon_index,
            balloon_type,
            explosion_threshold,
            reward: profile.reward,
        }
    }

    /// Draw the whole session plan up front.
    ///
    /// Consumes the same stream as repeated [`Self::next_trial_config`] calls,
    /// so both produce identical balloons for the same seed.
    pub fn draw_schedule(&mut self, balloons: u32) -> Vec<TrialConfig> {
        (1..=balloons)
            .map(|index| self.next_trial_config(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balloon::ThresholdRange;
    use rand::SeedableRng;

    #[test]
    fn thresholds_stay_within_type_range() {
        let config = TaskConfig::default();
        let mut generator = ThresholdGenerator::from_user_seed(&config, 99);
        for trial in generator.draw_schedule(2_000) {
            let range = config.profile(trial.balloon_type).threshold;
            assert!(range.contains(trial.explosion_threshold), "{trial:?}");
            assert_eq!(trial.reward, config.profile(trial.balloon_type).reward);
        }
    }

    #[test]
    fn indices_are_one_based_and_sequential() {
        let config = TaskConfig::default();
        let plan = ThresholdGenerator::from_user_seed(&config, 3).draw_schedule(5);
        let indices: Vec<u32> = plan.iter().map(|t| t.balloon_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn same_seed_same_plan() {
        let config = TaskConfig::default();
        let first = ThresholdGenerator::from_user_seed(&config, 1337).draw_schedule(30);
        let mut stepwise = ThresholdGenerator::from_user_seed(&config, 1337);
        let second: Vec<TrialConfig> = (1..=30).map(|i| stepwise.next_trial_config(i)).collect();
        assert_eq!(first, second);
        let other = ThresholdGenerator::from_user_seed(&config, 1338).draw_schedule(30);
        assert_ne!(first, other);
    }

    #[test]
    fn probability_extremes_pin_the_type() {
        let all_safe = TaskConfig {
            p_safe: 1.0,
            ..TaskConfig::default()
        };
        let plan = ThresholdGenerator::new(&all_safe, ChaCha20Rng::seed_from_u64(1)).draw_schedule(50);
        assert!(plan.iter().all(|t| t.balloon_type == BalloonType::Safe));

        let all_risky = TaskConfig {
            p_safe: 0.0,
            ..TaskConfig::default()
        };
        let plan = ThresholdGenerator::new(&all_risky, ChaCha20Rng::seed_from_u64(1)).draw_schedule(50);
        assert!(plan.iter().all(|t| t.balloon_type == BalloonType::Risky));
    }

    #[test]
    fn both_types_appear_at_even_odds() {
        let config = TaskConfig::default();
        let plan = ThresholdGenerator::from_user_seed(&config, 2024).draw_schedule(1_000);
        let safe = plan
            .iter()
            .filter(|t| t.balloon_type == BalloonType::Safe)
            .count();
        assert!((350..=650).contains(&safe), "safe count {safe}");
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut config = TaskConfig::default();
        config.risky.threshold = ThresholdRange::new(3, 3);
        config.p_safe = 0.0;
        let plan = ThresholdGenerator::from_user_seed(&config, 8).draw_schedule(20);
        assert!(plan.iter().all(|t| t.explosion_threshold == 3));
    }
}
