//! Single-balloon pump/collect state machine and its interactive driver.
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::balloon::TrialConfig;
use crate::config::TaskConfig;
use crate::event::{EventKind, EventRecord, SessionInfo};
use crate::ports::{Presentation, SessionClock, Signal, TRIAL_SIGNALS};
use crate::scene::{self, BalloonView, Feedback, Scene};

/// Where a trial currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    InProgress,
    Exploded,
    Collected,
}

impl TrialOutcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Participant decision applied to a balloon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialAction {
    Pump,
    Collect,
}

/// Mutable per-trial state; discarded once the trial ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialState {
    pub pump_count: u32,
    pub current_points: u32,
    pub outcome: TrialOutcome,
}

impl Default for TrialState {
    fn default() -> Self {
        Self {
            pump_count: 0,
            current_points: 0,
            outcome: TrialOutcome::InProgress,
        }
    }
}

/// Pure state machine for one balloon.
#[derive(Debug, Clone)]
pub struct Trial {
    config: TrialConfig,
    state: TrialState,
}

impl Trial {
    #[must_use]
    pub fn new(config: TrialConfig) -> Self {
        Self {
            config,
            state: TrialState::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TrialConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &TrialState {
        &self.state
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.outcome.is_terminal()
    }

    /// Points this trial adds to the session total: everything on collect,
    /// nothing otherwise.
    #[must_use]
    pub const fn points_delta(&self) -> u32 {
        match self.state.outcome {
            TrialOutcome::Collected => self.state.current_points,
            TrialOutcome::InProgress | TrialOutcome::Exploded => 0,
        }
    }

    /// Apply one action observed at `at`, given the session total before this trial.
    ///
    /// Returns the emitted record, or `None` once the trial is terminal.
    pub fn apply(
        &mut self,
        info: &SessionInfo,
        action: TrialAction,
        at: Duration,
        total_before: u32,
    ) -> Option<EventRecord> {
        if self.is_finished() {
            return None;
        }
        let record = match action {
            TrialAction::Pump => self.pump(info, at, total_before),
            TrialAction::Collect => {
                self.state.outcome = TrialOutcome::Collected;
                let points = self.state.current_points;
                EventRecord::new(info, &self.config, EventKind::Collect, at)
                    .with_pumps(self.state.pump_count)
                    .with_points(points, total_before.saturating_add(points))
            }
        };
        Some(record)
    }

    fn pump(&mut self, info: &SessionInfo, at: Duration, total_before: u32) -> EventRecord {
        self.state.pump_count = self.state.pump_count.saturating_add(1);
        let pumps = self.state.pump_count;

        // The balloon survives exactly `explosion_threshold` pumps.
        if pumps > self.config.explosion_threshold {
            self.state.current_points = 0;
            self.state.outcome = TrialOutcome::Exploded;
            return EventRecord::new(info, &self.config, EventKind::Explode, at)
                .with_pumps(pumps)
                .with_points(0, total_before);
        }

        let gain = self.config.reward.gain(pumps);
        self.state.current_points = self.state.current_points.saturating_add(gain);
        EventRecord::new(info, &self.config, EventKind::Pump, at)
            .with_pumps(pumps)
            .with_gain(gain)
            .with_points(self.state.current_points, total_before)
    }

    /// Current appearance of the balloon.
    #[must_use]
    pub fn view(&self, task: &TaskConfig) -> BalloonView {
        BalloonView {
            balloon_index: self.config.balloon_index,
            balloon_count: task.balloons,
            cue: task.show_type_cue.then_some(self.config.balloon_type),
            radius: task.visuals.radius_for(self.state.pump_count),
            points_this_run: self.state.current_points,
            hint: scene::trial_hint(&task.keys),
        }
    }
}

/// How an interactive trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEnd {
    /// Reached a terminal outcome.
    Finished(TrialOutcome),
    /// The participant quit before the balloon resolved.
    Quit,
}

/// Summary of one interactive trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialReport {
    pub config: TrialConfig,
    pub end: TrialEnd,
    pub pump_count: u32,
    pub points_delta: u32,
}

/// Drives one balloon through the presentation port.
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner<'a> {
    task: &'a TaskConfig,
    info: &'a SessionInfo,
}

impl<'a> TrialRunner<'a> {
    #[must_use]
    pub const fn new(task: &'a TaskConfig, info: &'a SessionInfo) -> Self {
        Self { task, info }
    }

    /// Run the balloon until it explodes, is collected, or the participant quits.
    ///
    /// Records are pushed onto `emitted` as they happen, so the caller keeps
    /// them even if the presentation fails part way through.
    ///
    /// # Errors
    ///
    /// Returns the presentation adapter's error if rendering, input, or pausing fails.
    pub fn run<P, C>(
        &self,
        config: TrialConfig,
        total_before: u32,
        presentation: &mut P,
        clock: &C,
        emitted: &mut Vec<EventRecord>,
    ) -> Result<TrialReport, P::Error>
    where
        P: Presentation,
        C: SessionClock,
    {
        let mut trial = Trial::new(config);
        debug!(
            "balloon {} ({}) threshold {}",
            config.balloon_index, config.balloon_type, config.explosion_threshold
        );

        loop {
            presentation.render(&Scene::Balloon(trial.view(self.task)))?;
            let signal = presentation.wait_for_input(&TRIAL_SIGNALS)?;
            let at = clock.elapsed();
            let action = match signal {
                Signal::Pump => TrialAction::Pump,
                Signal::Collect => TrialAction::Collect,
                Signal::Quit => {
                    return Ok(TrialReport {
                        config,
                        end: TrialEnd::Quit,
                        pump_count: trial.state().pump_count,
                        points_delta: 0,
                    });
                }
                Signal::Advance => continue,
            };

            if let Some(record) = trial.apply(self.info, action, at, total_before) {
                debug!(
                    "{} pump={} points={} total={}",
                    record.kind.label(),
                    record.pump_number,
                    record.points_this_trial,
                    record.total_points
                );
                emitted.push(record);
            }

            let feedback = match trial.state().outcome {
                TrialOutcome::InProgress => continue,
                TrialOutcome::Exploded => Feedback::Exploded,
                TrialOutcome::Collected => Feedback::Collected,
            };
            presentation.render(&Scene::Feedback { feedback })?;
            presentation.pause(Duration::from_secs_f64(self.task.timing.feedback_secs))?;

            return Ok(TrialReport {
                config,
                end: TrialEnd::Finished(trial.state().outcome),
                pump_count: trial.state().pump_count,
                points_delta: trial.points_delta(),
            });
        }
    }
}
