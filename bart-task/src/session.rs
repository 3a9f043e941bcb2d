//! Session sequencing: balloons in order, running total, log, and persistence.
use std::error::Error as StdError;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::config::{ConfigError, TaskConfig};
use crate::event::{SessionInfo, SessionLog};
use crate::ports::{Presentation, RecordSink, SCREEN_SIGNALS, SessionClock, Signal};
use crate::scene::Scene;
use crate::threshold::ThresholdGenerator;
use crate::trial::{TrialEnd, TrialRunner};

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures surfaced by [`SessionController`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid task configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("presentation failed: {0}")]
    Presentation(#[source] BoxedError),
    #[error("failed to persist {records} records: {source}")]
    Persistence {
        records: usize,
        #[source]
        source: BoxedError,
    },
    #[error("session has already been run")]
    AlreadyRun,
    #[error("session log has not been produced yet")]
    NotFinished,
    #[error("session log was already persisted")]
    AlreadyPersisted,
}

/// Final figures for a completed or aborted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub total_points: u32,
    /// Balloons that reached an outcome (exploded or collected).
    pub balloons_completed: u32,
    pub quit_early: bool,
    pub records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Finished { persisted: bool },
}

/// Runs N balloons against the presentation port and hands the log to a sink.
#[derive(Debug)]
pub struct SessionController<'cfg, R> {
    config: &'cfg TaskConfig,
    info: SessionInfo,
    generator: ThresholdGenerator<'cfg, R>,
    log: SessionLog,
    total: u32,
    balloons_completed: u32,
    quit_early: bool,
    phase: Phase,
}

impl<'cfg> SessionController<'cfg, ChaCha20Rng> {
    /// Controller whose balloons are drawn from the stream for `user_seed`.
    #[must_use]
    pub fn from_user_seed(config: &'cfg TaskConfig, info: SessionInfo, user_seed: u64) -> Self {
        Self::new(
            config,
            info,
            ThresholdGenerator::from_user_seed(config, user_seed),
        )
    }
}

impl<'cfg, R: Rng> SessionController<'cfg, R> {
    #[must_use]
    pub const fn new(
        config: &'cfg TaskConfig,
        info: SessionInfo,
        generator: ThresholdGenerator<'cfg, R>,
    ) -> Self {
        Self {
            config,
            info,
            generator,
            log: SessionLog::new(),
            total: 0,
            balloons_completed: 0,
            quit_early: false,
            phase: Phase::Ready,
        }
    }

    /// Points collected so far.
    #[must_use]
    pub const fn total_points(&self) -> u32 {
        self.total
    }

    /// Every record emitted so far, in order.
    #[must_use]
    pub const fn log(&self) -> &SessionLog {
        &self.log
    }

    #[must_use]
    pub const fn info(&self) -> &SessionInfo {
        &self.info
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_points: self.total,
            balloons_completed: self.balloons_completed,
            quit_early: self.quit_early,
            records: self.log.records().len(),
        }
    }

    /// Run the whole session, then write the log to `sink` exactly once.
    ///
    /// Quitting is not an error: the partial log is persisted and the summary
    /// reports `quit_early`. If the presentation fails, the records gathered
    /// so far are still persisted before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] before anything is shown if the
    /// configuration is invalid, [`SessionError::Presentation`] when the adapter fails,
    /// [`SessionError::Persistence`] when the sink rejects the log (which stays
    /// available for [`Self::retry_persist`]), or [`SessionError::AlreadyRun`].
    pub fn run<P, C, S>(
        &mut self,
        presentation: &mut P,
        clock: &mut C,
        sink: &mut S,
    ) -> Result<SessionSummary, SessionError>
    where
        P: Presentation,
        C: SessionClock,
        S: RecordSink,
    {
        if self.phase != Phase::Ready {
            return Err(SessionError::AlreadyRun);
        }
        self.config.validate()?;
        info!(
            "session start participant={} session={} balloons={}",
            self.info.participant, self.info.session, self.config.balloons
        );

        let played = self.play(presentation, clock);
        self.phase = Phase::Finished { persisted: false };
        let persisted = self.persist(sink);

        match played {
            Err(err) => {
                if let Err(persist_err) = persisted {
                    warn!("log not persisted after presentation failure: {persist_err}");
                }
                Err(SessionError::Presentation(Box::new(err)))
            }
            Ok(()) => {
                persisted?;
                let summary = self.summary();
                info!(
                    "session end total={} balloons={} quit_early={}",
                    summary.total_points, summary.balloons_completed, summary.quit_early
                );
                Ok(summary)
            }
        }
    }

    /// Write the retained log to another sink after a failed write.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFinished`] before the session has run,
    /// [`SessionError::AlreadyPersisted`] once a write has succeeded, or the
    /// sink's failure.
    pub fn retry_persist<S: RecordSink>(&mut self, sink: &mut S) -> Result<(), SessionError> {
        match self.phase {
            Phase::Ready => Err(SessionError::NotFinished),
            Phase::Finished { persisted: true } => Err(SessionError::AlreadyPersisted),
            Phase::Finished { persisted: false } => self.persist(sink),
        }
    }

    fn play<P, C>(&mut self, presentation: &mut P, clock: &mut C) -> Result<(), P::Error>
    where
        P: Presentation,
        C: SessionClock,
    {
        let config = self.config;
        presentation.render(&Scene::instructions(&config.keys, config.show_type_cue))?;
        if presentation.wait_for_input(&SCREEN_SIGNALS)? == Signal::Quit {
            warn!("participant quit on the instruction screen");
            self.quit_early = true;
            return Ok(());
        }

        clock.start();
        let runner = TrialRunner::new(config, &self.info);
        let inter_trial = Duration::from_secs_f64(config.timing.inter_trial_secs);

        for balloon_index in 1..=config.balloons {
            let trial = self.generator.next_trial_config(balloon_index);
            let mut emitted = Vec::new();
            let result = runner.run(trial, self.total, presentation, &*clock, &mut emitted);
            self.log.extend(emitted);
            let report = result?;

            if report.end == TrialEnd::Quit {
                warn!(
                    "participant quit during balloon {balloon_index} after {} pumps",
                    report.pump_count
                );
                self.quit_early = true;
                return Ok(());
            }
            self.total = self.total.saturating_add(report.points_delta);
            self.balloons_completed += 1;

            presentation.render(&Scene::Blank)?;
            presentation.pause(inter_trial)?;
        }

        presentation.render(&Scene::finished(&config.keys, self.total))?;
        if presentation.wait_for_input(&SCREEN_SIGNALS)? == Signal::Quit {
            info!("participant quit on the end screen");
        }
        Ok(())
    }

    fn persist<S: RecordSink>(&mut self, sink: &mut S) -> Result<(), SessionError> {
        let records = self.log.records();
        match sink.write_records(&self.info, records) {
            Ok(()) => {
                info!("persisted {} records", records.len());
                self.phase = Phase::Finished { persisted: true };
                Ok(())
            }
            Err(err) => {
                warn!("failed to persist {} records: {err}", records.len());
                Err(SessionError::Persistence {
                    records: records.len(),
                    source: Box::new(err),
                })
            }
        }
    }
}
