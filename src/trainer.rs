//! Practice session coordinator
//!
//! Owns the live ControlSet, the SessionEngine and the Scorekeeper for one
//! mode, persists best times through [`Records`] and reports everything to
//! the presentation as [`Event`]s. Time advances only through
//! [`Trainer::tick`].

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::events::{Event, EventSink, Mood, Severity, SoundCue, TargetView};
use crate::feedback::DeferredClear;
use crate::fretboard::{ControlId, ControlSet, Mode, PatternCatalog, Target};
use crate::session::{
    AttemptTracker, MistakeLog, Outcome, Scorekeeper, SessionEngine, SessionEvent,
};
use crate::store::Records;

/// End-of-session report
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub mode: Mode,
    pub complete: bool,
    pub elapsed: f32,
    pub best: Option<f32>,
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f32,
    pub best_streak: u32,
    /// Targets missed three or more times, worst first
    pub trouble: Vec<(String, u32)>,
}

/// One practice run through a mode's sequence
pub struct Trainer {
    mode: Mode,
    catalog: PatternCatalog,
    sequence: Vec<String>,
    shuffle: bool,
    controls: ControlSet,
    engine: SessionEngine,
    score: Scorekeeper,
    best: Option<f32>,
    records: Records,
    feedback: DeferredClear,
    mood: DeferredClear,
    /// Seconds since the trainer was created, drives the deferred clears
    clock: f32,
    attempts: AttemptTracker,
    mistakes: MistakeLog,
    sink: EventSink,
}

impl Trainer {
    /// Validate the table for `mode`, read the best record and start timing
    pub fn new(
        config: &TrainerConfig,
        mode: Mode,
        records: Records,
        sink: EventSink,
    ) -> Result<Self, TrainerError> {
        let catalog = config.catalog()?;
        let sequence = config.sequence(mode)?.to_vec();
        let engine = Self::build_engine(mode, &sequence, config.shuffle, &catalog)?;

        let mut trainer = Trainer {
            mode,
            catalog,
            sequence,
            shuffle: config.shuffle,
            controls: ControlSet::new(),
            engine,
            score: Scorekeeper::new(),
            best: None,
            records,
            feedback: DeferredClear::new(config.feedback_hold_secs),
            mood: DeferredClear::new(config.mood_hold_secs),
            clock: 0.0,
            attempts: AttemptTracker::new(),
            mistakes: MistakeLog::new(),
            sink,
        };
        trainer.begin();
        Ok(trainer)
    }

    fn build_engine(
        mode: Mode,
        sequence: &[String],
        shuffle: bool,
        catalog: &PatternCatalog,
    ) -> Result<SessionEngine, TrainerError> {
        if !shuffle {
            return SessionEngine::new(mode, sequence, catalog);
        }
        let mut order = sequence.to_vec();
        order.shuffle(&mut rand::thread_rng());
        debug!(?order, "sequence shuffled");
        SessionEngine::new(mode, &order, catalog)
    }

    fn begin(&mut self) {
        self.controls.clear();
        self.best = self.load_best();
        self.feedback.cancel();
        self.mood.cancel();
        self.score.start();
        info!(mode = %self.mode, best = ?self.best, "practice started");

        self.sink.emit(Event::ControlsCleared);
        self.sink.emit(Event::FeedbackCleared);
        self.sink.emit(Event::Mood(Mood::Neutral));
        self.sink.emit(Event::BestTimeUpdated(self.best));
        self.sink.emit(Event::TimerTick(0.0));
        if let Ok(target) = self.engine.current_target() {
            let view = self.target_view(target);
            self.sink.emit(Event::TargetChanged(view));
        }
    }

    fn load_best(&self) -> Option<f32> {
        match self.records.best_time(self.mode) {
            Ok(best) => best,
            Err(e) => {
                warn!(error = %e, "best time unavailable");
                None
            }
        }
    }

    fn target_view(&self, target: &Target) -> TargetView {
        TargetView {
            mode: self.mode,
            name: target.name.clone(),
            prompt: self.mode.prompt(&target.name),
            index: self.engine.current_index(),
            total: self.engine.len(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn controls(&self) -> ControlSet {
        self.controls.snapshot()
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn elapsed(&self) -> f32 {
        self.score.elapsed()
    }

    pub fn is_timing(&self) -> bool {
        self.score.is_running()
    }

    pub fn best_time(&self) -> Option<f32> {
        self.best
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn attempts(&self) -> &AttemptTracker {
        &self.attempts
    }

    pub fn mistakes(&self) -> &MistakeLog {
        &self.mistakes
    }

    /// Flip one control
    pub fn toggle(&mut self, raw: u32) -> Result<bool, TrainerError> {
        let id = ControlId::new(raw)?;
        let on = self.controls.toggle(id);
        debug!(control = raw, on, active = %self.controls, "toggle");
        self.sink.emit(Event::ControlToggled { id, on });
        Ok(on)
    }

    /// Strum: evaluate the live controls against the current target
    pub fn strum(&mut self) -> Result<Outcome, TrainerError> {
        let outcome = self.engine.commit(&self.controls)?;
        self.attempts.record(outcome.is_correct());

        match &outcome {
            Outcome::Correct { target, .. } => {
                self.show_feedback(format!("Correct! You played {}", target), Severity::Success);
                self.set_mood(Mood::Happy);
                self.sink.emit(Event::Sound(SoundCue::Target {
                    mode: self.mode,
                    name: target.clone(),
                }));
            }
            Outcome::Incorrect { target, attempted } => {
                if let Ok(current) = self.engine.current_target() {
                    self.mistakes.record(current, attempted);
                }
                self.show_feedback(format!("That's not {}, try again!", target), Severity::Error);
                self.set_mood(Mood::Sad);
                self.sink.emit(Event::Sound(SoundCue::Error));
            }
        }

        let events: Vec<SessionEvent> = self.engine.drain_events().collect();
        for event in events {
            match event {
                SessionEvent::Mismatch { .. } => {}
                SessionEvent::TargetAdvanced { next, .. } => {
                    self.clear_controls();
                    let view = self.target_view(&next);
                    self.sink.emit(Event::TargetChanged(view));
                }
                SessionEvent::SessionComplete => self.finish(),
            }
        }

        Ok(outcome)
    }

    fn finish(&mut self) {
        self.score.stop();
        self.clear_controls();
        let elapsed = self.score.elapsed();
        self.sink.emit(Event::TimerTick(elapsed));
        self.sink.emit(Event::SessionComplete);
        self.show_feedback(
            format!("You completed all {}s!", self.mode.target_noun()),
            Severity::Info,
        );

        if let Some(best) = Scorekeeper::on_session_complete(elapsed, self.best) {
            self.best = Some(best);
            if let Err(e) = self.records.save_best_time(self.mode, best) {
                warn!(error = %e, "new best time not persisted");
            }
            self.show_feedback("New Best Time!".to_string(), Severity::Highlight);
            self.sink.emit(Event::BestTimeUpdated(self.best));
        }
        info!(mode = %self.mode, elapsed, best = ?self.best, "practice finished");
    }

    /// Advance time by `delta` seconds
    pub fn tick(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.clock += delta;
        }
        if self.score.is_running() {
            self.score.tick(delta);
            self.sink.emit(Event::TimerTick(self.score.elapsed()));
        }
        if self.feedback.poll(self.clock).is_some() {
            self.sink.emit(Event::FeedbackCleared);
        }
        if self.mood.poll(self.clock).is_some() {
            self.sink.emit(Event::Mood(Mood::Neutral));
        }
    }

    /// Start over in the same mode
    pub fn restart(&mut self) -> Result<(), TrainerError> {
        self.engine = Self::build_engine(self.mode, &self.sequence, self.shuffle, &self.catalog)?;
        self.attempts = AttemptTracker::new();
        self.mistakes.reset();
        self.begin();
        Ok(())
    }

    /// Forget the stored record for this mode
    pub fn reset_best_time(&mut self) {
        if let Err(e) = self.records.reset_best_time(self.mode) {
            warn!(error = %e, "best time reset not persisted");
        }
        self.best = None;
        self.sink.emit(Event::BestTimeUpdated(None));
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode,
            complete: self.engine.is_complete(),
            elapsed: self.score.elapsed(),
            best: self.best,
            attempts: self.attempts.attempts(),
            correct: self.attempts.correct(),
            accuracy: self.attempts.accuracy(),
            best_streak: self.attempts.best_streak(),
            trouble: self.mistakes.trouble_targets(),
        }
    }

    /// Hand the records back for the shutdown flush
    pub fn into_records(self) -> Records {
        self.records
    }

    fn clear_controls(&mut self) {
        self.controls.clear();
        self.sink.emit(Event::ControlsCleared);
    }

    fn show_feedback(&mut self, message: String, severity: Severity) {
        self.sink.emit(Event::Feedback { message, severity });
        self.feedback.schedule(self.clock);
    }

    fn set_mood(&mut self, mood: Mood) {
        self.sink.emit(Event::Mood(mood));
        self.mood.schedule(self.clock);
    }
}
