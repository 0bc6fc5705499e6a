//! Tutorial driver: wires the script to controls and the event channel

use tracing::info;

use super::script::{Advance, GateOutcome, GatePolicy, TutorialScript};
use crate::config::TrainerConfig;
use crate::error::TrainerError;
use crate::events::{Event, EventSink, Severity, SoundCue};
use crate::fretboard::{ControlId, ControlSet, Mode, PatternCatalog};

const BLOCKED_MESSAGE: &str = "Try pressing the Strum button first!";
const FINISHED_MESSAGE: &str = "Tutorial complete! Go back to the main menu to start playing.";

/// Interactive tutorial run
pub struct TutorialSession {
    script: TutorialScript,
    mode: Mode,
    controls: ControlSet,
    sink: EventSink,
}

impl TutorialSession {
    /// Build the configured script and announce its first step
    pub fn new(
        config: &TrainerConfig,
        catalog: &PatternCatalog,
        sink: EventSink,
    ) -> Result<Self, TrainerError> {
        Self::with_policy(config, catalog, config.tutorial_policy, sink)
    }

    pub fn with_policy(
        config: &TrainerConfig,
        catalog: &PatternCatalog,
        policy: GatePolicy,
        sink: EventSink,
    ) -> Result<Self, TrainerError> {
        let script = TutorialScript::new(&config.tutorial, catalog, config.tutorial_mode, policy)?;
        info!(steps = script.len(), policy = ?script.policy(), "tutorial started");

        let mut session = TutorialSession {
            script,
            mode: config.tutorial_mode,
            controls: ControlSet::new(),
            sink,
        };
        session.show_step();
        Ok(session)
    }

    pub fn script(&self) -> &TutorialScript {
        &self.script
    }

    pub fn controls(&self) -> ControlSet {
        self.controls
    }

    pub fn is_finished(&self) -> bool {
        self.script.is_finished()
    }

    pub fn toggle(&mut self, raw: u32) -> Result<bool, TrainerError> {
        let id = ControlId::new(raw)?;
        let on = self.controls.toggle(id);
        self.sink.emit(Event::ControlToggled { id, on });
        Ok(on)
    }

    /// Strum: opens the current gate if the policy allows it
    pub fn strum(&mut self) -> GateOutcome {
        let outcome = self.script.on_commit_attempt(&self.controls);
        match &outcome {
            GateOutcome::NotWaiting => {}
            GateOutcome::Passed { target } => {
                self.sink.emit(Event::StrumHighlighted(false));
                self.sink.emit(Event::Sound(SoundCue::Target {
                    mode: self.mode,
                    name: target.clone(),
                }));
                self.sink.emit(Event::Feedback {
                    message: format!("Nice! You played {}! Press Next to continue.", target),
                    severity: Severity::Success,
                });
                self.clear_controls();
                self.emit_step_state();
            }
            GateOutcome::Rejected { target } => {
                self.sink.emit(Event::Sound(SoundCue::Error));
                self.sink.emit(Event::Feedback {
                    message: format!("That's not {}, try again!", target),
                    severity: Severity::Error,
                });
            }
        }
        outcome
    }

    /// "Next" button
    pub fn next(&mut self) -> Result<Advance, TrainerError> {
        match self.script.advance() {
            Ok(Advance::Step(index)) => {
                self.show_step();
                Ok(Advance::Step(index))
            }
            Ok(Advance::Finished) => {
                info!("tutorial finished");
                self.clear_controls();
                self.sink.emit(Event::HighlightCleared);
                self.sink.emit(Event::StrumHighlighted(false));
                self.sink.emit(Event::Feedback {
                    message: FINISHED_MESSAGE.to_string(),
                    severity: Severity::Highlight,
                });
                self.sink.emit(Event::TutorialFinished);
                Ok(Advance::Finished)
            }
            Err(TrainerError::Blocked) => {
                self.sink.emit(Event::Feedback {
                    message: BLOCKED_MESSAGE.to_string(),
                    severity: Severity::Info,
                });
                Err(TrainerError::Blocked)
            }
            Err(e) => Err(e),
        }
    }

    fn clear_controls(&mut self) {
        self.controls.clear();
        self.sink.emit(Event::ControlsCleared);
    }

    fn show_step(&mut self) {
        self.clear_controls();
        self.sink.emit(Event::FeedbackCleared);
        self.sink.emit(Event::HighlightCleared);
        if let Some(highlight) = self.script.current().and_then(|step| step.highlight) {
            self.sink.emit(Event::HighlightSet {
                controls: highlight.controls,
                style: highlight.style,
            });
        }
        self.emit_step_state();
    }

    fn emit_step_state(&mut self) {
        let Some(step) = self.script.current() else {
            return;
        };
        let event = Event::TutorialStep {
            text: step.text.to_string(),
            highlighted: self.script.highlighted(),
            blocked: step.awaiting_commit,
        };
        let strum = step.awaiting_commit;
        self.sink.emit(Event::StrumHighlighted(strum));
        self.sink.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;

    fn session(policy: GatePolicy) -> (TutorialSession, Receiver<Event>) {
        let config = TrainerConfig::default();
        let catalog = config.catalog().unwrap();
        let (sink, rx) = EventSink::channel();
        let session = TutorialSession::with_policy(&config, &catalog, policy, sink).unwrap();
        (session, rx)
    }

    fn drain(rx: &Receiver<Event>) -> Vec<Event> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_first_step_announced() {
        let (_session, rx) = session(GatePolicy::Strict);
        let events = drain(&rx);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::TutorialStep { text, blocked: false, .. } if text.starts_with("Welcome")
        )));
    }

    #[test]
    fn test_blocked_next_reports_guidance() {
        let (mut session, rx) = session(GatePolicy::Strict);
        for _ in 0..4 {
            session.next().unwrap();
        }
        drain(&rx);

        assert_eq!(session.next(), Err(TrainerError::Blocked));
        assert_eq!(session.script().step_index(), 4);
        assert_eq!(
            drain(&rx),
            vec![Event::Feedback {
                message: BLOCKED_MESSAGE.to_string(),
                severity: Severity::Info
            }]
        );
    }

    #[test]
    fn test_correct_strum_opens_gate_and_clears_controls() {
        let (mut session, rx) = session(GatePolicy::Strict);
        for _ in 0..4 {
            session.next().unwrap();
        }
        for id in [19, 31, 26, 36, 37] {
            session.toggle(id).unwrap();
        }
        drain(&rx);

        let outcome = session.strum();
        assert_eq!(
            outcome,
            GateOutcome::Passed {
                target: "D Major".to_string()
            }
        );
        assert!(session.controls().is_empty());
        let events = drain(&rx);
        assert!(events.contains(&Event::ControlsCleared));
        assert!(events.contains(&Event::Sound(SoundCue::Target {
            mode: Mode::Easy,
            name: "D Major".to_string()
        })));
        assert_eq!(session.next(), Ok(Advance::Step(5)));
    }

    #[test]
    fn test_wrong_strum_keeps_gate_closed_under_strict() {
        let (mut session, rx) = session(GatePolicy::Strict);
        for _ in 0..4 {
            session.next().unwrap();
        }
        session.toggle(19).unwrap();
        drain(&rx);

        assert!(matches!(session.strum(), GateOutcome::Rejected { .. }));
        assert!(drain(&rx).contains(&Event::Sound(SoundCue::Error)));
        assert_eq!(session.controls().len(), 1);
        assert_eq!(session.next(), Err(TrainerError::Blocked));
    }

    #[test]
    fn test_lenient_walkthrough_finishes() {
        let (mut session, rx) = session(GatePolicy::Lenient);
        loop {
            session.strum();
            if session.next().unwrap() == Advance::Finished {
                break;
            }
        }
        assert!(session.is_finished());
        assert!(drain(&rx).contains(&Event::TutorialFinished));
        assert_eq!(session.next(), Err(TrainerError::TutorialComplete));
    }

    #[test]
    fn test_invalid_toggle_rejected() {
        let (mut session, _rx) = session(GatePolicy::Strict);
        assert_eq!(session.toggle(42), Err(TrainerError::InvalidControlId(42)));
        assert!(session.controls().is_empty());
    }
}
