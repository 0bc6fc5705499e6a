//! Tutorial step state machine
//!
//! Steps are resolved against the catalog when the script is built, so a
//! gate naming an unknown target fails construction and never surfaces
//! mid-tutorial.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrainerError;
use crate::events::HighlightStyle;
use crate::fretboard::{ControlSet, Mode, PatternCatalog, Target};

/// Controls a step lights up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepHighlight {
    pub controls: ControlSet,
    pub style: HighlightStyle,
}

impl StepHighlight {
    pub fn guide(controls: ControlSet) -> Self {
        StepHighlight {
            controls,
            style: HighlightStyle::Guide,
        }
    }

    pub fn mutes(controls: ControlSet) -> Self {
        StepHighlight {
            controls,
            style: HighlightStyle::Mute,
        }
    }
}

/// One instructional unit as declared in configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TutorialStep {
    pub text: String,
    #[serde(default)]
    pub highlight: Option<StepHighlight>,
    /// Target that must be strummed before the step can be left
    #[serde(default)]
    pub gate: Option<String>,
}

impl TutorialStep {
    pub fn text(text: impl Into<String>) -> Self {
        TutorialStep {
            text: text.into(),
            highlight: None,
            gate: None,
        }
    }

    pub fn gated(text: impl Into<String>, target: impl Into<String>) -> Self {
        TutorialStep {
            text: text.into(),
            highlight: None,
            gate: Some(target.into()),
        }
    }

    pub fn with_highlight(mut self, highlight: StepHighlight) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// What a strum must prove to open a gated step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePolicy {
    /// The active set must exactly match the gate target
    #[default]
    Strict,
    /// Any strum while waiting opens the gate
    Lenient,
}

/// Result of a strum during the tutorial
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// The current step is not waiting for a strum
    NotWaiting,
    Passed { target: String },
    /// Strict policy only: the strum did not match
    Rejected { target: String },
}

/// Result of a successful advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Step(usize),
    Finished,
}

#[derive(Clone, Debug)]
struct ResolvedStep {
    text: String,
    highlight: Option<StepHighlight>,
    gate: Option<Target>,
}

impl ResolvedStep {
    /// Explicit highlight, or the gate target's controls
    fn highlight(&self) -> Option<StepHighlight> {
        self.highlight.or_else(|| {
            self.gate
                .as_ref()
                .map(|target| StepHighlight::guide(target.required))
        })
    }
}

/// Read-only view of the current step
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub highlight: Option<StepHighlight>,
    pub gate: Option<&'a Target>,
    pub awaiting_commit: bool,
}

/// State machine over `index ∈ [0, steps.len()]`
#[derive(Clone, Debug)]
pub struct TutorialScript {
    steps: Vec<ResolvedStep>,
    index: usize,
    awaiting_commit: bool,
    highlighted: ControlSet,
    policy: GatePolicy,
}

impl TutorialScript {
    pub fn new(
        steps: &[TutorialStep],
        catalog: &PatternCatalog,
        mode: Mode,
        policy: GatePolicy,
    ) -> Result<Self, TrainerError> {
        let steps = steps
            .iter()
            .map(|step| -> Result<ResolvedStep, TrainerError> {
                let gate = match &step.gate {
                    Some(name) => Some(catalog.resolve(mode, name)?.clone()),
                    None => None,
                };
                Ok(ResolvedStep {
                    text: step.text.clone(),
                    highlight: step.highlight,
                    gate,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut script = TutorialScript {
            steps,
            index: 0,
            awaiting_commit: false,
            highlighted: ControlSet::new(),
            policy,
        };
        script.enter_current();
        Ok(script)
    }

    fn enter_current(&mut self) {
        match self.steps.get(self.index) {
            Some(step) => {
                self.awaiting_commit = step.gate.is_some();
                self.highlighted = step.highlight().map(|h| h.controls).unwrap_or_default();
            }
            None => {
                self.awaiting_commit = false;
                self.highlighted.clear();
            }
        }
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    pub fn awaiting_commit(&self) -> bool {
        self.awaiting_commit
    }

    pub fn highlighted(&self) -> ControlSet {
        self.highlighted
    }

    pub fn is_finished(&self) -> bool {
        self.index == self.steps.len()
    }

    pub fn current(&self) -> Option<StepView<'_>> {
        self.steps.get(self.index).map(|step| StepView {
            index: self.index,
            text: &step.text,
            highlight: step.highlight(),
            gate: step.gate.as_ref(),
            awaiting_commit: self.awaiting_commit,
        })
    }

    /// Move to the next step unless the current one still waits for a strum
    pub fn advance(&mut self) -> Result<Advance, TrainerError> {
        if self.is_finished() {
            return Err(TrainerError::TutorialComplete);
        }
        if self.awaiting_commit {
            debug!(step = self.index, "advance blocked");
            return Err(TrainerError::Blocked);
        }

        self.index += 1;
        self.enter_current();
        debug!(step = self.index, "tutorial advanced");

        if self.is_finished() {
            Ok(Advance::Finished)
        } else {
            Ok(Advance::Step(self.index))
        }
    }

    /// Strum while the current step may be waiting for one
    pub fn on_commit_attempt(&mut self, active: &ControlSet) -> GateOutcome {
        if !self.awaiting_commit {
            return GateOutcome::NotWaiting;
        }
        let Some(target) = self.steps.get(self.index).and_then(|s| s.gate.as_ref()) else {
            return GateOutcome::NotWaiting;
        };

        let passed = match self.policy {
            GatePolicy::Strict => target.matches(active),
            GatePolicy::Lenient => true,
        };
        if passed {
            self.awaiting_commit = false;
            GateOutcome::Passed {
                target: target.name.clone(),
            }
        } else {
            GateOutcome::Rejected {
                target: target.name.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use pretty_assertions::assert_eq;

    fn set(ids: &[u32]) -> ControlSet {
        ControlSet::from_ids(ids.iter().copied()).unwrap()
    }

    fn script(policy: GatePolicy) -> TutorialScript {
        let config = TrainerConfig::default();
        let catalog = config.catalog().unwrap();
        TutorialScript::new(&config.tutorial, &catalog, Mode::Easy, policy).unwrap()
    }

    fn advance_to(script: &mut TutorialScript, index: usize) {
        while script.step_index() < index {
            script.advance().unwrap();
        }
    }

    #[test]
    fn test_blocked_until_commit() {
        let mut script = script(GatePolicy::Strict);
        advance_to(&mut script, 4);
        assert!(script.awaiting_commit());

        assert_eq!(script.advance(), Err(TrainerError::Blocked));
        assert_eq!(script.step_index(), 4);

        let outcome = script.on_commit_attempt(&set(&[19, 31, 26, 36, 37]));
        assert_eq!(
            outcome,
            GateOutcome::Passed {
                target: "D Major".to_string()
            }
        );
        assert_eq!(script.advance(), Ok(Advance::Step(5)));
        assert_eq!(script.step_index(), 5);
    }

    #[test]
    fn test_strict_rejects_wrong_strum() {
        let mut script = script(GatePolicy::Strict);
        advance_to(&mut script, 4);

        let outcome = script.on_commit_attempt(&set(&[19, 31]));
        assert_eq!(
            outcome,
            GateOutcome::Rejected {
                target: "D Major".to_string()
            }
        );
        assert!(script.awaiting_commit());
        assert_eq!(script.advance(), Err(TrainerError::Blocked));
    }

    #[test]
    fn test_lenient_accepts_any_strum() {
        let mut script = script(GatePolicy::Lenient);
        advance_to(&mut script, 4);

        let outcome = script.on_commit_attempt(&ControlSet::new());
        assert!(matches!(outcome, GateOutcome::Passed { .. }));
        assert_eq!(script.advance(), Ok(Advance::Step(5)));
    }

    #[test]
    fn test_strum_without_gate_is_ignored() {
        let mut script = script(GatePolicy::Strict);
        assert_eq!(
            script.on_commit_attempt(&set(&[1])),
            GateOutcome::NotWaiting
        );
        assert_eq!(script.step_index(), 0);
    }

    #[test]
    fn test_highlights_follow_steps() {
        let mut script = script(GatePolicy::Strict);
        assert!(script.highlighted().is_empty());

        advance_to(&mut script, 2);
        assert_eq!(script.highlighted(), ControlSet::span(36..=41).unwrap());
        assert_eq!(
            script.current().unwrap().highlight.unwrap().style,
            HighlightStyle::Mute
        );

        advance_to(&mut script, 3);
        assert_eq!(script.highlighted(), set(&[5, 10, 15, 20]));

        advance_to(&mut script, 4);
        // Gated steps light up their chord
        assert_eq!(script.highlighted(), set(&[19, 31, 26, 36, 37]));
    }

    #[test]
    fn test_runs_to_terminal() {
        let mut script = script(GatePolicy::Lenient);
        let total = script.len();
        let mut finished = 0;

        while !script.is_finished() {
            if script.awaiting_commit() {
                script.on_commit_attempt(&ControlSet::new());
            }
            if script.advance().unwrap() == Advance::Finished {
                finished += 1;
            }
        }

        assert_eq!(finished, 1);
        assert_eq!(script.step_index(), total);
        assert!(script.current().is_none());
        assert!(script.highlighted().is_empty());
        assert_eq!(script.advance(), Err(TrainerError::TutorialComplete));
    }

    #[test]
    fn test_unknown_gate_fails_construction() {
        let catalog = TrainerConfig::default().catalog().unwrap();
        let steps = vec![TutorialStep::gated("Play it", "F Sharp Major")];
        assert!(matches!(
            TutorialScript::new(&steps, &catalog, Mode::Easy, GatePolicy::Strict),
            Err(TrainerError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn test_first_step_can_be_gated() {
        let catalog = TrainerConfig::default().catalog().unwrap();
        let steps = vec![TutorialStep::gated("Play E minor", "E Minor")];
        let script =
            TutorialScript::new(&steps, &catalog, Mode::Easy, GatePolicy::Strict).unwrap();
        assert!(script.awaiting_commit());
        assert_eq!(script.highlighted(), set(&[13, 7]));
    }
}
