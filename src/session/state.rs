//! Session engine: ordered run through one mode's target sequence
//!
//! Maintains:
//! - The validated sequence of targets
//! - The current index (terminal at `len`)
//! - Outbound session events (advance, completion, mismatch)

use tracing::{debug, info};

use crate::error::TrainerError;
use crate::fretboard::{ControlSet, Mode, PatternCatalog, Target};

/// Result of one strum against the current target
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The active set matched. The caller clears its ControlSet.
    Correct { target: String, complete: bool },
    /// The active set did not match. Nothing changed.
    Incorrect {
        target: String,
        attempted: ControlSet,
    },
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// Events emitted by the engine for observers
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Moved on to `next`
    TargetAdvanced { completed: String, next: Target },
    /// The last target was played; fires once per session
    SessionComplete,
    /// A strum that did not match `target`
    Mismatch {
        attempted: ControlSet,
        target: String,
    },
}

/// State machine over `current ∈ [0, sequence.len()]`
#[derive(Clone, Debug)]
pub struct SessionEngine {
    mode: Mode,
    sequence: Vec<Target>,
    current: usize,
    events: Vec<SessionEvent>,
}

impl SessionEngine {
    /// Create a session, resolving every name up front
    pub fn new<S: AsRef<str>>(
        mode: Mode,
        names: &[S],
        catalog: &PatternCatalog,
    ) -> Result<Self, TrainerError> {
        if names.is_empty() {
            return Err(TrainerError::EmptySequence(mode));
        }
        let sequence = catalog.resolve_all(mode, names)?;
        info!(%mode, targets = sequence.len(), "session created");

        Ok(SessionEngine {
            mode,
            sequence,
            current: 0,
            events: Vec::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.sequence.len()
    }

    pub fn sequence(&self) -> &[Target] {
        &self.sequence
    }

    /// Target at the current index
    pub fn current_target(&self) -> Result<&Target, TrainerError> {
        self.sequence
            .get(self.current)
            .ok_or(TrainerError::SessionComplete)
    }

    /// Evaluate a strum with `active` against the current target
    pub fn commit(&mut self, active: &ControlSet) -> Result<Outcome, TrainerError> {
        let target = self.current_target()?;
        let name = target.name.clone();

        if !target.matches(active) {
            debug!(target = %name, attempted = %active, "mismatch");
            self.events.push(SessionEvent::Mismatch {
                attempted: *active,
                target: name.clone(),
            });
            return Ok(Outcome::Incorrect {
                target: name,
                attempted: *active,
            });
        }

        self.current += 1;
        let complete = self.is_complete();
        if complete {
            info!(mode = %self.mode, "session complete");
            self.events.push(SessionEvent::SessionComplete);
        } else {
            let next = self.sequence[self.current].clone();
            debug!(completed = %name, next = %next.name, "target advanced");
            self.events.push(SessionEvent::TargetAdvanced {
                completed: name.clone(),
                next,
            });
        }

        Ok(Outcome::Correct {
            target: name,
            complete,
        })
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.events.drain(..)
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

    fn easy() -> SessionEngine {
        let config = TrainerConfig::default();
        let catalog = config.catalog().unwrap();
        SessionEngine::new(Mode::Easy, config.sequence(Mode::Easy).unwrap(), &catalog).unwrap()
    }

    #[test]
    fn test_correct_commit_advances() {
        let mut engine = easy();
        let outcome = engine.commit(&set(&[24, 8, 13, 36])).unwrap();

        assert_eq!(
            outcome,
            Outcome::Correct {
                target: "C Major".to_string(),
                complete: false
            }
        );
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.current_target().unwrap().name, "D Major");
    }

    #[test]
    fn test_incorrect_commit_changes_nothing() {
        let mut engine = easy();
        let attempted = set(&[24, 8, 13]);
        let outcome = engine.commit(&attempted).unwrap();

        assert_eq!(
            outcome,
            Outcome::Incorrect {
                target: "C Major".to_string(),
                attempted
            }
        );
        assert_eq!(engine.current_index(), 0);
        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(
            events,
            vec![SessionEvent::Mismatch {
                attempted,
                target: "C Major".to_string()
            }]
        );
    }

    #[test]
    fn test_full_run_completes_once() {
        let mut engine = easy();
        let targets = engine.sequence().to_vec();
        let mut completions = 0;

        for (i, target) in targets.iter().enumerate() {
            assert_eq!(engine.current_index(), i);
            let outcome = engine.commit(&target.required).unwrap();
            assert!(outcome.is_correct());
            completions += engine
                .drain_events()
                .filter(|e| *e == SessionEvent::SessionComplete)
                .count();
        }

        assert_eq!(engine.current_index(), targets.len());
        assert!(engine.is_complete());
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_commit_after_completion_fails() {
        let config = TrainerConfig::default();
        let catalog = config.catalog().unwrap();
        let mut engine = SessionEngine::new(Mode::Hard, &["Note C"], &catalog).unwrap();

        engine.commit(&set(&[24])).unwrap();
        assert!(engine.is_complete());
        assert_eq!(engine.commit(&set(&[24])), Err(TrainerError::SessionComplete));
        assert_eq!(engine.current_target(), Err(TrainerError::SessionComplete));
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn test_construction_validates_sequence() {
        let catalog = TrainerConfig::default().catalog().unwrap();
        let empty: [&str; 0] = [];

        assert_eq!(
            SessionEngine::new(Mode::Easy, &empty, &catalog).unwrap_err(),
            TrainerError::EmptySequence(Mode::Easy)
        );
        assert!(matches!(
            SessionEngine::new(Mode::Hard, &["Note C", "C Major"], &catalog),
            Err(TrainerError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn test_advance_event_names_next_target() {
        let mut engine = easy();
        engine.commit(&set(&[24, 8, 13, 36])).unwrap();
        match engine.drain_events().next() {
            Some(SessionEvent::TargetAdvanced { completed, next }) => {
                assert_eq!(completed, "C Major");
                assert_eq!(next.name, "D Major");
            }
            other => panic!("unexpected event: {:?}", other),
        };
    }
}
