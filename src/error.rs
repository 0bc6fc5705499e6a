//! Error taxonomy shared by every component of the trainer core.
use std::fmt;

use crate::fretboard::Mode;

/// Errors returned by the trainer core.
///
/// A pattern mismatch is not an error: it is reported as
/// [`Outcome::Incorrect`](crate::session::Outcome::Incorrect).
#[derive(Debug, Clone, PartialEq)]
pub enum TrainerError {
    /// A sequence or tutorial step names a target that the catalog
    /// partition for `mode` does not contain.
    UnknownTarget { mode: Mode, name: String },

    /// A control id outside `0..CONTROL_COUNT`.
    InvalidControlId(u32),

    /// A commit was attempted after the sequence was exhausted.
    SessionComplete,

    /// Tutorial advance attempted while the current step waits for a commit.
    Blocked,

    /// Tutorial advance attempted after the last step.
    TutorialComplete,

    /// A collaborator (store, presentation) is not attached.
    ///
    /// The contained string names the collaborator.
    MissingCollaboratorReference(&'static str),

    /// A mode's sequence is empty.
    EmptySequence(Mode),

    /// Two catalog entries of the same mode share a name.
    DuplicateTarget { mode: Mode, name: String },

    /// The configuration carries no table for `mode`.
    UnknownMode(String),

    /// The store could not be read or written.
    Persistence(String),
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerError::UnknownTarget { mode, name } => {
                write!(f, "unknown target '{}' for mode {}", name, mode)
            }
            TrainerError::InvalidControlId(id) => write!(f, "invalid control id: {}", id),
            TrainerError::SessionComplete => write!(f, "session already complete"),
            TrainerError::Blocked => write!(f, "tutorial step is waiting for a strum"),
            TrainerError::TutorialComplete => write!(f, "tutorial already complete"),
            TrainerError::MissingCollaboratorReference(which) => {
                write!(f, "missing collaborator: {}", which)
            }
            TrainerError::EmptySequence(mode) => write!(f, "empty sequence for mode {}", mode),
            TrainerError::DuplicateTarget { mode, name } => {
                write!(f, "duplicate target '{}' for mode {}", name, mode)
            }
            TrainerError::UnknownMode(mode) => write!(f, "unknown mode: {}", mode),
            TrainerError::Persistence(msg) => write!(f, "persistence error: {}", msg),
        }
    }
}

impl std::error::Error for TrainerError {}

impl From<std::io::Error> for TrainerError {
    fn from(e: std::io::Error) -> Self {
        TrainerError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for TrainerError {
    fn from(e: serde_json::Error) -> Self {
        TrainerError::Persistence(e.to_string())
    }
}
