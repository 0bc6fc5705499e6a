//! Outbound events for the presentation/audio adapter
//!
//! The core never touches UI elements. Everything the adapter needs to
//! render or play arrives as an [`Event`] on a channel.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::fretboard::{ControlId, ControlSet, Mode};

/// Feedback message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
    /// New records and other good news
    Highlight,
}

/// Teacher character expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Neutral,
    Happy,
    Sad,
}

/// How highlighted controls are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightStyle {
    /// Frets to press
    Guide,
    /// String mutes
    Mute,
}

/// Sound the audio adapter should play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCue {
    /// The chord or note sample for a target
    Target { mode: Mode, name: String },
    /// Broken string
    Error,
}

/// What the prompt area should show for the current target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    pub mode: Mode,
    pub name: String,
    pub prompt: String,
    /// Zero-based position in the sequence
    pub index: usize,
    pub total: usize,
}

/// Messages from the core → presentation/audio adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TargetChanged(TargetView),
    ControlToggled { id: ControlId, on: bool },
    ControlsCleared,
    Feedback { message: String, severity: Severity },
    FeedbackCleared,
    Mood(Mood),
    Sound(SoundCue),
    TimerTick(f32),
    /// `None` when the record was reset
    BestTimeUpdated(Option<f32>),
    HighlightSet {
        controls: ControlSet,
        style: HighlightStyle,
    },
    HighlightCleared,
    /// Whether the strum control should be highlighted
    StrumHighlighted(bool),
    SessionComplete,
    TutorialStep {
        text: String,
        highlighted: ControlSet,
        blocked: bool,
    },
    TutorialFinished,
}

/// Sending half of the event channel.
///
/// With no receiver attached (or after the receiver is dropped) events are
/// discarded and progression carries on.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<Event>>,
}

impl EventSink {
    pub fn new(tx: Sender<Event>) -> Self {
        EventSink { tx: Some(tx) }
    }

    /// Sink plus the receiver the adapter drains every frame
    pub fn channel() -> (Self, Receiver<Event>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    /// Sink with no presentation attached
    pub fn detached() -> Self {
        EventSink { tx: None }
    }

    pub fn is_attached(&self) -> bool {
        self.tx.is_some()
    }

    pub fn emit(&mut self, event: Event) {
        let Some(tx) = &self.tx else {
            trace!(?event, "no presentation attached");
            return;
        };
        if tx.send(event).is_err() {
            warn!("presentation receiver dropped, discarding further events");
            self.tx = None;
        }
    }
}
