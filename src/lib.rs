//! Fret Trainer - fingering drills for a fretted instrument simulator
//!
//! Toggled fret controls are matched against named chord/note patterns,
//! a learner is stepped through a mode's sequence against the clock, and a
//! scripted tutorial gates progress on a correct strum.
//!
//! # Components
//! - `fretboard`: controls, modes and the pattern catalog
//! - `session`: sequence progression, timer and strum statistics
//! - `tutorial`: scripted onboarding
//! - `trainer`: practice session coordinator
//! - `events`: outbound event channel to the presentation/audio adapter
//! - `feedback`: cancellable auto-clear for feedback and mood
//! - `store`: key-value store and best-time records
//! - `config`: mode-keyed tables and tuning knobs

pub mod config;
pub mod error;
pub mod events;
pub mod feedback;
pub mod fretboard;
pub mod session;
pub mod store;
pub mod trainer;
pub mod tutorial;

pub use config::TrainerConfig;
pub use error::TrainerError;
pub use events::{Event, EventSink};
pub use fretboard::{ControlId, ControlSet, Mode, PatternCatalog, Target};
pub use trainer::{SessionSummary, Trainer};
pub use tutorial::TutorialSession;
