//! Session Management: sequence progression, timing and strum statistics
//!
//! # Components
//! - `state.rs`: SessionEngine stepping through a mode's sequence
//! - `score.rs`: Scorekeeper timer and best-time comparison
//! - `accuracy.rs`: Strum hit rate and streaks
//! - `mistakes.rs`: Missing/extra controls per target

pub mod accuracy;
pub mod mistakes;
pub mod score;
pub mod state;

pub use accuracy::AttemptTracker;
pub use mistakes::{ControlDiff, MistakeLog};
pub use score::Scorekeeper;
pub use state::{Outcome, SessionEngine, SessionEvent};
