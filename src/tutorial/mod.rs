//! Scripted onboarding
//!
//! # Components
//! - `script.rs`: TutorialScript step state machine and gate policy
//! - `session.rs`: TutorialSession driving the script from input events

pub mod script;
pub mod session;

pub use script::{
    Advance, GateOutcome, GatePolicy, StepHighlight, StepView, TutorialScript, TutorialStep,
};
pub use session::TutorialSession;
