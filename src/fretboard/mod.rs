//! Fretboard model: controls, modes and the pattern catalog
//!
//! # Components
//! - `controls.rs`: ControlId and the toggled ControlSet
//! - `mode.rs`: Easy (chords) and Hard (notes)
//! - `catalog.rs`: per-mode name → exact control set tables

pub mod catalog;
pub mod controls;
pub mod mode;

pub use catalog::{PatternCatalog, Target};
pub use controls::{ControlId, ControlSet, CONTROL_COUNT, FIRST_MUTE};
pub use mode::Mode;
