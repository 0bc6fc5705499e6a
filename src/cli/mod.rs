//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Event-driven screen model and terminal rendering

pub mod display;
pub mod input;

pub use display::{Cursor, Display, Screen};
pub use input::{Command, InputHandler};
