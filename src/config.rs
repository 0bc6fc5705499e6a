//! Trainer configuration: the mode-keyed table plus tuning knobs
//!
//! `TrainerConfig::default()` is the reference 42-control layout. A JSON
//! file with the same shape can replace it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::fretboard::{ControlSet, Mode, PatternCatalog, Target};
use crate::store::BestTimeKeying;
use crate::tutorial::{GatePolicy, StepHighlight, TutorialStep};

/// Catalog partition and sequence for one mode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeTable {
    pub mode: Mode,
    pub targets: Vec<Target>,
    pub sequence: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub modes: Vec<ModeTable>,
    pub tutorial: Vec<TutorialStep>,
    /// Catalog partition the tutorial gates resolve against
    pub tutorial_mode: Mode,
    pub tutorial_policy: GatePolicy,
    /// Seconds a feedback message stays up
    pub feedback_hold_secs: f32,
    /// Seconds before the teacher goes back to neutral
    pub mood_hold_secs: f32,
    pub best_time_keying: BestTimeKeying,
    /// Practice the sequence in random order
    pub shuffle: bool,
}

impl TrainerConfig {
    /// Load from a JSON file; missing fields take reference values
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: TrainerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every table eagerly: ids, duplicate names, sequences, tutorial
    pub fn validate(&self) -> Result<(), TrainerError> {
        let catalog = self.catalog()?;
        for table in &self.modes {
            if table.sequence.is_empty() {
                return Err(TrainerError::EmptySequence(table.mode));
            }
            catalog.resolve_all(table.mode, &table.sequence)?;
        }
        for step in &self.tutorial {
            if let Some(gate) = &step.gate {
                catalog.resolve(self.tutorial_mode, gate)?;
            }
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<PatternCatalog, TrainerError> {
        PatternCatalog::new(
            self.modes
                .iter()
                .map(|table| (table.mode, table.targets.clone())),
        )
    }

    pub fn table(&self, mode: Mode) -> Result<&ModeTable, TrainerError> {
        self.modes
            .iter()
            .find(|table| table.mode == mode)
            .ok_or_else(|| TrainerError::UnknownMode(mode.to_string()))
    }

    pub fn sequence(&self, mode: Mode) -> Result<&[String], TrainerError> {
        Ok(&self.table(mode)?.sequence)
    }
}

fn target(name: &str, ids: &[u32]) -> Target {
    // Reference ids are all below CONTROL_COUNT
    let required = ControlSet::from_ids(ids.iter().copied()).unwrap_or_default();
    Target::new(name, required)
}

fn names(targets: &[Target]) -> Vec<String> {
    targets.iter().map(|t| t.name.clone()).collect()
}

fn reference_modes() -> Vec<ModeTable> {
    let chords = vec![
        target("C Major", &[24, 8, 13, 36]),
        target("D Major", &[19, 31, 26, 36, 37]),
        target("D Minor", &[19, 26, 30, 37, 36]),
        target("G Major", &[32, 7, 2]),
        target("A Minor", &[24, 19, 13, 36]),
        target("E Minor", &[13, 7]),
    ];
    let notes = vec![
        target("Note C", &[24]),
        target("Note G", &[32]),
        target("Note F", &[30]),
        target("Note D", &[26]),
        target("Note A", &[19]),
    ];

    vec![
        ModeTable {
            mode: Mode::Easy,
            sequence: names(&chords),
            targets: chords,
        },
        ModeTable {
            mode: Mode::Hard,
            sequence: names(&notes),
            targets: notes,
        },
    ]
}

fn reference_tutorial() -> Vec<TutorialStep> {
    let mutes = ControlSet::span(36..=41).unwrap_or_default();
    let example_frets = ControlSet::from_ids([5, 10, 15, 20]).unwrap_or_default();
    let chord_step = |name: &str| {
        TutorialStep::gated(
            format!(
                "Here's the {} chord.\nTry pressing the Strum button to play it!",
                name
            ),
            name,
        )
    };

    vec![
        TutorialStep::text("Welcome to Learn2Guitar!\nLet's learn how the guitar works."),
        TutorialStep::text("These buttons represent the strings and frets on a guitar."),
        TutorialStep::text(
            "The top layer of buttons mutes the strings.\nThey appear green when muted.",
        )
        .with_highlight(StepHighlight::mutes(mutes)),
        TutorialStep::text(
            "The other buttons are used to fret notes and chords.\nLet's try pressing some chords!",
        )
        .with_highlight(StepHighlight::guide(example_frets)),
        chord_step("D Major"),
        chord_step("C Major"),
        chord_step("G Major"),
        TutorialStep::text("You can find the rest in the Cheat Sheet page!"),
        TutorialStep::text("That's it! You're ready to play!"),
    ]
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            modes: reference_modes(),
            tutorial: reference_tutorial(),
            tutorial_mode: Mode::Easy,
            tutorial_policy: GatePolicy::default(),
            feedback_hold_secs: 2.0,
            mood_hold_secs: 2.0,
            best_time_keying: BestTimeKeying::default(),
            shuffle: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_layout_validates() {
        let config = TrainerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sequence(Mode::Easy).unwrap().len(), 6);
        assert_eq!(config.sequence(Mode::Hard).unwrap()[0], "Note C");
        assert_eq!(config.tutorial.len(), 9);
    }

    #[test]
    fn test_unknown_sequence_name_fails_validation() {
        let mut config = TrainerConfig::default();
        config.modes[1].sequence.push("Note B".to_string());
        assert_eq!(
            config.validate(),
            Err(TrainerError::UnknownTarget {
                mode: Mode::Hard,
                name: "Note B".to_string()
            })
        );
    }

    #[test]
    fn test_empty_sequence_fails_validation() {
        let mut config = TrainerConfig::default();
        config.modes[0].sequence.clear();
        assert_eq!(
            config.validate(),
            Err(TrainerError::EmptySequence(Mode::Easy))
        );
    }

    #[test]
    fn test_unknown_tutorial_gate_fails_validation() {
        let mut config = TrainerConfig::default();
        config.tutorial_mode = Mode::Hard;
        assert!(matches!(
            config.validate(),
            Err(TrainerError::UnknownTarget { mode: Mode::Hard, .. })
        ));
    }

    #[test]
    fn test_partial_json_keeps_reference_values() {
        let config: TrainerConfig =
            serde_json::from_str(r#"{ "shuffle": true, "tutorial_policy": "Lenient" }"#).unwrap();
        assert!(config.shuffle);
        assert_eq!(config.tutorial_policy, GatePolicy::Lenient);
        assert_eq!(config.modes, TrainerConfig::default().modes);
    }

    #[test]
    fn test_out_of_range_control_in_json_is_rejected() {
        let json = r#"{ "modes": [ { "mode": "Hard",
            "targets": [ { "name": "Note X", "controls": [99] } ],
            "sequence": ["Note X"] } ] }"#;
        assert!(serde_json::from_str::<TrainerConfig>(json).is_err());
    }
}
