use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Game mode; each mode owns one catalog partition and one sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Full chords
    #[default]
    Easy,
    /// Single notes read from a staff
    Hard,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Easy, Mode::Hard];

    /// Name persisted under the `GameMode` key
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Easy => "Easy",
            Mode::Hard => "Hard",
        }
    }

    /// What a target is called in this mode
    pub fn target_noun(self) -> &'static str {
        match self {
            Mode::Easy => "chord",
            Mode::Hard => "note",
        }
    }

    /// Prompt shown above the fretboard
    pub fn prompt(self, target: &str) -> String {
        match self {
            Mode::Easy => format!("Play chord: {}", target),
            // Hard mode shows the note on a staff instead of naming it
            Mode::Hard => "Play this note:".to_string(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Mode::Easy),
            "hard" => Ok(Mode::Hard),
            _ => Err(TrainerError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Easy", Mode::Easy; "persisted form")]
    #[test_case("hard", Mode::Hard; "lowercase")]
    #[test_case(" HARD ", Mode::Hard; "padded uppercase")]
    fn test_parse(input: &str, expected: Mode) {
        assert_eq!(input.parse::<Mode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "medium".parse::<Mode>(),
            Err(TrainerError::UnknownMode("medium".to_string()))
        );
    }

    #[test]
    fn test_round_trip_through_persisted_name() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_prompt() {
        assert_eq!(Mode::Easy.prompt("C Major"), "Play chord: C Major");
        assert_eq!(Mode::Hard.prompt("Note C"), "Play this note:");
    }
}
