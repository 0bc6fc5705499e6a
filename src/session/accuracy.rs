//! Strum accuracy tracking
//!
//! Features:
//! - Overall hit rate for the session
//! - Streaks of consecutive correct strums
//! - Recent-window trend

use std::collections::VecDeque;

/// Size of the recent-outcome window
const TREND_WINDOW: usize = 10;

/// Tracks strum outcomes for a session
#[derive(Clone, Debug)]
pub struct AttemptTracker {
    attempts: u32,
    correct: u32,
    streak: u32,
    best_streak: u32,
    recent: VecDeque<bool>,
}

impl AttemptTracker {
    pub fn new() -> Self {
        AttemptTracker {
            attempts: 0,
            correct: 0,
            streak: 0,
            best_streak: 0,
            recent: VecDeque::with_capacity(TREND_WINDOW),
        }
    }

    /// Record one strum outcome
    pub fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        self.recent.push_back(correct);
        if self.recent.len() > TREND_WINDOW {
            self.recent.pop_front();
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Correct / attempts, 1.0 before the first strum
    pub fn accuracy(&self) -> f32 {
        if self.attempts == 0 {
            1.0
        } else {
            self.correct as f32 / self.attempts as f32
        }
    }

    /// Accuracy over the last few strums
    pub fn recent_accuracy(&self) -> f32 {
        if self.recent.is_empty() {
            return 1.0;
        }
        let hits = self.recent.iter().filter(|&&c| c).count();
        hits as f32 / self.recent.len() as f32
    }
}

impl Default for AttemptTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_and_streaks() {
        let mut tracker = AttemptTracker::new();
        assert_eq!(tracker.accuracy(), 1.0);

        for outcome in [true, true, false, true, true, true] {
            tracker.record(outcome);
        }

        assert_eq!(tracker.attempts(), 6);
        assert_eq!(tracker.correct(), 5);
        assert_eq!(tracker.streak(), 3);
        assert_eq!(tracker.best_streak(), 3);
        assert!((tracker.accuracy() - 5.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_recent_window_forgets_old_misses() {
        let mut tracker = AttemptTracker::new();
        for _ in 0..5 {
            tracker.record(false);
        }
        for _ in 0..TREND_WINDOW {
            tracker.record(true);
        }
        assert_eq!(tracker.recent_accuracy(), 1.0);
        assert!(tracker.accuracy() < 1.0);
    }
}
