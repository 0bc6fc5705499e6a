//! Mistake log: which controls a learner gets wrong per target
//!
//! Detects:
//! - Targets missed repeatedly (3+ times)
//! - Controls most often left out of a target
//! - Controls most often pressed by mistake

use rustc_hash::FxHashMap;

use crate::fretboard::{ControlId, ControlSet, Target, CONTROL_COUNT};

/// Miss threshold for a target to count as a trouble spot
const TROUBLE_THRESHOLD: u32 = 3;

/// Missing and extra controls of one wrong strum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlDiff {
    /// Required but not pressed
    pub missing: ControlSet,
    /// Pressed but not required
    pub extra: ControlSet,
}

impl ControlDiff {
    pub fn between(required: &ControlSet, attempted: &ControlSet) -> Self {
        ControlDiff {
            missing: required.difference(attempted),
            extra: attempted.difference(required),
        }
    }
}

#[derive(Clone, Debug)]
struct TargetMistakes {
    misses: u32,
    missing: [u32; CONTROL_COUNT as usize],
    extra: [u32; CONTROL_COUNT as usize],
}

impl TargetMistakes {
    fn new() -> Self {
        TargetMistakes {
            misses: 0,
            missing: [0; CONTROL_COUNT as usize],
            extra: [0; CONTROL_COUNT as usize],
        }
    }
}

/// Records wrong strums per target
#[derive(Clone, Debug, Default)]
pub struct MistakeLog {
    per_target: FxHashMap<String, TargetMistakes>,
    total: u32,
}

impl MistakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wrong strum against `target`
    pub fn record(&mut self, target: &Target, attempted: &ControlSet) -> ControlDiff {
        let diff = ControlDiff::between(&target.required, attempted);
        let entry = self
            .per_target
            .entry(target.name.clone())
            .or_insert_with(TargetMistakes::new);

        entry.misses += 1;
        for id in diff.missing.iter() {
            entry.missing[id.index() as usize] += 1;
        }
        for id in diff.extra.iter() {
            entry.extra[id.index() as usize] += 1;
        }
        self.total += 1;
        diff
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn misses(&self, target: &str) -> u32 {
        self.per_target.get(target).map(|m| m.misses).unwrap_or(0)
    }

    /// Targets missed at least three times, worst first
    pub fn trouble_targets(&self) -> Vec<(String, u32)> {
        let mut trouble: Vec<(String, u32)> = self
            .per_target
            .iter()
            .filter(|(_, m)| m.misses >= TROUBLE_THRESHOLD)
            .map(|(name, m)| (name.clone(), m.misses))
            .collect();
        trouble.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        trouble
    }

    /// Control most often left out of `target`
    pub fn most_missing(&self, target: &str) -> Option<(ControlId, u32)> {
        self.per_target
            .get(target)
            .and_then(|m| Self::worst(&m.missing))
    }

    /// Control most often pressed by mistake for `target`
    pub fn most_extra(&self, target: &str) -> Option<(ControlId, u32)> {
        self.per_target
            .get(target)
            .and_then(|m| Self::worst(&m.extra))
    }

    fn worst(counts: &[u32; CONTROL_COUNT as usize]) -> Option<(ControlId, u32)> {
        // Lowest id wins a tie
        let (idx, &count) = counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, &count)| count)?;
        if count == 0 {
            return None;
        }
        ControlId::new(idx as u32).ok().map(|id| (id, count))
    }

    pub fn reset(&mut self) {
        self.per_target.clear();
        self.total = 0;
    }
}
