//! Toggleable fretboard controls
//!
//! The reference layout has 42 controls:
//! - 0..36: fret positions, six rows of six strings
//! - 36..42: string mutes (low E, A, D, G, high E, B)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Number of controls on the board.
pub const CONTROL_COUNT: u32 = 42;

/// First mute control id.
pub const FIRST_MUTE: u32 = 36;

/// One toggleable fret, string or mute control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(u8);

impl ControlId {
    /// Range-checked constructor
    pub fn new(raw: u32) -> Result<Self, TrainerError> {
        if raw < CONTROL_COUNT {
            Ok(ControlId(raw as u8))
        } else {
            Err(TrainerError::InvalidControlId(raw))
        }
    }

    pub fn index(self) -> u32 {
        self.0 as u32
    }

    pub fn is_mute(self) -> bool {
        self.index() >= FIRST_MUTE
    }

    fn bit(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of controls currently "on".
///
/// Stored as a bitmask, so equality is exact set equality and order never
/// matters.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ControlSet {
    bits: u64,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw ids, rejecting anything out of range
    pub fn from_ids<I>(ids: I) -> Result<Self, TrainerError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut set = ControlSet::new();
        for raw in ids {
            set.insert(ControlId::new(raw)?);
        }
        Ok(set)
    }

    /// Every id in `range`, which must lie inside the board
    pub fn span(range: std::ops::RangeInclusive<u32>) -> Result<Self, TrainerError> {
        Self::from_ids(range)
    }

    /// Flip membership of `id`; returns whether it is now on
    pub fn toggle(&mut self, id: ControlId) -> bool {
        self.bits ^= id.bit();
        self.contains(id)
    }

    pub fn insert(&mut self, id: ControlId) {
        self.bits |= id.bit();
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.bits & id.bit() != 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> ControlSet {
        *self
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Controls in `self` that `other` lacks
    pub fn difference(&self, other: &ControlSet) -> ControlSet {
        ControlSet {
            bits: self.bits & !other.bits,
        }
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = ControlId> + '_ {
        (0..CONTROL_COUNT as u8)
            .map(ControlId)
            .filter(move |id| self.contains(*id))
    }
}

impl fmt::Debug for ControlSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(ControlId::index)).finish()
    }
}

impl fmt::Display for ControlSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let ids: Vec<String> = self.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", ids.join(", "))
    }
}

impl TryFrom<Vec<u32>> for ControlSet {
    type Error = TrainerError;

    fn try_from(ids: Vec<u32>) -> Result<Self, Self::Error> {
        ControlSet::from_ids(ids)
    }
}

impl From<ControlSet> for Vec<u32> {
    fn from(set: ControlSet) -> Self {
        set.iter().map(ControlId::index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(raw: u32) -> ControlId {
        ControlId::new(raw).unwrap()
    }

    #[test]
    fn test_toggle_twice_restores_prior_state() {
        let mut set = ControlSet::from_ids([24, 8]).unwrap();
        let before = set.snapshot();

        assert!(set.toggle(id(13)));
        assert!(!set.toggle(id(13)));
        assert_eq!(set, before);

        assert!(!set.toggle(id(24)));
        assert!(set.toggle(id(24)));
        assert_eq!(set, before);
    }

    #[test]
    fn test_out_of_range_id_is_rejected() {
        assert_eq!(ControlId::new(42), Err(TrainerError::InvalidControlId(42)));
        assert!(ControlId::new(41).is_ok());
        assert!(ControlSet::from_ids([3, 99]).is_err());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = ControlSet::from_ids([24, 8, 13, 36]).unwrap();
        let b = ControlSet::from_ids([36, 13, 8, 24]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_iter_is_ascending() {
        let set = ControlSet::from_ids([41, 0, 19]).unwrap();
        let ids: Vec<u32> = set.iter().map(ControlId::index).collect();
        assert_eq!(ids, vec![0, 19, 41]);
        assert_eq!(set.to_string(), "0, 19, 41");
    }

    #[test]
    fn test_difference() {
        let required = ControlSet::from_ids([24, 8, 13, 36]).unwrap();
        let attempted = ControlSet::from_ids([24, 8, 5]).unwrap();
        assert_eq!(
            required.difference(&attempted),
            ControlSet::from_ids([13, 36]).unwrap()
        );
        assert_eq!(
            attempted.difference(&required),
            ControlSet::from_ids([5]).unwrap()
        );
    }

    #[test]
    fn test_mutes() {
        assert!(id(36).is_mute());
        assert!(!id(35).is_mute());
        assert_eq!(ControlSet::span(36..=41).unwrap().len(), 6);
    }

    #[test]
    fn test_serde_as_id_list() {
        let set = ControlSet::from_ids([7, 2, 32]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[2,7,32]");
        assert!(serde_json::from_str::<ControlSet>("[2,50]").is_err());
    }
}
