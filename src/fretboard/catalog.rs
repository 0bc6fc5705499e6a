//! Pattern catalog: static name → required control set tables
//!
//! One partition per mode. Partitions are built once, validated eagerly and
//! never mutated afterwards.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::controls::ControlSet;
use super::mode::Mode;
use crate::error::TrainerError;

/// A named chord or note with the exact controls it requires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(rename = "controls")]
    pub required: ControlSet,
}

impl Target {
    pub fn new(name: impl Into<String>, required: ControlSet) -> Self {
        Target {
            name: name.into(),
            required,
        }
    }

    /// Exact equality: any extra or missing control is a miss
    pub fn matches(&self, active: &ControlSet) -> bool {
        *active == self.required
    }
}

#[derive(Clone, Debug, Default)]
struct Partition {
    targets: Vec<Target>,
    by_name: FxHashMap<String, usize>,
}

/// Immutable catalog of targets, partitioned by mode.
#[derive(Clone, Debug, Default)]
pub struct PatternCatalog {
    partitions: FxHashMap<Mode, Partition>,
}

impl PatternCatalog {
    /// Build from per-mode tables, rejecting duplicate names within a mode
    pub fn new<I>(tables: I) -> Result<Self, TrainerError>
    where
        I: IntoIterator<Item = (Mode, Vec<Target>)>,
    {
        let mut partitions: FxHashMap<Mode, Partition> = FxHashMap::default();

        for (mode, targets) in tables {
            let partition = partitions.entry(mode).or_default();
            for target in targets {
                if partition.by_name.contains_key(&target.name) {
                    return Err(TrainerError::DuplicateTarget {
                        mode,
                        name: target.name,
                    });
                }
                partition
                    .by_name
                    .insert(target.name.clone(), partition.targets.len());
                partition.targets.push(target);
            }
        }

        Ok(PatternCatalog { partitions })
    }

    /// Look up `name` in the partition for `mode`
    pub fn resolve(&self, mode: Mode, name: &str) -> Result<&Target, TrainerError> {
        self.partitions
            .get(&mode)
            .and_then(|p| p.by_name.get(name).map(|&idx| &p.targets[idx]))
            .ok_or_else(|| TrainerError::UnknownTarget {
                mode,
                name: name.to_string(),
            })
    }

    /// Resolve every name, failing on the first unknown one
    pub fn resolve_all<S: AsRef<str>>(
        &self,
        mode: Mode,
        names: &[S],
    ) -> Result<Vec<Target>, TrainerError> {
        names
            .iter()
            .map(|name| self.resolve(mode, name.as_ref()).cloned())
            .collect()
    }

    /// Whether `active` is exactly the required set of `name`
    pub fn matches(
        &self,
        mode: Mode,
        active: &ControlSet,
        name: &str,
    ) -> Result<bool, TrainerError> {
        Ok(self.resolve(mode, name)?.matches(active))
    }

    /// Targets of one mode in declaration order
    pub fn targets(&self, mode: Mode) -> &[Target] {
        self.partitions
            .get(&mode)
            .map(|p| p.targets.as_slice())
            .unwrap_or(&[])
    }

    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL
            .into_iter()
            .filter(move |mode| self.partitions.contains_key(mode))
    }
}
