//! Persistent key-value store: trait, implementations and the records facade
//!
//! # Components
//! - `memory.rs`: in-process store
//! - `json.rs`: store backed by a JSON file
//! - `records.rs`: selected mode and best-time records on top of any store

pub mod json;
pub mod memory;
pub mod records;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{BestTimeKeying, Records, MODE_KEY, SHARED_BEST_KEY};

/// One stored value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Float(f32),
    Text(String),
}

/// Key-value store consumed by the trainer.
///
/// Writes are buffered until [`flush`](KeyValueStore::flush).
pub trait KeyValueStore {
    fn get_string(&self, key: &str, default: &str) -> String;

    fn set_string(&mut self, key: &str, value: &str);

    /// `None` if the key is absent or not a number
    fn get_float(&self, key: &str) -> Option<f32>;

    fn get_float_or(&self, key: &str, default: f32) -> f32 {
        self.get_float(key).unwrap_or(default)
    }

    fn set_float(&mut self, key: &str, value: f32);

    fn has_key(&self, key: &str) -> bool;

    fn delete_key(&mut self, key: &str);

    fn flush(&mut self) -> Result<(), TrainerError>;
}
