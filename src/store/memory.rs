use rustc_hash::FxHashMap;

use super::{KeyValueStore, StoreValue};
use crate::error::TrainerError;

/// Store that lives only as long as the process
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, StoreValue>,
    flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: FxHashMap<String, StoreValue>) -> Self {
        MemoryStore { values, flushes: 0 }
    }

    pub fn values(&self) -> &FxHashMap<String, StoreValue> {
        &self.values
    }

    /// How many times `flush` was called
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(StoreValue::Text(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), StoreValue::Text(value.to_string()));
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        match self.values.get(key) {
            Some(StoreValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), StoreValue::Float(value));
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<(), TrainerError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_reads() {
        let mut store = MemoryStore::new();
        store.set_string("GameMode", "Hard");
        store.set_float("BestTime", 12.5);

        assert_eq!(store.get_string("GameMode", "Easy"), "Hard");
        assert_eq!(store.get_string("Missing", "Easy"), "Easy");
        assert_eq!(store.get_float("BestTime"), Some(12.5));
        // Wrong type reads as absent
        assert_eq!(store.get_float("GameMode"), None);
        assert_eq!(store.get_float_or("Missing", f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        store.set_float("BestTime", 1.0);
        assert!(store.has_key("BestTime"));
        store.delete_key("BestTime");
        assert!(!store.has_key("BestTime"));
    }
}
