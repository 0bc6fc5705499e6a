//! Selected mode and best-time records
//!
//! Every write is followed by a flush. With no store attached each call
//! returns `MissingCollaboratorReference` and callers carry on without the
//! side effect.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::KeyValueStore;
use crate::error::TrainerError;
use crate::fretboard::Mode;

/// Key holding the mode picked in the menu
pub const MODE_KEY: &str = "GameMode";

/// Best-time key shared by every mode
pub const SHARED_BEST_KEY: &str = "BestTime";

/// Where best times are stored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestTimeKeying {
    /// `BestTime:<mode>`, one record per mode
    #[default]
    PerMode,
    /// One `BestTime` record that every mode overwrites
    Shared,
}

impl BestTimeKeying {
    pub fn key(self, mode: Mode) -> String {
        match self {
            BestTimeKeying::PerMode => format!("{}:{}", SHARED_BEST_KEY, mode),
            BestTimeKeying::Shared => SHARED_BEST_KEY.to_string(),
        }
    }
}

/// Records facade over an optional store
pub struct Records {
    store: Option<Box<dyn KeyValueStore>>,
    keying: BestTimeKeying,
}

impl Records {
    pub fn new(store: Box<dyn KeyValueStore>, keying: BestTimeKeying) -> Self {
        Records {
            store: Some(store),
            keying,
        }
    }

    /// Records with no store attached
    pub fn detached(keying: BestTimeKeying) -> Self {
        Records {
            store: None,
            keying,
        }
    }

    pub fn keying(&self) -> BestTimeKeying {
        self.keying
    }

    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        self.store.as_deref()
    }

    fn reader(&self) -> Result<&dyn KeyValueStore, TrainerError> {
        self.store
            .as_deref()
            .ok_or(TrainerError::MissingCollaboratorReference("store"))
    }

    fn writer(&mut self) -> Result<&mut (dyn KeyValueStore + 'static), TrainerError> {
        self.store
            .as_deref_mut()
            .ok_or(TrainerError::MissingCollaboratorReference("store"))
    }

    /// Mode remembered from the menu; Easy when unset or unreadable
    pub fn selected_mode(&self) -> Result<Mode, TrainerError> {
        let raw = self
            .reader()?
            .get_string(MODE_KEY, Mode::default().as_str());
        Ok(raw.parse().unwrap_or_else(|_| {
            warn!(stored = %raw, "unknown stored mode, falling back to Easy");
            Mode::default()
        }))
    }

    pub fn select_mode(&mut self, mode: Mode) -> Result<(), TrainerError> {
        let store = self.writer()?;
        store.set_string(MODE_KEY, mode.as_str());
        store.flush()
    }

    /// Best time for `mode`; non-finite stored values read as unset
    pub fn best_time(&self, mode: Mode) -> Result<Option<f32>, TrainerError> {
        let key = self.keying.key(mode);
        Ok(self.reader()?.get_float(&key).filter(|v| v.is_finite()))
    }

    pub fn save_best_time(&mut self, mode: Mode, value: f32) -> Result<(), TrainerError> {
        let key = self.keying.key(mode);
        let store = self.writer()?;
        store.set_float(&key, value);
        store.flush()?;
        info!(%mode, key = %key, best = value, "best time saved");
        Ok(())
    }

    pub fn reset_best_time(&mut self, mode: Mode) -> Result<(), TrainerError> {
        let key = self.keying.key(mode);
        let store = self.writer()?;
        store.delete_key(&key);
        store.flush()?;
        info!(%mode, key = %key, "best time reset");
        Ok(())
    }

    /// Final flush at shutdown
    pub fn close(mut self) -> Result<(), TrainerError> {
        match self.store.as_deref_mut() {
            Some(store) => store.flush(),
            None => Ok(()),
        }
    }
}
