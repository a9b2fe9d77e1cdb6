//! Best-score tracking
//!
//! Persisted as a plain integer string under a fixed key.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORE_KEY;
use crate::platform::storage::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Read the stored best score; absent, unreadable or malformed values count as 0
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match Self::try_load(store) {
            Ok(best) => {
                log::info!("Loaded high score: {}", best);
                Self { best }
            }
            Err(e) => {
                log::warn!("High score unavailable, starting from 0: {}", e);
                Self::default()
            }
        }
    }

    fn try_load<S: KeyValueStore + ?Sized>(store: &S) -> Result<u64, StoreError> {
        let Some(raw) = store.get(HIGH_SCORE_KEY)? else {
            return Ok(0);
        };
        raw.trim().parse::<u64>().map_err(|_| StoreError::Malformed {
            key: HIGH_SCORE_KEY.to_string(),
            value: raw,
        })
    }

    /// Record a finished session's score.
    ///
    /// Returns true if it beat the previous best. The in-memory best is
    /// updated even if writing it back to the store fails.
    pub fn record<S: KeyValueStore + ?Sized>(&mut self, score: u64, store: &mut S) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score saved: {}", score),
            Err(e) => log::warn!("New high score {} not persisted: {}", score, e),
        }
        true
    }
}
