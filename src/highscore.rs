//! Best score persistence
//!
//! Stored as a plain integer string so older saves stay readable.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::storage;

/// The single best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
    /// Improved since the last successful save
    #[serde(skip)]
    dirty: bool,
}

impl HighScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "memory-bank-pacman-highscore";

    pub fn new(best: u64) -> Self {
        Self { best, dirty: false }
    }

    /// Keep `score` if it beats the best; returns true when it did
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            self.dirty = true;
            return true;
        }
        false
    }

    /// Parse a stored value; anything unreadable counts as no score
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.trim().parse().unwrap_or(0))
    }

    /// Load from storage, falling back to zero on any failure
    pub fn load() -> Self {
        match storage::get_string(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let score = Self::parse(&raw);
                log::info!("Loaded high score {}", score.best);
                score
            }
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("Could not load high score: {}", err);
                Self::default()
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&self) -> Result<()> {
        storage::set_string(Self::STORAGE_KEY, &self.best.to_string())
    }

    /// Save only if the best improved since the last write; returns true if written
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        self.dirty = false;
        Ok(true)
    }
}
