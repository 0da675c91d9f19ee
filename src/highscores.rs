//! Best score across runs
//!
//! A single integer persisted under [`STORAGE_KEY`]. It is read once at
//! startup and rewritten only when a finished run beats it.

use crate::persistence::KvStore;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "rover_dash_high_score";

/// Parse a stored high score. Absent or malformed values read as 0.
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// The persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Load from storage
    pub fn load(store: &impl KvStore) -> Self {
        let raw = store.get(STORAGE_KEY);
        let best = parse_high_score(raw.as_deref());
        if raw.is_some() && best == 0 {
            log::warn!("Ignoring unreadable high score {:?}", raw);
        }
        log::info!("High score: {}", best);
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Persists and returns true on a new best.
    pub fn submit(&mut self, score: u64, store: &mut impl KvStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        store.set(STORAGE_KEY, &score.to_string());
        log::info!("New high score: {}", score);
        true
    }
}
