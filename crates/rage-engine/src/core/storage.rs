//! Best-score persistence.
//!
//! One integer per game, keyed by a game identifier. Failures never reach
//! the player: [`record_best`] logs them and keeps the session going.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("stored value for `{key}` is not a score: {value:?}")]
    Corrupt { key: String, value: String },
    #[error("write to `{key}` rejected: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// Key-value store holding a single best score per game.
pub trait ScoreStore {
    fn load_best(&self, game: &str) -> Result<Option<u32>, StorageError>;
    fn save_best(&mut self, game: &str, score: u32) -> Result<(), StorageError>;
}

/// In-memory store for tests and for hosts without persistent storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    scores: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self, game: &str) -> Result<Option<u32>, StorageError> {
        Ok(self.scores.get(game).copied())
    }

    fn save_best(&mut self, game: &str, score: u32) -> Result<(), StorageError> {
        self.scores.insert(game.to_string(), score);
        Ok(())
    }
}

/// Parse a stored score string. Shared with string-backed stores.
pub fn parse_score(key: &str, raw: &str) -> Result<u32, StorageError> {
    raw.trim().parse::<u32>().map_err(|_| StorageError::Corrupt {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// Read the best score, treating any failure as "no score yet".
pub fn load_best_or_zero(store: &dyn ScoreStore, game: &str) -> u32 {
    match store.load_best(game) {
        Ok(best) => best.unwrap_or(0),
        Err(err) => {
            log::warn!("best score for {} unavailable: {}", game, err);
            0
        }
    }
}

/// Persist `score` if it beats the stored best. Returns the resulting best.
pub fn record_best(store: &mut dyn ScoreStore, game: &str, score: u32) -> u32 {
    let best = load_best_or_zero(store, game);
    if score <= best {
        return best;
    }
    if let Err(err) = store.save_best(game, score) {
        log::warn!("could not save best score for {}: {}", game, err);
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load_best(&self, _game: &str) -> Result<Option<u32>, StorageError> {
            Err(StorageError::Unavailable("private browsing".into()))
        }

        fn save_best(&mut self, game: &str, _score: u32) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: game.into(),
                reason: "quota".into(),
            })
        }
    }

    #[test]
    fn record_keeps_higher_score() {
        let mut store = MemoryStore::new();
        assert_eq!(record_best(&mut store, "zenTowerBest", 7), 7);
        assert_eq!(record_best(&mut store, "zenTowerBest", 3), 7);
        assert_eq!(store.load_best("zenTowerBest").unwrap(), Some(7));
    }

    #[test]
    fn broken_store_degrades_silently() {
        let mut store = BrokenStore;
        assert_eq!(load_best_or_zero(&store, "zenTowerBest"), 0);
        assert_eq!(record_best(&mut store, "zenTowerBest", 5), 5);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_score("k", " 12 ").unwrap(), 12);
        assert!(matches!(parse_score("k", "twelve"), Err(StorageError::Corrupt { .. })));
    }
}
