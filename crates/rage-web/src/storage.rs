use rage_engine::{parse_score, ScoreStore, StorageError};

/// Best scores in the browser's `localStorage`, one key per game.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Fails in private browsing modes and sandboxed frames that disable storage.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{:?}", err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_best(&self, game: &str) -> Result<Option<u32>, StorageError> {
        let raw = self
            .storage
            .get_item(game)
            .map_err(|err| StorageError::Unavailable(format!("{:?}", err)))?;
        raw.map(|value| parse_score(game, &value)).transpose()
    }

    fn save_best(&mut self, game: &str, score: u32) -> Result<(), StorageError> {
        self.storage
            .set_item(game, &score.to_string())
            .map_err(|err| StorageError::WriteRejected {
                key: game.to_string(),
                reason: format!("{:?}", err),
            })
    }
}
