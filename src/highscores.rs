//! Best score persistence
//!
//! A single integer under `bestScore`. Reads and writes are best-effort:
//! failures are logged and the in-memory value stays authoritative.

use crate::persistence::KeyValueStore;

/// Key-value store key
pub const STORAGE_KEY: &str = "bestScore";

/// Load the stored best score, 0 when absent or unreadable
pub fn load_best(store: &dyn KeyValueStore) -> u64 {
    match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
            Ok(_) => 0,
            Err(e) => {
                log::warn!("Ignoring malformed best score {raw:?}: {e}");
                0
            }
        },
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Failed to read best score: {e}");
            0
        }
    }
}

/// Persist the best score
pub fn save_best(store: &mut dyn KeyValueStore, best: u64) {
    match store.set(STORAGE_KEY, &best.to_string()) {
        Ok(()) => log::info!("Best score saved ({best})"),
        Err(e) => log::warn!("Failed to save best score: {e}"),
    }
}

/// Forget the stored best score
pub fn clear_best(store: &mut dyn KeyValueStore) {
    if let Err(e) = store.remove(STORAGE_KEY) {
        log::warn!("Failed to clear best score: {e}");
    }
}

/// Integer best score a finished run would set, if it beats `best`
pub fn beats(score: f64, best: u64) -> Option<u64> {
    (score > best as f64).then(|| score.floor() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected("quota".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_best(&store), 0);
        save_best(&mut store, 321);
        assert_eq!(load_best(&store), 321);
        clear_best(&mut store);
        assert_eq!(load_best(&store), 0);
    }

    #[test]
    fn test_malformed_value_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "lots").unwrap();
        assert_eq!(load_best(&store), 0);
        store.set(STORAGE_KEY, "12.9").unwrap();
        assert_eq!(load_best(&store), 12);
    }

    #[test]
    fn test_broken_store_never_panics() {
        let mut store = BrokenStore;
        assert_eq!(load_best(&store), 0);
        save_best(&mut store, 10);
        clear_best(&mut store);
    }

    #[test]
    fn test_beats() {
        assert_eq!(beats(10.5, 10), Some(10));
        assert_eq!(beats(11.0, 10), Some(11));
        assert_eq!(beats(10.0, 10), None);
        assert_eq!(beats(3.0, 10), None);
    }
}
