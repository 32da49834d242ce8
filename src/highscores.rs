//! High score persistence
//!
//! One scalar under a fixed key. Reads default to 0 on absence, storage
//! failure or a malformed value; writes happen only on improvement and a
//! failed write is logged and skipped.

use crate::persistence::KeyValueStore;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "paratrooperHighScore";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Load the stored high score, coercing anything unusable to 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let best = parse_score(&raw);
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Fold a finished game's score in; true if it beat the record
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Persist the current best (best-effort)
    pub fn save(&self, store: &dyn KeyValueStore) {
        match store.set(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}

/// Parse a stored score; accepts numeric text (including "123.0"), anything
/// negative, non-finite or non-numeric becomes 0
fn parse_score(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u32>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};

    #[test]
    fn test_load_absent_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_load_malformed_is_zero() {
        let store = MemoryStore::new();
        for raw in ["abc", "-5", "NaN", "inf", ""] {
            store.set(HighScore::STORAGE_KEY, raw).unwrap();
            assert_eq!(HighScore::load(&store).best, 0, "raw value {:?}", raw);
        }
    }

    #[test]
    fn test_load_numeric_text() {
        let store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "450").unwrap();
        assert_eq!(HighScore::load(&store).best, 450);
        store.set(HighScore::STORAGE_KEY, "120.0").unwrap();
        assert_eq!(HighScore::load(&store).best, 120);
    }

    #[test]
    fn test_load_unavailable_is_zero() {
        assert_eq!(HighScore::load(&UnavailableStore).best, 0);
    }

    #[test]
    fn test_record_only_improves() {
        let mut hs = HighScore::new(100);
        assert!(!hs.record(50));
        assert!(!hs.record(100));
        assert_eq!(hs.best, 100);
        assert!(hs.record(101));
        assert_eq!(hs.best, 101);
    }

    #[test]
    fn test_save_round_trips_and_swallows_failure() {
        let store = MemoryStore::new();
        HighScore::new(75).save(&store);
        assert_eq!(HighScore::load(&store).best, 75);

        // Must not panic
        HighScore::new(75).save(&UnavailableStore);
    }
}
