//! Save/load persistence with versioned migration
//!
//! Features:
//! - Versioned JSON record under a version-suffixed key
//! - Field-level validation and clamping on every load
//! - One-step migration from the previous schema, old key removed after
//! - Every failure degrades to "no save found"

pub mod migration;
pub mod record;
pub mod store;
pub mod validation;

pub use record::{RECENT_CAP, SAVE_VERSION, SaveRecord};
pub use store::{KvStore, MemoryStore, SharedStore};

use crate::error::Result;
use crate::settings::Settings;

/// Key of the current schema
pub const SAVE_KEY: &str = "claw-doll-save-v2";
/// Key of the player's preferences
pub const SETTINGS_KEY: &str = "claw-doll-settings";

/// The save slot: owns the store, speaks the schema
pub struct Persistence {
    store: Box<dyn KvStore>,
}

impl Persistence {
    pub fn new(store: impl KvStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }

    pub fn from_boxed(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load the newest valid record, migrating or starting fresh as needed.
    /// Never fails.
    pub fn load(&mut self) -> SaveRecord {
        if let Some(record) = self.read(SAVE_KEY).as_deref().and_then(validation::parse_current) {
            log::info!("Loaded save ({} of {} owned)", record.owned_count(), crate::DOLLS.len());
            return record;
        }

        for step in migration::STEPS {
            let Some(raw) = self.read(step.key) else {
                continue;
            };
            let lifted = serde_json::from_str(&raw).ok().and_then(|value| (step.lift)(&value));
            let Some(record) = lifted else {
                log::warn!("Discarding unreadable v{} save", step.version);
                continue;
            };
            match self.save(&record) {
                Ok(()) => {
                    if let Err(err) = self.store.remove(step.key) {
                        log::warn!("Migrated save but could not remove {}: {}", step.key, err);
                    }
                    log::info!("Migrated save from v{} to v{}", step.version, SAVE_VERSION);
                }
                Err(err) => log::warn!("Migrated save could not be written: {}", err),
            }
            return record;
        }

        log::info!("No save found, starting fresh");
        SaveRecord::fresh()
    }

    /// Write the full record under the current key
    pub fn save(&mut self, record: &SaveRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store.set(SAVE_KEY, &json)
    }

    /// Delete every known version of the record. Every key is tried even
    /// when one fails; the first error is returned.
    pub fn reset(&mut self) -> Result<()> {
        let keys = std::iter::once(SAVE_KEY).chain(migration::STEPS.iter().map(|step| step.key));
        let mut first_err = None;
        for key in keys {
            if let Err(err) = self.store.remove(key) {
                log::warn!("Could not remove {}: {}", key, err);
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => {
                log::info!("Save cleared");
                Ok(())
            }
        }
    }

    /// Load preferences, defaults when absent or unreadable
    pub fn load_settings(&self) -> Settings {
        self.read(SETTINGS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &json)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Storage read failed for {}: {}", key, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DOLLS;
    use crate::upgrades::UpgradeLevels;
    use proptest::prelude::*;

    const V1_KEY: &str = "claw-doll-save-v1";

    #[test]
    fn test_fresh_load_with_empty_storage() {
        let mut slot = Persistence::new(MemoryStore::new());
        let record = slot.load();
        assert_eq!(record.counts.len(), DOLLS.len());
        assert!(record.counts.values().all(|&c| c == 0));
        assert_eq!(record.coins, 0);
        assert_eq!(record.best_streak, 0);
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let mut slot = Persistence::new(MemoryStore::new());
        let mut record = SaveRecord::fresh();
        record.counts.insert("doll-owl".to_string(), 3);
        record.best_streak = 4;
        record.recent = vec!["doll-owl".to_string()];
        record.coins = 77;
        record.upgrades = UpgradeLevels { start_luck: 2, extra_tries: 1, pity_gain: 0 };
        slot.save(&record).unwrap();
        assert_eq!(slot.load(), record);
    }

    #[test]
    fn test_migrates_v1_and_removes_old_key() {
        let shared = SharedStore::default();
        shared.clone().set(
            V1_KEY,
            r#"{"version":1,"counts":{"doll-cat":2,"doll-ghost":5},"bestStreak":3,"recent":["doll-cat"]}"#,
        )
        .unwrap();
        let mut slot = Persistence::new(shared.clone());

        let record = slot.load();
        assert_eq!(record.count("doll-cat"), 2);
        assert_eq!(record.best_streak, 3);
        assert_eq!(record.recent, vec!["doll-cat"]);
        assert_eq!(record.coins, 0);

        assert!(!shared.contains(V1_KEY));
        assert!(shared.contains(SAVE_KEY));
        assert_eq!(slot.load(), record);
    }

    #[test]
    fn test_current_key_wins_over_legacy() {
        let mut current = SaveRecord::fresh();
        current.coins = 9;
        let store = MemoryStore::new()
            .with(SAVE_KEY, &serde_json::to_string(&current).unwrap())
            .with(V1_KEY, r#"{"version":1,"counts":{"doll-cat":50}}"#);
        let mut slot = Persistence::new(store);
        assert_eq!(slot.load(), current);
    }

    #[test]
    fn test_corrupt_current_falls_back_to_legacy() {
        let store = MemoryStore::new()
            .with(SAVE_KEY, "{{{{")
            .with(V1_KEY, r#"{"version":1,"counts":{"doll-frog":1}}"#);
        let mut slot = Persistence::new(store);
        assert_eq!(slot.load().count("doll-frog"), 1);
    }

    #[test]
    fn test_garbage_everywhere_is_fresh() {
        let store = MemoryStore::new().with(SAVE_KEY, "[]").with(V1_KEY, "\"hello\"");
        let mut slot = Persistence::new(store);
        assert_eq!(slot.load(), SaveRecord::fresh());
    }

    #[test]
    fn test_unreadable_storage_is_fresh() {
        let mut store = MemoryStore::new().with(SAVE_KEY, &serde_json::to_string(&SaveRecord::fresh()).unwrap());
        store.fail_reads = true;
        let mut slot = Persistence::new(store);
        assert_eq!(slot.load(), SaveRecord::fresh());
    }

    #[test]
    fn test_migration_kept_in_memory_when_write_fails() {
        let mut store = MemoryStore::new().with(V1_KEY, r#"{"version":1,"counts":{"doll-owl":2}}"#);
        store.fail_writes = true;
        let mut slot = Persistence::new(store);
        assert_eq!(slot.load().count("doll-owl"), 2);
        assert!(slot.save(&SaveRecord::fresh()).is_err());
    }

    #[test]
    fn test_reset_removes_every_version() {
        let shared = SharedStore::default();
        let mut slot = Persistence::new(shared.clone());
        let mut record = SaveRecord::fresh();
        record.coins = 500;
        slot.save(&record).unwrap();
        shared.clone().set(V1_KEY, r#"{"version":1,"counts":{"doll-cat":8}}"#).unwrap();

        slot.reset().unwrap();
        assert!(!shared.contains(SAVE_KEY));
        assert!(!shared.contains(V1_KEY));
        assert_eq!(slot.load(), SaveRecord::fresh());
    }

    #[test]
    fn test_reset_keeps_going_after_failed_remove() {
        let shared = SharedStore::new(MemoryStore::new().pinning(SAVE_KEY));
        let mut slot = Persistence::new(shared.clone());
        slot.save(&SaveRecord::fresh()).unwrap();
        shared.clone().set(V1_KEY, r#"{"version":1,"counts":{"doll-cat":8}}"#).unwrap();

        assert!(slot.reset().is_err());
        assert!(shared.contains(SAVE_KEY));
        assert!(!shared.contains(V1_KEY));
    }

    #[test]
    fn test_settings_round_trip() {
        let mut slot = Persistence::new(MemoryStore::new());
        assert_eq!(slot.load_settings(), Settings::default());
        let settings = Settings { muted: true, ..Default::default() };
        slot.save_settings(&settings).unwrap();
        assert_eq!(slot.load_settings(), settings);
    }

    proptest! {
        #[test]
        fn prop_save_load_round_trip(
            counts in proptest::collection::vec(0u32..10_000, DOLLS.len()),
            best_streak in 0u32..10_000,
            coins in 0u32..1_000_000,
            start_luck in 0u8..=5,
            extra_tries in 0u8..=2,
            pity_gain in 0u8..=4,
            recent_len in 0usize..=RECENT_CAP,
        ) {
            let mut record = SaveRecord::fresh();
            for (def, count) in DOLLS.iter().zip(&counts) {
                record.counts.insert(def.id.to_string(), *count);
            }
            record.best_streak = best_streak;
            record.coins = coins;
            record.upgrades = UpgradeLevels { start_luck, extra_tries, pity_gain };
            record.recent = DOLLS.iter().take(recent_len).map(|d| d.id.to_string()).collect();

            let mut slot = Persistence::new(MemoryStore::new());
            slot.save(&record).unwrap();
            let loaded = slot.load();
            prop_assert_eq!(&loaded, &record);
            slot.save(&loaded).unwrap();
            prop_assert_eq!(slot.load(), record);
        }
    }
}
