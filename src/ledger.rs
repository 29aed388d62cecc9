//! Collection and coin ledger
//!
//! The single writer of the save record. Every mutation reads, modifies
//! and writes the whole record within one call.

use serde::Serialize;

use crate::catalog::{CollectibleDef, DOLLS};
use crate::persistence::{Persistence, RECENT_CAP, SaveRecord};
use crate::settings::Settings;
use crate::upgrades::{PurchaseResult, UpgradeId, UpgradeLevels};

/// Bonus coins for the first catch of a collectible
pub const NEW_SPECIES_BONUS: u32 = 10;

/// What a catch earned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatchReceipt {
    pub id: &'static str,
    pub is_new: bool,
    pub coins: u32,
    pub count: u32,
}

/// One row of the collection view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectionEntry {
    pub def: &'static CollectibleDef,
    pub count: u32,
    pub owned: bool,
}

pub struct Ledger {
    record: SaveRecord,
    persistence: Persistence,
}

impl Ledger {
    /// Load (or migrate, or start) the record behind `persistence`
    pub fn open(mut persistence: Persistence) -> Self {
        let record = persistence.load();
        Self { record, persistence }
    }

    pub fn record(&self) -> &SaveRecord {
        &self.record
    }

    pub fn coins(&self) -> u32 {
        self.record.coins
    }

    pub fn upgrades(&self) -> &UpgradeLevels {
        &self.record.upgrades
    }

    /// Book a successful grab and persist
    pub fn record_catch(&mut self, def: &'static CollectibleDef, win_streak: u32) -> CatchReceipt {
        let record = &mut self.record;
        let count = record.counts.entry(def.id.to_string()).or_insert(0);
        let is_new = *count == 0;
        *count = count.saturating_add(1);
        let count = *count;

        let coins = def.rarity.base_coins() + if is_new { NEW_SPECIES_BONUS } else { 0 };
        record.coins = record.coins.saturating_add(coins);

        record.recent.retain(|id| id != def.id);
        record.recent.insert(0, def.id.to_string());
        record.recent.truncate(RECENT_CAP);

        record.best_streak = record.best_streak.max(win_streak);

        self.commit();
        CatchReceipt { id: def.id, is_new, coins, count }
    }

    /// Spend coins on an upgrade; persists only on success
    pub fn purchase(&mut self, id: UpgradeId) -> PurchaseResult {
        let record = &mut self.record;
        let result = record.upgrades.purchase(id, &mut record.coins);
        if let PurchaseResult::Purchased { level, cost } = result {
            log::info!("Bought {} level {} for {} coins", id.def().name, level, cost);
            self.commit();
        }
        result
    }

    /// Wipe progress, including any legacy record
    pub fn reset(&mut self) {
        if let Err(err) = self.persistence.reset() {
            log::warn!("Save reset incomplete: {}", err);
        }
        self.record = SaveRecord::fresh();
    }

    /// Write the record as it stands
    pub fn commit(&mut self) {
        if let Err(err) = self.persistence.save(&self.record) {
            log::warn!("Save failed: {}", err);
        }
    }

    pub fn load_settings(&self) -> Settings {
        self.persistence.load_settings()
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        if let Err(err) = self.persistence.save_settings(settings) {
            log::warn!("Settings not saved: {}", err);
        }
    }

    /// Catalog order, with counts
    pub fn collection(&self) -> Vec<CollectionEntry> {
        DOLLS
            .iter()
            .map(|def| {
                let count = self.record.count(def.id);
                CollectionEntry { def, count, owned: count > 0 }
            })
            .collect()
    }
}
