//! The versioned save record

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::DOLLS;
use crate::upgrades::UpgradeLevels;

/// Current schema version
pub const SAVE_VERSION: u32 = 2;

/// Longest "last obtained" list kept
pub const RECENT_CAP: usize = 9;

/// Field ceilings applied on load
pub const MAX_COUNT: u32 = 999_999;
pub const MAX_STREAK: u32 = 999_999;
pub const MAX_COINS: u32 = 99_999_999;

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub version: u32,
    /// Catches per collectible id, one entry per catalog id
    pub counts: BTreeMap<String, u32>,
    /// Longest win streak ever reached
    pub best_streak: u32,
    /// Most recent first
    pub recent: Vec<String>,
    pub coins: u32,
    pub upgrades: UpgradeLevels,
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self::fresh()
    }
}

impl SaveRecord {
    /// A first-launch record: every catalog id at zero
    pub fn fresh() -> Self {
        Self {
            version: SAVE_VERSION,
            counts: DOLLS.iter().map(|d| (d.id.to_string(), 0)).collect(),
            best_streak: 0,
            recent: Vec::new(),
            coins: 0,
            upgrades: UpgradeLevels::default(),
        }
    }

    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Number of distinct collectibles caught at least once
    pub fn owned_count(&self) -> usize {
        DOLLS.iter().filter(|d| self.count(d.id) > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_has_every_catalog_id() {
        let record = SaveRecord::fresh();
        assert_eq!(record.version, SAVE_VERSION);
        assert_eq!(record.counts.len(), DOLLS.len());
        assert!(DOLLS.iter().all(|d| record.counts.get(d.id) == Some(&0)));
        assert_eq!(record.coins, 0);
        assert_eq!(record.best_streak, 0);
        assert!(record.recent.is_empty());
        assert_eq!(record.upgrades, UpgradeLevels::default());
    }

    #[test]
    fn test_wire_keys_are_camel_case() {
        let json = serde_json::to_value(SaveRecord::fresh()).unwrap();
        assert!(json.get("bestStreak").is_some());
        assert!(json["upgrades"].get("startLuck").is_some());
    }
}
