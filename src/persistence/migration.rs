//! Schema migrations
//!
//! One step per schema revision, each lifting the previous version's
//! payload into the current [`SaveRecord`]. Fields the old schema did not
//! have start at their zero value.

use serde_json::Value;

use super::record::{MAX_STREAK, SAVE_VERSION, SaveRecord};
use super::validation::{clamped_u32, counts_from, recent_from, version_of};
use crate::upgrades::UpgradeLevels;

/// A legacy schema the loader still understands
pub struct Step {
    pub version: u32,
    pub key: &'static str,
    pub lift: fn(&Value) -> Option<SaveRecord>,
}

/// Legacy schemas, newest first
pub const STEPS: &[Step] = &[Step {
    version: 1,
    key: "claw-doll-save-v1",
    lift: lift_v1,
}];

/// v1 had counts, best streak and recent. Coins and upgrades are new in v2.
pub fn lift_v1(value: &Value) -> Option<SaveRecord> {
    let obj = value.as_object()?;
    if version_of(value) != Some(1) {
        return None;
    }
    let counts = counts_from(obj.get("counts")?)?;
    Some(SaveRecord {
        version: SAVE_VERSION,
        counts,
        best_streak: obj.get("bestStreak").map_or(0, |v| clamped_u32(v, MAX_STREAK)),
        recent: obj.get("recent").map(recent_from).unwrap_or_default(),
        coins: 0,
        upgrades: UpgradeLevels::default(),
    })
}
