//! Field-by-field validation of stored payloads
//!
//! Storage is client-side and may be corrupted or hand-edited. Nothing
//! here fails: each field is read on its own and replaced by a safe
//! default when it is missing, mistyped or out of range.

use std::collections::BTreeMap;

use serde_json::Value;

use super::record::{MAX_COINS, MAX_COUNT, MAX_STREAK, RECENT_CAP, SAVE_VERSION, SaveRecord};
use crate::catalog::{self, DOLLS};
use crate::upgrades::{UpgradeId, UpgradeLevels};

/// Parse a raw payload of the current schema version
pub fn parse_current(raw: &str) -> Option<SaveRecord> {
    let value: Value = serde_json::from_str(raw).ok()?;
    record_from_value(&value)
}

/// Validate a current-version payload. `None` means "treat as absent".
pub fn record_from_value(value: &Value) -> Option<SaveRecord> {
    let obj = value.as_object()?;
    if version_of(value) != Some(SAVE_VERSION) {
        return None;
    }
    let counts = counts_from(obj.get("counts")?)?;
    Some(SaveRecord {
        version: SAVE_VERSION,
        counts,
        best_streak: obj.get("bestStreak").map_or(0, |v| clamped_u32(v, MAX_STREAK)),
        recent: obj.get("recent").map(recent_from).unwrap_or_default(),
        coins: obj.get("coins").map_or(0, |v| clamped_u32(v, MAX_COINS)),
        upgrades: obj.get("upgrades").map(upgrades_from).unwrap_or_default(),
    })
}

/// The `version` tag of a payload, if it is a whole number
pub fn version_of(value: &Value) -> Option<u32> {
    value.get("version")?.as_u64().and_then(|v| u32::try_from(v).ok())
}

/// Counts object: every catalog id present, unknown ids dropped.
/// `None` when the field is not an object at all.
pub fn counts_from(value: &Value) -> Option<BTreeMap<String, u32>> {
    let obj = value.as_object()?;
    Some(
        DOLLS
            .iter()
            .map(|d| {
                let count = obj.get(d.id).map_or(0, |v| clamped_u32(v, MAX_COUNT));
                (d.id.to_string(), count)
            })
            .collect(),
    )
}

/// Recent list: known ids only, de-duplicated, capped
pub fn recent_from(value: &Value) -> Vec<String> {
    let mut recent: Vec<String> = Vec::new();
    for id in value.as_array().into_iter().flatten().filter_map(Value::as_str) {
        if catalog::is_known(id) && !recent.iter().any(|r| r == id) {
            recent.push(id.to_string());
        }
        if recent.len() == RECENT_CAP {
            break;
        }
    }
    recent
}

/// Upgrade levels, each clamped to its cap
pub fn upgrades_from(value: &Value) -> UpgradeLevels {
    let mut levels = UpgradeLevels::default();
    let Some(obj) = value.as_object() else {
        return levels;
    };
    for id in UpgradeId::ALL {
        let level = obj.get(id.key()).map_or(0, |v| clamped_u32(v, id.def().cap as u32));
        levels.set_level(id, level as u8);
    }
    levels
}

/// Read a non-negative integer, tolerating floats and numeric strings
pub fn clamped_u32(value: &Value, max: u32) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.floor().min(max as f64) as u32,
        _ => 0,
    }
}
