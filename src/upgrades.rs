//! Permanent upgrades
//!
//! Account-scoped, leveled and capped. Levels live in the save record and
//! are bought with coins between rounds.

use serde::{Deserialize, Serialize};

/// Permanent upgrade identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    StartLuck,
    ExtraTries,
    PityGain,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 3] = [UpgradeId::StartLuck, UpgradeId::ExtraTries, UpgradeId::PityGain];

    pub fn def(&self) -> &'static UpgradeDef {
        match self {
            UpgradeId::StartLuck => &UPGRADES[0],
            UpgradeId::ExtraTries => &UPGRADES[1],
            UpgradeId::PityGain => &UPGRADES[2],
        }
    }

    /// Stable key used in the save record and by UI intents
    pub fn key(&self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// Static description of an upgrade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cap: u8,
    pub base_cost: u32,
}

impl UpgradeDef {
    /// Coin price of buying the level after `level`
    pub fn cost(&self, level: u8) -> u32 {
        self.base_cost * (level as u32 + 1)
    }
}

pub const START_LUCK_PER_LEVEL: f32 = 0.02;
pub const EXTRA_TRIES_PER_LEVEL: u32 = 1;
pub const PITY_GAIN_PER_LEVEL: f32 = 0.005;

pub static UPGRADES: [UpgradeDef; 3] = [
    UpgradeDef {
        id: UpgradeId::StartLuck,
        key: "startLuck",
        name: "Start Luck",
        description: "+2% starting luck each round",
        cap: 5,
        base_cost: 30,
    },
    UpgradeDef {
        id: UpgradeId::ExtraTries,
        key: "extraTries",
        name: "Extra Tries",
        description: "+1 attempt per round",
        cap: 2,
        base_cost: 80,
    },
    UpgradeDef {
        id: UpgradeId::PityGain,
        key: "pityGain",
        name: "Pity Gain",
        description: "+0.5% luck gained per miss",
        cap: 4,
        base_cost: 40,
    },
];

/// Outcome of a purchase request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseResult {
    Purchased { level: u8, cost: u32 },
    InsufficientFunds { cost: u32, coins: u32 },
    AtCap,
}

/// Levels of every permanent upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeLevels {
    pub start_luck: u8,
    pub extra_tries: u8,
    pub pity_gain: u8,
}

impl UpgradeLevels {
    pub fn level(&self, id: UpgradeId) -> u8 {
        match id {
            UpgradeId::StartLuck => self.start_luck,
            UpgradeId::ExtraTries => self.extra_tries,
            UpgradeId::PityGain => self.pity_gain,
        }
    }

    /// Set a level, clamped to the upgrade's cap
    pub fn set_level(&mut self, id: UpgradeId, level: u8) {
        let level = level.min(id.def().cap);
        match id {
            UpgradeId::StartLuck => self.start_luck = level,
            UpgradeId::ExtraTries => self.extra_tries = level,
            UpgradeId::PityGain => self.pity_gain = level,
        }
    }

    /// Price of the next level, `None` when capped
    pub fn next_cost(&self, id: UpgradeId) -> Option<u32> {
        let def = id.def();
        let level = self.level(id);
        (level < def.cap).then(|| def.cost(level))
    }

    /// Spend coins on the next level of `id`
    pub fn purchase(&mut self, id: UpgradeId, coins: &mut u32) -> PurchaseResult {
        let Some(cost) = self.next_cost(id) else {
            return PurchaseResult::AtCap;
        };
        if *coins < cost {
            return PurchaseResult::InsufficientFunds { cost, coins: *coins };
        }
        *coins -= cost;
        let level = self.level(id) + 1;
        self.set_level(id, level);
        PurchaseResult::Purchased { level, cost }
    }

    /// Luck granted at the start of every round
    pub fn start_luck_bonus(&self) -> f32 {
        self.start_luck as f32 * START_LUCK_PER_LEVEL
    }

    /// Extra attempts per round
    pub fn attempts_bonus(&self) -> u32 {
        self.extra_tries as u32 * EXTRA_TRIES_PER_LEVEL
    }

    /// Extra pity per failed attempt
    pub fn pity_gain_bonus(&self) -> f32 {
        self.pity_gain as f32 * PITY_GAIN_PER_LEVEL
    }
}
