//! Run-scoped buffs
//!
//! Chosen at round checkpoints, held for the rest of the round, cleared
//! when the next round starts. Each buff folds into [`Modifiers`].

use serde::{Deserialize, Serialize};

/// Buff identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuffId {
    SteadyHands,
    SlowDrop,
    SlipShield,
    LuckyStart,
    GreedyGrip,
    PityBooster,
}

pub const STEADY_HANDS_MOVE_MULT: f32 = 1.20;
pub const SLOW_DROP_MULT: f32 = 0.85;
pub const LUCKY_START_LUCK: f32 = 0.06;
pub const LUCKY_START_CAP_DELTA: f32 = -0.05;
pub const GREEDY_GRIP_SCALE: f32 = 1.12;
pub const GRIP_SCALE_CAP: f32 = 1.4;
pub const GREEDY_GRIP_PENALTY: f32 = 0.03;
pub const PITY_BOOSTER_GAIN: f32 = 0.02;

/// Static description of a buff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuffDef {
    pub id: BuffId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub static BUFFS: [BuffDef; 6] = [
    BuffDef {
        id: BuffId::SteadyHands,
        key: "steadyHands",
        name: "Steady Hands",
        description: "Claw moves 20% faster",
    },
    BuffDef {
        id: BuffId::SlowDrop,
        key: "slowDrop",
        name: "Slow Drop",
        description: "Claw drops 15% slower",
    },
    BuffDef {
        id: BuffId::SlipShield,
        key: "slipShield",
        name: "Slip Shield",
        description: "The next slip this round holds on",
    },
    BuffDef {
        id: BuffId::LuckyStart,
        key: "luckyStart",
        name: "Lucky Start",
        description: "+6% luck now, luck cap -5%",
    },
    BuffDef {
        id: BuffId::GreedyGrip,
        key: "greedyGrip",
        name: "Greedy Grip",
        description: "Grab box 12% larger, -3% chance",
    },
    BuffDef {
        id: BuffId::PityBooster,
        key: "pityBooster",
        name: "Pity Booster",
        description: "+2% luck per miss",
    },
];

impl BuffId {
    pub const ALL: [BuffId; 6] = [
        BuffId::SteadyHands,
        BuffId::SlowDrop,
        BuffId::SlipShield,
        BuffId::LuckyStart,
        BuffId::GreedyGrip,
        BuffId::PityBooster,
    ];

    pub fn def(&self) -> &'static BuffDef {
        match self {
            BuffId::SteadyHands => &BUFFS[0],
            BuffId::SlowDrop => &BUFFS[1],
            BuffId::SlipShield => &BUFFS[2],
            BuffId::LuckyStart => &BUFFS[3],
            BuffId::GreedyGrip => &BUFFS[4],
            BuffId::PityBooster => &BUFFS[5],
        }
    }

    pub fn key(&self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Fold this buff into `mods`. Returns luck to add right away.
    pub fn apply(self, mods: &mut Modifiers) -> f32 {
        match self {
            BuffId::SteadyHands => {
                mods.move_speed_mult *= STEADY_HANDS_MOVE_MULT;
                0.0
            }
            BuffId::SlowDrop => {
                mods.drop_speed_mult *= SLOW_DROP_MULT;
                0.0
            }
            BuffId::SlipShield => {
                mods.shield_charges = 1;
                0.0
            }
            BuffId::LuckyStart => {
                mods.luck_cap_delta += LUCKY_START_CAP_DELTA;
                LUCKY_START_LUCK
            }
            BuffId::GreedyGrip => {
                mods.grip_scale = (mods.grip_scale * GREEDY_GRIP_SCALE).min(GRIP_SCALE_CAP);
                mods.chance_penalty += GREEDY_GRIP_PENALTY;
                0.0
            }
            BuffId::PityBooster => {
                mods.pity_gain_bonus += PITY_BOOSTER_GAIN;
                0.0
            }
        }
    }
}

/// Composed effect of every buff active this round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Modifiers {
    pub move_speed_mult: f32,
    pub drop_speed_mult: f32,
    /// Scales the claw's rise. No buff changes it; left as a hook for
    /// tuning overrides and future buffs.
    pub rise_speed_mult: f32,
    /// Added to the base luck cap
    pub luck_cap_delta: f32,
    /// Subtracted from every effective chance
    pub chance_penalty: f32,
    /// Added to pity gain per failed attempt
    pub pity_gain_bonus: f32,
    /// Grab box scale
    pub grip_scale: f32,
    /// Failing rolls that may still be turned into catches this round
    pub shield_charges: u8,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            move_speed_mult: 1.0,
            drop_speed_mult: 1.0,
            rise_speed_mult: 1.0,
            luck_cap_delta: 0.0,
            chance_penalty: 0.0,
            pity_gain_bonus: 0.0,
            grip_scale: 1.0,
            shield_charges: 0,
        }
    }
}
