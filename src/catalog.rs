//! Collectible catalog
//!
//! Fixed at build time. Every other module reads it, nothing writes it.

use serde::{Deserialize, Serialize};

/// Rarity tier of a collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    N,
    R,
    SR,
    SSR,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::N => "N",
            Rarity::R => "R",
            Rarity::SR => "SR",
            Rarity::SSR => "SSR",
        }
    }

    /// Coins paid out for a catch of this tier
    pub fn base_coins(&self) -> u32 {
        match self {
            Rarity::N => 5,
            Rarity::R => 12,
            Rarity::SR => 25,
            Rarity::SSR => 60,
        }
    }

    /// Label color for toasts and the collection view
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::N => "#f5e6d3",
            Rarity::R => "#4fc3f7",
            Rarity::SR => "#ff8a65",
            Rarity::SSR => "#ffd54f",
        }
    }

    /// Spark count for the win celebration
    pub fn sparks(&self) -> u32 {
        match self {
            Rarity::N => 4,
            Rarity::R => 6,
            Rarity::SR => 10,
            Rarity::SSR => 16,
        }
    }

    /// Full-screen flash alpha (0 = none)
    pub fn flash(&self) -> f32 {
        match self {
            Rarity::SSR => 0.55,
            _ => 0.0,
        }
    }
}

/// A collectible definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectibleDef {
    /// Unique key, also the save-record key
    pub id: &'static str,
    pub name: &'static str,
    pub rarity: Rarity,
    /// Base grab probability in (0, 1]
    pub catch_rate: f32,
    /// 0xRRGGBB, presentation only
    pub color: u32,
}

/// The full doll lineup
pub const DOLLS: &[CollectibleDef] = &[
    CollectibleDef { id: "doll-panda", name: "Panda", rarity: Rarity::N, catch_rate: 0.65, color: 0xe5e7eb },
    CollectibleDef { id: "doll-cat", name: "Kitten", rarity: Rarity::N, catch_rate: 0.60, color: 0xf0c674 },
    CollectibleDef { id: "doll-rabbit", name: "Rabbit", rarity: Rarity::R, catch_rate: 0.45, color: 0xf1c40f },
    CollectibleDef { id: "doll-penguin", name: "Penguin", rarity: Rarity::R, catch_rate: 0.40, color: 0x3498db },
    CollectibleDef { id: "doll-owl", name: "Owl", rarity: Rarity::SR, catch_rate: 0.25, color: 0x9b59b6 },
    CollectibleDef { id: "doll-frog", name: "Frog", rarity: Rarity::SR, catch_rate: 0.22, color: 0x2ecc71 },
    CollectibleDef { id: "doll-unicorn", name: "Unicorn", rarity: Rarity::SSR, catch_rate: 0.12, color: 0xfacc15 },
];

/// Look up a definition by id
pub fn find(id: &str) -> Option<&'static CollectibleDef> {
    DOLLS.iter().find(|d| d.id == id)
}

/// Whether `id` names a catalog entry
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}
