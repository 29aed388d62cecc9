//! Outbound notifications
//!
//! The engine never plays sound or draws. It queues [`GameEvent`]s on the
//! game state and the presentation layer drains them after each frame.
//! Dropping every event is a valid presentation.

use glam::Vec2;
use serde::Serialize;

use crate::buffs::BuffId;
use crate::catalog::Rarity;
use crate::upgrades::{PurchaseResult, UpgradeId};

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cue {
    /// Claw started moving sideways
    Move,
    /// Drop started
    Drop,
    /// Arms closed
    Clack,
    /// Slip or miss
    Fail,
    /// Catch, by rarity
    Win(Rarity),
    RoundOver,
    Retry,
    /// Pointer entered a button; the page reports it via `button_hover`
    ButtonHover,
    ButtonClick,
}

/// Camera shake presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shake {
    Slip,
    Win(Rarity),
}

impl Shake {
    /// (duration ms, intensity)
    pub fn params(&self) -> (u32, f32) {
        match self {
            Shake::Slip => (80, 0.004),
            Shake::Win(Rarity::N) => (60, 0.002),
            Shake::Win(Rarity::R) => (90, 0.004),
            Shake::Win(Rarity::SR) => (150, 0.006),
            Shake::Win(Rarity::SSR) => (320, 0.010),
        }
    }
}

/// Read-only HUD readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub owned: usize,
    pub total: usize,
    pub attempts_left: u32,
    pub attempts_per_round: u32,
    pub luck_percent: u32,
    pub luck_cap_percent: u32,
    pub danger: u32,
    pub coins: u32,
    pub win_streak: u32,
    pub best_streak: u32,
}

/// End-of-round summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub round: u32,
    pub new_species: Vec<&'static str>,
    pub coins_gained: u32,
    pub catches: u32,
    pub final_danger: u32,
    pub buffs_active: Vec<BuffId>,
}

/// Everything the engine tells the outside world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Cue(Cue),
    Shake(Shake),
    /// Sparks (and an optional full-screen flash) at a point
    Celebrate { rarity: Rarity, magnitude: u32, flash: f32, pos: Vec2 },
    Hud(HudSnapshot),
    Toast { text: String, color: &'static str, duration_ms: u32 },
    /// Grab box used for a resolution (debug overlay)
    GrabBox { min: Vec2, max: Vec2 },
    RoundStarted { round: u32, attempts: u32 },
    BuffOffered(Vec<BuffId>),
    BuffGranted(BuffId),
    NextRunBuffQueued(BuffId),
    RoundEnded(RoundReport),
    UpgradePurchased { id: UpgradeId, result: PurchaseResult },
    MuteChanged(bool),
    SaveReset,
}

impl GameEvent {
    pub fn toast(text: impl Into<String>, duration_ms: u32) -> Self {
        GameEvent::Toast { text: text.into(), color: "#e5e7eb", duration_ms }
    }

    pub fn toast_colored(text: impl Into<String>, color: &'static str, duration_ms: u32) -> Self {
        GameEvent::Toast { text: text.into(), color, duration_ms }
    }
}
