//! Claw Doll - a single-screen claw machine collectible game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (claw, play field, grab odds, rounds)
//! - `catalog`: Static collectible definitions
//! - `buffs` / `upgrades`: Run-scoped and account-scoped modifiers
//! - `ledger`: Collection and coin bookkeeping over the save record
//! - `events`: Outbound cues, effects and HUD updates, queued for the page
//! - `persistence`: Versioned save schema, validation and migration
//! - `platform`: Browser/native storage, clock and wasm bridge
//! - `tuning`: Data-driven game balance

pub mod buffs;
pub mod catalog;
pub mod error;
pub mod events;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod upgrades;

pub use catalog::{CollectibleDef, DOLLS, Rarity};
pub use error::{Result, StorageError};
pub use ledger::Ledger;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play box (the glass cabinet the dolls drift in)
    pub const BOX_X: f32 = 160.0;
    pub const BOX_Y: f32 = 140.0;
    pub const BOX_W: f32 = 640.0;
    pub const BOX_H: f32 = 320.0;

    /// Claw travel limits
    pub const CLAW_MARGIN: f32 = 30.0;
    pub const CLAW_TOP_Y: f32 = 60.0;
    pub const CLAW_MAX_Y: f32 = BOX_Y + BOX_H - 20.0;

    /// Grab box below the claw body (before grip scaling)
    pub const GRAB_W: f32 = 66.0;
    pub const GRAB_H: f32 = 44.0;
    pub const GRAB_OFFSET_Y: f32 = 30.0;
    /// Where a held doll hangs relative to the claw
    pub const HOLD_OFFSET_Y: f32 = 44.0;

    /// Dolls
    pub const DOLL_HALF_EXTENT: f32 = 22.0;
    pub const DOLL_BOUNCE_MARGIN: f32 = 24.0;
    pub const DOLL_MAX_VX: f32 = 60.0;
    pub const DOLL_MAX_VY: f32 = 45.0;
    pub const DOLL_JITTER: f32 = 5.0;

    /// Hard ceiling on any grab probability
    pub const MAX_CHANCE: f32 = 0.95;
}

/// Clamp that maps NaN to the lower bound instead of propagating it
#[inline]
pub fn clamp_finite(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
