//! Grab probability model
//!
//! Turns a doll's catch rate plus luck, danger and buff penalties into a
//! single success chance, then settles it with one uniform roll. The roll
//! is returned alongside the outcome so tools and tests can see it.

use rand::Rng;
use rand_pcg::Pcg32;
use std::collections::VecDeque;

use crate::catalog::CollectibleDef;
use crate::clamp_finite;
use crate::consts::MAX_CHANCE;

/// Source of uniform rolls in [0, 1)
pub trait RollSource {
    fn roll(&mut self) -> f32;
}

impl RollSource for Pcg32 {
    fn roll(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Rolls fed from a script, then a fallback value
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    queue: VecDeque<f32>,
    /// Returned once the script runs dry
    pub fallback: f32,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        Self { queue: rolls.into_iter().collect(), fallback: 0.0 }
    }

    /// Every roll returns `value`
    pub fn always(value: f32) -> Self {
        Self { queue: VecDeque::new(), fallback: value }
    }

    pub fn push(&mut self, value: f32) {
        self.queue.push_back(value);
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self) -> f32 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

/// Penalty terms layered over the base rate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChanceModifiers {
    /// Chance lost per danger point
    pub danger_coefficient: f32,
    /// Flat penalty from buffs
    pub chance_penalty: f32,
}

/// How a single roll settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RollOutcome {
    Success,
    Fail,
    /// Failing roll overridden by a Slip Shield charge
    ShieldSaved,
}

impl RollOutcome {
    pub fn is_catch(&self) -> bool {
        !matches!(self, RollOutcome::Fail)
    }
}

/// A settled roll
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Resolution {
    pub chance: f32,
    pub roll: f32,
    pub outcome: RollOutcome,
}

/// `clamp(base + luck - danger*coef - penalty, 0, 0.95)`
pub fn effective_chance(def: &CollectibleDef, luck_bonus: f32, danger: u32, mods: &ChanceModifiers) -> f32 {
    let base = clamp_finite(def.catch_rate, 0.0, 1.0);
    let luck = clamp_finite(luck_bonus, 0.0, 1.0);
    let raw = base + luck - danger as f32 * mods.danger_coefficient - mods.chance_penalty;
    clamp_finite(raw, 0.0, MAX_CHANCE)
}

/// One roll against `chance`; succeeds iff `roll <= chance`
pub fn resolve(chance: f32, rolls: &mut dyn RollSource) -> Resolution {
    let roll = rolls.roll();
    let outcome = if roll <= chance { RollOutcome::Success } else { RollOutcome::Fail };
    Resolution { chance, roll, outcome }
}

/// [`resolve`], letting one shield charge turn a failing roll into a catch
pub fn resolve_shielded(chance: f32, rolls: &mut dyn RollSource, shield_charges: &mut u8) -> Resolution {
    let mut resolution = resolve(chance, rolls);
    if resolution.outcome == RollOutcome::Fail && *shield_charges > 0 {
        *shield_charges -= 1;
        resolution.outcome = RollOutcome::ShieldSaved;
    }
    resolution
}

/// Luck after a failed attempt
pub fn luck_after_fail(luck_bonus: f32, pity_gain: f32, luck_cap: f32) -> f32 {
    let cap = clamp_finite(luck_cap, 0.0, 1.0);
    clamp_finite(luck_bonus + pity_gain.max(0.0), 0.0, cap)
}

/// Luck after a catch: the bar is spent in full
pub fn luck_after_catch(_luck_bonus: f32) -> f32 {
    0.0
}
