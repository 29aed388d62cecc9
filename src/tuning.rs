//! Data-driven game balance
//!
//! Every constant here is a dial, not a law. Defaults are the shipped
//! balance; a JSON override can replace any subset of fields.

use serde::{Deserialize, Serialize};

/// Balance parameters for rounds, odds and claw motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Rounds ===
    /// Attempts per round before permanent upgrades
    pub base_attempts: u32,
    /// Attempts-used counts at which a mid-round buff choice opens
    pub buff_milestones: Vec<u32>,
    /// How many buffs a choice presents
    pub buff_offer_size: usize,

    // === Odds ===
    /// Chance penalty per danger point
    pub danger_coefficient: f32,
    /// Danger ceiling
    pub danger_cap: u32,
    /// Pity gained per failed attempt before upgrades/buffs
    pub base_pity: f32,
    /// Luck ceiling before buffs
    pub base_luck_cap: f32,

    // === Field ===
    /// Drift speed gained per danger point
    pub drift_per_danger: f32,
    /// Drift multiplier ceiling
    pub drift_cap: f32,
    /// Dolls kept on the field
    pub field_size: usize,

    // === Claw ===
    /// Horizontal speed (px/s)
    pub move_speed: f32,
    /// Drop speed (px/s)
    pub drop_speed: f32,
    /// Rise speed (px/s)
    pub rise_speed: f32,
    /// Wall-clock hold in the Grabbing phase (ms)
    pub grab_hold_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_attempts: 8,
            buff_milestones: vec![3, 6],
            buff_offer_size: 3,

            danger_coefficient: 0.01,
            danger_cap: 20,
            base_pity: 0.04,
            base_luck_cap: 0.35,

            drift_per_danger: 0.04,
            drift_cap: 1.7,
            field_size: 12,

            move_speed: 220.0,
            drop_speed: 360.0,
            rise_speed: 420.0,
            grab_hold_ms: 180.0,
        }
    }
}

impl Tuning {
    /// Parse a JSON override, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.validated(),
            Err(err) => {
                log::warn!("Ignoring tuning override: {}", err);
                Self::default()
            }
        }
    }

    /// Clamp every field into a playable range
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        self.base_attempts = self.base_attempts.clamp(1, 99);
        self.buff_milestones.retain(|&m| m > 0 && m < self.base_attempts);
        self.buff_milestones.sort_unstable();
        self.buff_milestones.dedup();
        self.buff_offer_size = self.buff_offer_size.clamp(1, 6);

        self.danger_coefficient = finite_or(self.danger_coefficient, defaults.danger_coefficient).clamp(0.0, 0.1);
        self.base_pity = finite_or(self.base_pity, defaults.base_pity).clamp(0.0, 0.5);
        self.base_luck_cap = finite_or(self.base_luck_cap, defaults.base_luck_cap).clamp(0.0, 1.0);

        self.drift_per_danger = finite_or(self.drift_per_danger, defaults.drift_per_danger).max(0.0);
        self.drift_cap = finite_or(self.drift_cap, defaults.drift_cap).max(1.0);
        self.field_size = self.field_size.clamp(1, 64);

        self.move_speed = positive_or(self.move_speed, defaults.move_speed);
        self.drop_speed = positive_or(self.drop_speed, defaults.drop_speed);
        self.rise_speed = positive_or(self.rise_speed, defaults.rise_speed);
        if !self.grab_hold_ms.is_finite() || self.grab_hold_ms < 0.0 {
            self.grab_hold_ms = defaults.grab_hold_ms;
        }
        self
    }

    /// Field drift multiplier for a danger level
    pub fn drift_multiplier(&self, danger: u32) -> f32 {
        (1.0 + danger as f32 * self.drift_per_danger).clamp(1.0, self.drift_cap)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "base_attempts": 5, "danger_cap": 10 }"#);
        assert_eq!(tuning.base_attempts, 5);
        assert_eq!(tuning.danger_cap, 10);
        assert_eq!(tuning.drop_speed, Tuning::default().drop_speed);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Tuning::from_json("not json"), Tuning::default());
    }

    #[test]
    fn test_validated_drops_unreachable_milestones() {
        let tuning = Tuning {
            base_attempts: 4,
            buff_milestones: vec![6, 0, 2, 2, 3],
            ..Default::default()
        }
        .validated();
        assert_eq!(tuning.buff_milestones, vec![2, 3]);
    }

    #[test]
    fn test_drift_multiplier() {
        let tuning = Tuning::default();
        assert_eq!(tuning.drift_multiplier(0), 1.0);
        assert!((tuning.drift_multiplier(5) - 1.2).abs() < 1e-6);
        assert_eq!(tuning.drift_multiplier(100), 1.7);
    }
}
