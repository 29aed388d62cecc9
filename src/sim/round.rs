//! Round and run bookkeeping
//!
//! A fresh [`RunState`] is built at every round start. Nothing in it is
//! persisted; it carries attempts, luck, streaks, danger and the buffs
//! picked this round.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::chance::{self, ChanceModifiers, RollOutcome};
use crate::buffs::{BuffId, Modifiers};
use crate::clamp_finite;
use crate::events::RoundReport;
use crate::tuning::Tuning;
use crate::upgrades::UpgradeLevels;

/// What an attempt came to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptOutcome {
    /// A roll was made
    Rolled(RollOutcome),
    /// Max depth reached with nothing under the claw
    Missed,
}

impl AttemptOutcome {
    pub fn is_catch(&self) -> bool {
        matches!(self, AttemptOutcome::Rolled(r) if r.is_catch())
    }
}

/// Transient per-round state
#[derive(Debug, Clone, Serialize)]
pub struct RunState {
    /// 1-based round number this session
    pub round: u32,
    pub attempts_per_round: u32,
    pub attempts_left: u32,
    pub luck: f32,
    pub fail_streak: u32,
    pub win_streak: u32,
    pub danger: u32,
    pub active_buffs: BTreeSet<BuffId>,
    pub modifiers: Modifiers,
    /// Collectibles owned for the first time this round
    pub new_ids: BTreeSet<&'static str>,
    pub coins_gained: u32,
    pub catches: u32,
    /// Milestones already offered this round
    pub milestones_seen: u32,
}

impl RunState {
    /// Round start: attempts and starting luck from upgrades, then the
    /// carried next-run buff if any
    pub fn start(round: u32, tuning: &Tuning, upgrades: &UpgradeLevels, carried: Option<BuffId>) -> Self {
        let attempts = tuning.base_attempts + upgrades.attempts_bonus();
        let mut run = Self {
            round,
            attempts_per_round: attempts,
            attempts_left: attempts,
            luck: 0.0,
            fail_streak: 0,
            win_streak: 0,
            danger: 0,
            active_buffs: BTreeSet::new(),
            modifiers: Modifiers::default(),
            new_ids: BTreeSet::new(),
            coins_gained: 0,
            catches: 0,
            milestones_seen: 0,
        };
        run.luck = clamp_finite(upgrades.start_luck_bonus(), 0.0, run.luck_cap(tuning));
        if let Some(buff) = carried {
            run.grant_buff(buff, tuning);
        }
        run
    }

    /// Current luck ceiling (base adjusted by buffs)
    pub fn luck_cap(&self, tuning: &Tuning) -> f32 {
        clamp_finite(tuning.base_luck_cap + self.modifiers.luck_cap_delta, 0.0, 1.0)
    }

    /// Luck gained per failed attempt
    pub fn pity_gain(&self, tuning: &Tuning, upgrades: &UpgradeLevels) -> f32 {
        tuning.base_pity + upgrades.pity_gain_bonus() + self.modifiers.pity_gain_bonus
    }

    pub fn chance_modifiers(&self, tuning: &Tuning) -> ChanceModifiers {
        ChanceModifiers {
            danger_coefficient: tuning.danger_coefficient,
            chance_penalty: self.modifiers.chance_penalty,
        }
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_per_round - self.attempts_left
    }

    pub fn is_over(&self) -> bool {
        self.attempts_left == 0
    }

    /// Spend an attempt. False (and nothing spent) when none remain.
    pub fn consume_attempt(&mut self) -> bool {
        if self.attempts_left == 0 {
            return false;
        }
        self.attempts_left -= 1;
        true
    }

    /// Apply the after-effects of a resolved attempt: streaks, luck, danger
    pub fn record_outcome(&mut self, outcome: AttemptOutcome, tuning: &Tuning, upgrades: &UpgradeLevels) {
        if outcome.is_catch() {
            self.fail_streak = 0;
            self.win_streak += 1;
            self.catches += 1;
            self.luck = chance::luck_after_catch(self.luck);
            self.danger = (self.danger + 2).min(tuning.danger_cap);
        } else {
            self.fail_streak += 1;
            self.win_streak = 0;
            self.luck = chance::luck_after_fail(self.luck, self.pity_gain(tuning, upgrades), self.luck_cap(tuning));
            self.danger = (self.danger + 1).min(tuning.danger_cap);
        }
    }

    /// Add a buff. False if already owned this round.
    pub fn grant_buff(&mut self, buff: BuffId, tuning: &Tuning) -> bool {
        if !self.active_buffs.insert(buff) {
            return false;
        }
        let luck = buff.apply(&mut self.modifiers);
        self.luck = clamp_finite(self.luck + luck, 0.0, self.luck_cap(tuning));
        log::info!("Buff granted: {}", buff.def().name);
        true
    }

    /// A random selection of buffs not yet owned
    pub fn buff_offer(&self, size: usize, rng: &mut Pcg32) -> Vec<BuffId> {
        let mut pool: Vec<BuffId> = BuffId::ALL.into_iter().filter(|b| !self.active_buffs.contains(b)).collect();
        pool.shuffle(rng);
        pool.truncate(size);
        pool
    }

    /// Whether a mid-round buff choice is due now
    pub fn milestone_due(&self, tuning: &Tuning) -> bool {
        let used = self.attempts_used();
        let due = tuning.buff_milestones.iter().filter(|&&m| m <= used).count() as u32;
        due > self.milestones_seen && !self.is_over() && self.active_buffs.len() < BuffId::ALL.len()
    }

    /// Mark every passed milestone as handled
    pub fn mark_milestones(&mut self, tuning: &Tuning) {
        let used = self.attempts_used();
        self.milestones_seen = tuning.buff_milestones.iter().filter(|&&m| m <= used).count() as u32;
    }

    pub fn report(&self) -> RoundReport {
        RoundReport {
            round: self.round,
            new_species: self.new_ids.iter().copied().collect(),
            coins_gained: self.coins_gained,
            catches: self.catches,
            final_danger: self.danger,
            buffs_active: self.active_buffs.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const FAIL: AttemptOutcome = AttemptOutcome::Rolled(RollOutcome::Fail);
    const WIN: AttemptOutcome = AttemptOutcome::Rolled(RollOutcome::Success);

    fn start(upgrades: &UpgradeLevels) -> RunState {
        RunState::start(1, &Tuning::default(), upgrades, None)
    }

    #[test]
    fn test_start_uses_upgrades() {
        let upgrades = UpgradeLevels { start_luck: 3, extra_tries: 2, pity_gain: 0 };
        let run = start(&upgrades);
        assert_eq!(run.attempts_per_round, Tuning::default().base_attempts + 2);
        assert_eq!(run.attempts_left, run.attempts_per_round);
        assert!((run.luck - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_attempts_never_negative() {
        let mut run = start(&UpgradeLevels::default());
        let total = run.attempts_per_round;
        let spent = (0..total + 5).filter(|_| run.consume_attempt()).count() as u32;
        assert_eq!(spent, total);
        assert!(run.is_over());
    }

    #[test]
    fn test_fail_builds_pity_and_danger() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels::default();
        let mut run = start(&upgrades);
        run.record_outcome(FAIL, &tuning, &upgrades);
        assert!((run.luck - 0.04).abs() < 1e-6);
        assert_eq!(run.danger, 1);
        assert_eq!(run.fail_streak, 1);
    }

    #[test]
    fn test_win_resets_luck_and_heats_danger() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels::default();
        let mut run = start(&upgrades);
        for _ in 0..5 {
            run.record_outcome(FAIL, &tuning, &upgrades);
        }
        assert!(run.luck > 0.0);
        run.record_outcome(WIN, &tuning, &upgrades);
        assert_eq!(run.luck, 0.0);
        assert_eq!(run.danger, 7);
        assert_eq!(run.win_streak, 1);
        assert_eq!(run.fail_streak, 0);
    }

    #[test]
    fn test_shield_save_counts_as_catch() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels::default();
        let mut run = start(&upgrades);
        run.record_outcome(AttemptOutcome::Rolled(RollOutcome::ShieldSaved), &tuning, &upgrades);
        assert_eq!(run.danger, 2);
        assert_eq!(run.catches, 1);
    }

    #[test]
    fn test_miss_is_a_fail() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels::default();
        let mut run = start(&upgrades);
        run.record_outcome(AttemptOutcome::Missed, &tuning, &upgrades);
        assert_eq!(run.danger, 1);
        assert!(run.luck > 0.0);
    }

    #[test]
    fn test_danger_capped() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels::default();
        let mut run = start(&upgrades);
        for _ in 0..100 {
            run.record_outcome(WIN, &tuning, &upgrades);
        }
        assert_eq!(run.danger, tuning.danger_cap);
    }

    #[test]
    fn test_luck_stays_under_cap() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels { start_luck: 5, extra_tries: 0, pity_gain: 4 };
        let mut run = start(&upgrades);
        run.grant_buff(BuffId::PityBooster, &tuning);
        run.grant_buff(BuffId::LuckyStart, &tuning);
        for _ in 0..50 {
            run.record_outcome(FAIL, &tuning, &upgrades);
            assert!(run.luck >= 0.0 && run.luck <= run.luck_cap(&tuning));
        }
        assert!((run.luck - run.luck_cap(&tuning)).abs() < 1e-6);
        assert!((run.luck_cap(&tuning) - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_pity_gain_composes() {
        let tuning = Tuning::default();
        let upgrades = UpgradeLevels { start_luck: 0, extra_tries: 0, pity_gain: 2 };
        let mut run = start(&upgrades);
        run.grant_buff(BuffId::PityBooster, &tuning);
        assert!((run.pity_gain(&tuning, &upgrades) - (0.04 + 0.01 + 0.02)).abs() < 1e-6);
    }

    #[test]
    fn test_buff_never_granted_twice() {
        let tuning = Tuning::default();
        let mut run = start(&UpgradeLevels::default());
        assert!(run.grant_buff(BuffId::LuckyStart, &tuning));
        let luck = run.luck;
        assert!(!run.grant_buff(BuffId::LuckyStart, &tuning));
        assert_eq!(run.luck, luck);
        assert_eq!(run.active_buffs.len(), 1);
    }

    #[test]
    fn test_offer_excludes_owned() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut run = start(&UpgradeLevels::default());
        run.grant_buff(BuffId::SlowDrop, &tuning);
        run.grant_buff(BuffId::SlipShield, &tuning);
        for _ in 0..20 {
            let offer = run.buff_offer(3, &mut rng);
            assert_eq!(offer.len(), 3);
            assert!(!offer.contains(&BuffId::SlowDrop));
            assert!(!offer.contains(&BuffId::SlipShield));
        }
        assert_eq!(run.buff_offer(10, &mut rng).len(), 4);
    }

    #[test]
    fn test_milestones() {
        let tuning = Tuning::default();
        let mut run = start(&UpgradeLevels::default());
        for _ in 0..2 {
            run.consume_attempt();
        }
        assert!(!run.milestone_due(&tuning));
        run.consume_attempt();
        assert!(run.milestone_due(&tuning));
        run.mark_milestones(&tuning);
        assert!(!run.milestone_due(&tuning));
        for _ in 0..3 {
            run.consume_attempt();
        }
        assert!(run.milestone_due(&tuning));
    }

    #[test]
    fn test_carried_buff_applied_at_start() {
        let run = RunState::start(2, &Tuning::default(), &UpgradeLevels::default(), Some(BuffId::SlipShield));
        assert!(run.active_buffs.contains(&BuffId::SlipShield));
        assert_eq!(run.modifiers.shield_charges, 1);
    }

    #[test]
    fn test_report() {
        let tuning = Tuning::default();
        let mut run = start(&UpgradeLevels::default());
        run.new_ids.insert("doll-owl");
        run.coins_gained = 35;
        run.grant_buff(BuffId::GreedyGrip, &tuning);
        let report = run.report();
        assert_eq!(report.new_species, vec!["doll-owl"]);
        assert_eq!(report.coins_gained, 35);
        assert_eq!(report.buffs_active, vec![BuffId::GreedyGrip]);
    }
}
