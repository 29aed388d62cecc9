//! Game state and player intents
//!
//! Everything a session needs lives in [`GameState`]: the claw, the play
//! field, the current round, the ledger behind the save slot and the queue
//! of outbound events.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::chance::{self, Resolution, RollOutcome, RollSource};
use super::claw::Claw;
use super::field::Field;
use super::round::{AttemptOutcome, RunState};
use crate::buffs::BuffId;
use crate::catalog::{CollectibleDef, DOLLS};
use crate::events::{Cue, GameEvent, HudSnapshot, Shake};
use crate::ledger::Ledger;
use crate::persistence::Persistence;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::upgrades::{PurchaseResult, UpgradeId};

/// Current phase of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Title screen; shop open
    NotStarted,
    /// Round in play
    Playing,
    /// Mid-round modal: one of `offer` must be picked
    BuffChoice { offer: Vec<BuffId> },
    /// Round over; shop open, retry starts the next round
    RoundEnd,
}

impl GamePhase {
    /// Whether the upgrade shop accepts purchases
    pub fn shop_open(&self) -> bool {
        matches!(self, GamePhase::NotStarted | GamePhase::RoundEnd)
    }
}

/// Toast lifetimes (ms)
const TOAST_SHORT_MS: u32 = 900;
const TOAST_LONG_MS: u32 = 1400;

/// Complete session state
pub struct GameState {
    pub tuning: Tuning,
    pub settings: Settings,
    pub ledger: Ledger,
    pub run: RunState,
    pub claw: Claw,
    pub field: Field,
    pub phase: GamePhase,
    /// Field spawning, drift jitter and buff offers
    pub rng: Pcg32,
    /// Grab rolls
    roller: Box<dyn RollSource>,
    events: Vec<GameEvent>,
    /// Round-end offer for next round's buff
    pub next_run_offer: Vec<BuffId>,
    /// Picked from `next_run_offer`; applied when the next round starts
    pub queued_buff: Option<BuffId>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Last grab roll, for tooling
    pub last_resolution: Option<Resolution>,
    /// Previous tick's steering, to cue the start of a move
    pub(crate) last_move_dir: i8,
}

impl GameState {
    /// New session over `persistence`; grab rolls come from a Pcg32 on
    /// its own stream
    pub fn new(seed: u64, persistence: Persistence, tuning: Tuning) -> Self {
        let roller = Pcg32::new(seed, 0xda3e_39cb_94b9_5bdb);
        Self::with_roller(seed, persistence, tuning, Box::new(roller))
    }

    /// New session with an injected roll source
    pub fn with_roller(seed: u64, persistence: Persistence, tuning: Tuning, roller: Box<dyn RollSource>) -> Self {
        let tuning = tuning.validated();
        let ledger = Ledger::open(persistence);
        let settings = ledger.load_settings();
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = Field::populate(tuning.field_size, &mut rng);
        let run = RunState::start(0, &tuning, ledger.upgrades(), None);

        let mut state = Self {
            tuning,
            settings,
            ledger,
            run,
            claw: Claw::default(),
            field,
            phase: GamePhase::NotStarted,
            rng,
            roller,
            events: Vec::new(),
            next_run_offer: Vec::new(),
            queued_buff: None,
            time_ticks: 0,
            last_resolution: None,
            last_move_dir: 0,
        };
        state.emit_hud();
        state
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn emit_hud(&mut self) {
        let hud = self.hud();
        self.emit(GameEvent::Hud(hud));
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        let record = self.ledger.record();
        HudSnapshot {
            owned: record.owned_count(),
            total: DOLLS.len(),
            attempts_left: self.run.attempts_left,
            attempts_per_round: self.run.attempts_per_round,
            luck_percent: (self.run.luck * 100.0).round() as u32,
            luck_cap_percent: (self.run.luck_cap(&self.tuning) * 100.0).round() as u32,
            danger: self.run.danger,
            coins: record.coins,
            win_streak: self.run.win_streak,
            best_streak: record.best_streak,
        }
    }

    /// Whether a drop may be started this tick
    pub fn can_drop(&self) -> bool {
        self.phase == GamePhase::Playing && self.claw.is_idle() && !self.run.is_over()
    }

    /// Start the first round. Later rounds go through [`Self::request_retry`].
    pub fn start_round(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.begin_round();
        true
    }

    /// Retry from round end
    pub fn request_retry(&mut self) -> bool {
        if self.phase != GamePhase::RoundEnd {
            return false;
        }
        self.emit(GameEvent::Cue(Cue::Retry));
        self.begin_round();
        true
    }

    /// Hover feedback for the page's buttons
    pub fn button_hover(&mut self) {
        self.emit(GameEvent::Cue(Cue::ButtonHover));
    }

    fn begin_round(&mut self) {
        let carried = self.queued_buff.take();
        self.run = RunState::start(self.run.round + 1, &self.tuning, self.ledger.upgrades(), carried);
        self.next_run_offer.clear();
        self.claw.settle();
        self.phase = GamePhase::Playing;
        log::info!("Round {} started with {} attempts", self.run.round, self.run.attempts_per_round);

        self.emit(GameEvent::RoundStarted { round: self.run.round, attempts: self.run.attempts_per_round });
        if let Some(buff) = carried {
            self.emit(GameEvent::BuffGranted(buff));
        }
        self.emit_hud();
    }

    /// Pick a buff from the open offer. Mid-round the buff applies now;
    /// at round end it is queued for the next round.
    pub fn choose_buff(&mut self, id: BuffId) -> bool {
        let offered = matches!(&self.phase, GamePhase::BuffChoice { offer } if offer.contains(&id));
        if offered {
            self.run.grant_buff(id, &self.tuning);
            self.run.mark_milestones(&self.tuning);
            self.phase = GamePhase::Playing;
            self.emit(GameEvent::Cue(Cue::ButtonClick));
            self.emit(GameEvent::BuffGranted(id));
            self.emit(GameEvent::toast(format!("Buff: {}", id.def().name), TOAST_SHORT_MS));
            self.emit_hud();
            return true;
        }

        if self.phase == GamePhase::RoundEnd && self.next_run_offer.contains(&id) {
            self.queued_buff = Some(id);
            log::info!("Next-run buff queued: {}", id.def().name);
            self.emit(GameEvent::Cue(Cue::ButtonClick));
            self.emit(GameEvent::NextRunBuffQueued(id));
            return true;
        }
        false
    }

    /// Buy an upgrade level. None while the shop is closed.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Option<PurchaseResult> {
        if !self.phase.shop_open() {
            return None;
        }
        let result = self.ledger.purchase(id);
        if self.phase == GamePhase::NotStarted {
            // Nothing played yet, so the pending round can reflect the new level
            self.run = RunState::start(0, &self.tuning, self.ledger.upgrades(), None);
        }
        self.emit(GameEvent::Cue(Cue::ButtonClick));
        self.emit(GameEvent::UpgradePurchased { id, result });
        self.emit_hud();
        Some(result)
    }

    /// Wipe saved progress
    pub fn request_reset(&mut self) {
        self.ledger.reset();
        if self.phase.shop_open() {
            // Upgrade levels are gone, so the pending round loses their bonuses
            self.run = RunState::start(self.run.round, &self.tuning, self.ledger.upgrades(), None);
        }
        log::info!("Save reset");
        self.emit(GameEvent::SaveReset);
        self.emit(GameEvent::toast("Save cleared", TOAST_LONG_MS));
        self.emit_hud();
    }

    /// Flip mute and persist the preference
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.ledger.save_settings(&self.settings);
        self.emit(GameEvent::MuteChanged(muted));
        muted
    }

    /// Settle the attempt under the claw. Called exactly once per drop.
    pub(crate) fn resolve_grab(&mut self, now_ms: f64) {
        let rect = self.claw.grab_rect(self.run.modifiers.grip_scale);
        if self.settings.debug_grab {
            self.emit(GameEvent::GrabBox { min: rect.min, max: rect.max });
        }

        let target = self
            .field
            .grab_candidate(&rect, self.claw.pos())
            .and_then(|id| self.field.get(id).map(|doll| (id, doll.def)));

        let (outcome, held) = match target {
            Some((id, def)) => {
                let mods = self.run.chance_modifiers(&self.tuning);
                let chance = chance::effective_chance(def, self.run.luck, self.run.danger, &mods);
                let resolution =
                    chance::resolve_shielded(chance, self.roller.as_mut(), &mut self.run.modifiers.shield_charges);
                log::debug!(
                    "Grab {}: chance {:.3} roll {:.3} -> {:?}",
                    def.id,
                    resolution.chance,
                    resolution.roll,
                    resolution.outcome
                );
                self.last_resolution = Some(resolution);
                let held = resolution.outcome.is_catch().then_some(id);
                (AttemptOutcome::Rolled(resolution.outcome), held.map(|id| (id, def)))
            }
            None => {
                log::debug!("Grab missed: nothing under the claw");
                (AttemptOutcome::Missed, None)
            }
        };

        self.run.record_outcome(outcome, &self.tuning, self.ledger.upgrades());
        match (outcome, held) {
            (AttemptOutcome::Rolled(rolled), Some((id, def))) => {
                self.field.hold(id);
                self.claw.begin_grab(now_ms, Some(id));
                self.on_catch(def, rolled == RollOutcome::ShieldSaved);
            }
            (AttemptOutcome::Rolled(_), None) => {
                self.claw.begin_grab(now_ms, None);
                let name = target.map(|(_, def)| def.name).unwrap_or("?");
                self.on_fail(format!("So close: {}", name));
            }
            (AttemptOutcome::Missed, _) => {
                self.claw.begin_grab(now_ms, None);
                self.on_fail("Missed".to_string());
            }
        }
        self.emit_hud();
    }

    fn on_catch(&mut self, def: &'static CollectibleDef, shielded: bool) {
        let receipt = self.ledger.record_catch(def, self.run.win_streak);
        if receipt.is_new {
            self.run.new_ids.insert(def.id);
        }
        self.run.coins_gained += receipt.coins;

        let rarity = def.rarity;
        self.emit(GameEvent::Cue(Cue::Win(rarity)));
        if self.settings.effective_screen_shake() {
            self.emit(GameEvent::Shake(Shake::Win(rarity)));
        }
        let flash = if self.settings.effective_flash() { rarity.flash() } else { 0.0 };
        let pos = self.claw.hold_point();
        self.emit(GameEvent::Celebrate { rarity, magnitude: rarity.sparks(), flash, pos });

        let mut text = format!("GET! [{}] {}", rarity.as_str(), def.name);
        if receipt.is_new {
            text.push_str(" NEW!");
        }
        if shielded {
            text = format!("Slip Shield! {}", text);
        }
        self.emit(GameEvent::toast_colored(text, rarity.color(), TOAST_LONG_MS));
    }

    fn on_fail(&mut self, text: String) {
        // Fails change nothing persistent, but every outcome is written
        self.ledger.commit();
        self.emit(GameEvent::Cue(Cue::Fail));
        if self.settings.effective_screen_shake() {
            self.emit(GameEvent::Shake(Shake::Slip));
        }
        self.emit(GameEvent::toast(text, TOAST_SHORT_MS));
    }

    /// Claw is back at the top: bank the doll, then hand control back,
    /// open a buff choice, or end the round
    pub(crate) fn finish_rise(&mut self) {
        if let Some(id) = self.claw.settle() {
            self.field.remove(id);
            self.field.spawn(&mut self.rng);
        }

        if self.run.is_over() {
            self.end_round();
        } else if self.run.milestone_due(&self.tuning) {
            self.open_buff_choice();
        }
    }

    fn open_buff_choice(&mut self) {
        let offer = self.run.buff_offer(self.tuning.buff_offer_size, &mut self.rng);
        if offer.is_empty() {
            self.run.mark_milestones(&self.tuning);
            return;
        }
        self.phase = GamePhase::BuffChoice { offer: offer.clone() };
        self.emit(GameEvent::BuffOffered(offer));
    }

    fn end_round(&mut self) {
        let report = self.run.report();
        log::info!(
            "Round {} over: {} catches, {} coins, {} new, danger {}",
            report.round,
            report.catches,
            report.coins_gained,
            report.new_species.len(),
            report.final_danger
        );

        let mut offer = BuffId::ALL.to_vec();
        offer.shuffle(&mut self.rng);
        offer.truncate(self.tuning.buff_offer_size);
        self.next_run_offer = offer.clone();
        self.queued_buff = None;

        self.phase = GamePhase::RoundEnd;
        self.emit(GameEvent::Cue(Cue::RoundOver));
        self.emit(GameEvent::RoundEnded(report));
        self.emit(GameEvent::BuffOffered(offer));
        self.emit_hud();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SharedStore};
    use crate::sim::chance::ScriptedRolls;

    fn state() -> GameState {
        GameState::new(7, Persistence::new(MemoryStore::new()), Tuning::default())
    }

    #[test]
    fn test_new_session_waits_for_start() {
        let mut state = state();
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(!state.can_drop());
        assert_eq!(state.field.dolls.len(), Tuning::default().field_size);
        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::Hud(_)]));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_start_round() {
        let mut state = state();
        assert!(state.start_round());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.round, 1);
        assert!(state.can_drop());
        assert!(!state.start_round());
        assert!(!state.request_retry());
    }

    #[test]
    fn test_next_round_only_through_retry() {
        let mut state = state();
        state.start_round();
        state.end_round();
        state.drain_events();

        assert!(!state.start_round());
        assert_eq!(state.phase, GamePhase::RoundEnd);
        assert_eq!(state.run.round, 1);
        assert!(state.drain_events().is_empty());

        assert!(state.request_retry());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.round, 2);
        let events = state.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::Cue(Cue::Retry)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::RoundStarted { round: 2, .. })));
    }

    #[test]
    fn test_button_hover_cue() {
        let mut state = state();
        state.drain_events();
        state.button_hover();
        assert_eq!(state.drain_events(), vec![GameEvent::Cue(Cue::ButtonHover)]);
    }

    #[test]
    fn test_shop_closed_during_play() {
        let mut state = state();
        state.ledger.record_catch(crate::catalog::find("doll-unicorn").unwrap(), 1);
        state.start_round();
        assert_eq!(state.purchase_upgrade(UpgradeId::StartLuck), None);
    }

    #[test]
    fn test_purchase_before_first_round_updates_pending_run() {
        let mut state = state();
        let unicorn = crate::catalog::find("doll-unicorn").unwrap();
        state.ledger.record_catch(unicorn, 1);
        state.ledger.record_catch(unicorn, 2);
        assert_eq!(state.ledger.coins(), 130);
        let result = state.purchase_upgrade(UpgradeId::ExtraTries);
        assert_eq!(result, Some(PurchaseResult::Purchased { level: 1, cost: 80 }));
        assert_eq!(state.hud().attempts_left, Tuning::default().base_attempts + 1);
        assert_eq!(
            state.purchase_upgrade(UpgradeId::ExtraTries),
            Some(PurchaseResult::InsufficientFunds { cost: 160, coins: 50 })
        );
    }

    #[test]
    fn test_choose_buff_rejects_unoffered() {
        let mut state = state();
        state.start_round();
        state.phase = GamePhase::BuffChoice { offer: vec![BuffId::SlowDrop, BuffId::PityBooster] };
        assert!(!state.choose_buff(BuffId::SlipShield));
        assert!(state.choose_buff(BuffId::SlowDrop));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.run.active_buffs.contains(&BuffId::SlowDrop));
        assert!(!state.choose_buff(BuffId::PityBooster));
    }

    #[test]
    fn test_toggle_mute_persists() {
        let shared = SharedStore::new(MemoryStore::new());
        let mut state = GameState::new(1, Persistence::new(shared.clone()), Tuning::default());
        assert!(state.toggle_mute());
        let again = GameState::new(1, Persistence::new(shared), Tuning::default());
        assert!(again.settings.muted);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut state = state();
        state.ledger.record_catch(crate::catalog::find("doll-cat").unwrap(), 1);
        assert_eq!(state.hud().owned, 1);
        state.drain_events();
        state.request_reset();
        assert_eq!(state.hud().owned, 0);
        assert_eq!(state.hud().coins, 0);
        assert!(state.drain_events().contains(&GameEvent::SaveReset));
    }

    fn buy_extra_tries(state: &mut GameState) {
        let unicorn = crate::catalog::find("doll-unicorn").unwrap();
        state.ledger.record_catch(unicorn, 1);
        state.ledger.record_catch(unicorn, 2);
        let result = state.purchase_upgrade(UpgradeId::ExtraTries);
        assert_eq!(result, Some(PurchaseResult::Purchased { level: 1, cost: 80 }));
    }

    #[test]
    fn test_reset_drops_upgrade_bonus_from_pending_round() {
        let base = Tuning::default().base_attempts;
        let mut state = state();
        buy_extra_tries(&mut state);
        assert_eq!(state.hud().attempts_left, base + 1);
        state.drain_events();

        state.request_reset();
        assert_eq!(state.hud().attempts_left, base);
        assert_eq!(state.hud().attempts_per_round, base);
        let last_hud = state.drain_events().into_iter().rev().find_map(|e| match e {
            GameEvent::Hud(hud) => Some(hud),
            _ => None,
        });
        assert_eq!(last_hud.map(|h| h.attempts_left), Some(base));

        assert!(state.start_round());
        assert_eq!(state.run.round, 1);
        assert_eq!(state.hud().attempts_left, base);
    }

    #[test]
    fn test_reset_at_round_end_drops_upgrade_bonus() {
        let base = Tuning::default().base_attempts;
        let mut state = state();
        state.start_round();
        state.end_round();
        buy_extra_tries(&mut state);

        state.request_reset();
        assert_eq!(state.phase, GamePhase::RoundEnd);
        assert_eq!(state.hud().attempts_per_round, base);
        assert!(state.request_retry());
        assert_eq!(state.run.round, 2);
        assert_eq!(state.hud().attempts_left, base);
    }

    #[test]
    fn test_injected_rolls_drive_outcome() {
        let rolls = ScriptedRolls::always(0.0);
        let mut state =
            GameState::with_roller(3, Persistence::new(MemoryStore::new()), Tuning::default(), Box::new(rolls));
        state.start_round();
        let target = state.field.dolls[0].pos;
        state.claw.x = target.x;
        state.claw.y = target.y - 40.0;
        state.run.consume_attempt();
        state.claw.begin_drop();
        state.resolve_grab(0.0);
        assert_eq!(state.last_resolution.map(|r| r.outcome), Some(RollOutcome::Success));
        assert!(state.claw.held.is_some());
        assert_eq!(state.run.catches, 1);
        assert_eq!(state.ledger.record().owned_count(), 1);
    }
}
