//! Fixed timestep simulation tick
//!
//! Advances the field drift and the claw state machine by one step.

use super::claw::{self, ClawPhase};
use super::state::{GamePhase, GameState};
use crate::events::{Cue, GameEvent};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// -1 left, 0 none, 1 right
    pub move_dir: i8,
    /// Drop request (ignored unless the claw is idle and attempts remain)
    pub drop: bool,
    /// Wall clock in ms, for the grab hold
    pub now_ms: f64,
    /// Demo mode - a bot steers, drops and picks buffs
    pub autoplay: bool,
}

/// Steering slack (px) before the bot drops
const AUTOPLAY_SLACK: f32 = 4.0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Dolls keep drifting behind every overlay
    let drift = state.tuning.drift_multiplier(state.run.danger);
    state.field.update(dt, drift, &mut state.rng);

    let mut input = input.clone();
    if input.autoplay {
        autopilot(state, &mut input);
    }

    if state.phase != GamePhase::Playing {
        state.last_move_dir = 0;
        return;
    }

    let mods = state.run.modifiers;
    match state.claw.phase {
        ClawPhase::Idle => {
            if input.move_dir != 0 && state.last_move_dir == 0 {
                state.emit(GameEvent::Cue(Cue::Move));
            }
            state.last_move_dir = input.move_dir;
            state.claw.steer(input.move_dir, state.tuning.move_speed * mods.move_speed_mult, dt);

            // Attempts are spent when the drop starts, not when it resolves
            if input.drop && state.can_drop() && state.run.consume_attempt() {
                state.claw.begin_drop();
                state.emit(GameEvent::Cue(Cue::Drop));
                state.emit_hud();
            }
        }
        ClawPhase::Dropping => {
            let bottom = state.claw.descend(state.tuning.drop_speed * mods.drop_speed_mult, dt);
            let grab = state.claw.grab_rect(mods.grip_scale);
            let touching = state.field.grab_candidate(&grab, state.claw.pos()).is_some();
            if touching || bottom {
                state.resolve_grab(input.now_ms);
            }
        }
        ClawPhase::Grabbing { .. } => {
            if state.claw.hold_done(input.now_ms, state.tuning.grab_hold_ms) {
                state.claw.begin_rise();
                state.emit(GameEvent::Cue(Cue::Clack));
            }
        }
        ClawPhase::Rising => {
            let top = state.claw.ascend(state.tuning.rise_speed * mods.rise_speed_mult, dt);
            if let Some(id) = state.claw.held {
                let hold = state.claw.hold_point();
                if let Some(doll) = state.field.get_mut(id) {
                    doll.pos = hold;
                }
            }
            if top {
                state.finish_rise();
            }
        }
    }

    state.claw.clamp_x();
}

/// Idle/demo mode: aim at the nearest free doll and drop when lined up
fn autopilot(state: &mut GameState, input: &mut TickInput) {
    if let GamePhase::BuffChoice { offer } = &state.phase {
        if let Some(&first) = offer.first() {
            state.choose_buff(first);
        }
        return;
    }
    if !state.can_drop() {
        return;
    }

    let (lo, hi) = claw::x_bounds();
    let claw_x = state.claw.x;
    let target = state
        .field
        .dolls
        .iter()
        .filter(|d| !d.held)
        .map(|d| d.pos.x.clamp(lo, hi))
        .min_by(|a, b| {
            (a - claw_x)
                .abs()
                .partial_cmp(&(b - claw_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target_x) = target else {
        input.drop = true;
        return;
    };
    let dx = target_x - claw_x;
    if dx.abs() <= AUTOPLAY_SLACK {
        input.move_dir = 0;
        input.drop = true;
    } else {
        input.move_dir = if dx > 0.0 { 1 } else { -1 };
        input.drop = false;
    }
}
