//! wasm-bindgen bridge
//!
//! The page owns the canvas, audio and DOM. It forwards player intents to
//! a [`ClawMachine`], calls `tick` every animation frame, then drains the
//! queued events as JSON and reacts to them.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::storage::LocalStorage;
use super::time::FrameClock;
use crate::buffs::BuffId;
use crate::consts::SIM_DT;
use crate::persistence::{KvStore, MemoryStore, Persistence};
use crate::sim::{Claw, Doll, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::upgrades::UpgradeId;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Claw Doll starting...");
}

/// What the page needs to draw a frame
#[derive(Serialize)]
struct Scene<'a> {
    phase: &'a GamePhase,
    claw: &'a Claw,
    dolls: &'a [Doll],
    debug_grab: bool,
}

fn to_json(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("JSON encode failed: {}", err);
        "null".to_string()
    })
}

/// One game session driven from JavaScript
#[wasm_bindgen]
pub struct ClawMachine {
    state: GameState,
    input: TickInput,
    clock: FrameClock,
}

#[wasm_bindgen]
impl ClawMachine {
    /// `tuning_json` may be empty for the built-in balance
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: &str) -> ClawMachine {
        let store: Box<dyn KvStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(err) => {
                log::warn!("localStorage unavailable ({}), progress will not persist", err);
                Box::new(MemoryStore::new())
            }
        };
        let tuning = if tuning_json.trim().is_empty() { Tuning::default() } else { Tuning::from_json(tuning_json) };
        ClawMachine {
            state: GameState::new(seed as u64, Persistence::from_boxed(store), tuning),
            input: TickInput::default(),
            clock: FrameClock::new(),
        }
    }

    /// Run fixed simulation steps for `dt` seconds of frame time
    pub fn tick(&mut self, dt: f32, now_ms: f64) {
        self.input.now_ms = now_ms;
        for _ in 0..self.clock.advance(dt) {
            tick(&mut self.state, &self.input, SIM_DT);

            // One-shot inputs
            self.input.drop = false;
        }
    }

    pub fn set_move_direction(&mut self, dir: i8) {
        self.input.move_dir = dir.signum();
    }

    pub fn request_drop(&mut self) {
        self.input.drop = true;
    }

    pub fn set_autoplay(&mut self, on: bool) {
        self.input.autoplay = on;
    }

    pub fn start_round(&mut self) -> bool {
        self.state.start_round()
    }

    pub fn request_retry(&mut self) -> bool {
        self.state.request_retry()
    }

    pub fn request_reset(&mut self) {
        self.state.request_reset();
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.state.toggle_mute()
    }

    pub fn button_hover(&mut self) {
        self.state.button_hover();
    }

    pub fn set_debug_grab(&mut self, on: bool) {
        self.state.settings.debug_grab = on;
        self.state.ledger.save_settings(&self.state.settings);
    }

    /// Unknown keys are ignored
    pub fn choose_buff(&mut self, key: &str) -> bool {
        BuffId::from_key(key).is_some_and(|id| self.state.choose_buff(id))
    }

    /// JSON `PurchaseResult`, or `null` when the shop is closed or the key is unknown
    pub fn purchase_upgrade(&mut self, key: &str) -> String {
        let result = UpgradeId::from_key(key).and_then(|id| self.state.purchase_upgrade(id));
        to_json(&result)
    }

    pub fn hud_json(&self) -> String {
        to_json(&self.state.hud())
    }

    pub fn drain_events_json(&mut self) -> String {
        to_json(&self.state.drain_events())
    }

    pub fn collection_json(&self) -> String {
        to_json(&self.state.ledger.collection())
    }

    pub fn settings_json(&self) -> String {
        to_json(&self.state.settings)
    }

    pub fn scene_json(&self) -> String {
        to_json(&Scene {
            phase: &self.state.phase,
            claw: &self.state.claw,
            dolls: &self.state.field.dolls,
            debug_grab: self.state.settings.debug_grab,
        })
    }
}
