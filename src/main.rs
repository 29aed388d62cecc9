//! Claw Doll entry point
//!
//! The browser build is driven through `platform::web::ClawMachine`. Natively
//! this runs a headless autoplay session against a save directory:
//!
//! ```text
//! claw-doll [ROUNDS] [SAVE_DIR]
//! ```
//!
//! `CLAW_DOLL_SEED` fixes the seed and `CLAW_DOLL_TUNING` points at a
//! JSON balance override.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use claw_doll::Tuning;
    use claw_doll::consts::SIM_DT;
    use claw_doll::events::GameEvent;
    use claw_doll::persistence::{KvStore, MemoryStore, Persistence};
    use claw_doll::platform::storage::FileStore;
    use claw_doll::platform::time;
    use claw_doll::sim::{GamePhase, GameState, TickInput, tick};
    use claw_doll::upgrades::{PurchaseResult, UpgradeId};

    /// Give up on a round after this many ticks (10 simulated minutes)
    const MAX_ROUND_TICKS: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let rounds: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
    let save_dir = args.next().unwrap_or_else(|| ".claw-doll".to_string());
    let seed = std::env::var("CLAW_DOLL_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| time::now_ms() as u64);
    let tuning = match std::env::var("CLAW_DOLL_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(err) => {
                log::warn!("Could not read tuning file {}: {}", path, err);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let store: Box<dyn KvStore> = match FileStore::open(&save_dir) {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("Save directory {} unusable ({}), playing without saving", save_dir, err);
            Box::new(MemoryStore::new())
        }
    };

    log::info!("Claw Doll (native) starting: {} rounds, seed {}, saves in {}", rounds, seed, save_dir);
    let mut state = GameState::new(seed, Persistence::from_boxed(store), tuning);
    let mut clock = time::now_ms();

    for _ in 0..rounds {
        // Shop: buy whatever is affordable, cheapest first
        let mut bought = true;
        while bought {
            bought = false;
            let mut ids = UpgradeId::ALL;
            ids.sort_by_key(|id| state.ledger.upgrades().next_cost(*id).unwrap_or(u32::MAX));
            for id in ids {
                if let Some(PurchaseResult::Purchased { .. }) = state.purchase_upgrade(id) {
                    bought = true;
                }
            }
        }
        if let Some(&buff) = state.next_run_offer.first() {
            state.choose_buff(buff);
        }

        if state.phase == GamePhase::RoundEnd {
            state.request_retry();
        } else {
            state.start_round();
        }

        let input = TickInput { autoplay: true, ..Default::default() };
        let mut ticks = 0;
        while state.phase != GamePhase::RoundEnd && ticks < MAX_ROUND_TICKS {
            clock += f64::from(SIM_DT) * 1000.0;
            tick(&mut state, &TickInput { now_ms: clock, ..input.clone() }, SIM_DT);
            ticks += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::Toast { text, .. } => log::info!("{}", text),
                    GameEvent::RoundEnded(report) => {
                        println!(
                            "Round {}: {} catches, +{} coins, danger {}, new: [{}]",
                            report.round,
                            report.catches,
                            report.coins_gained,
                            report.final_danger,
                            report.new_species.join(", ")
                        );
                    }
                    _ => {}
                }
            }
        }
        if ticks >= MAX_ROUND_TICKS {
            log::warn!("Round {} did not finish, stopping", state.run.round);
            break;
        }
    }

    let hud = state.hud();
    println!("\nCollection {}/{}  coins {}  best streak {}", hud.owned, hud.total, hud.coins, hud.best_streak);
    for entry in state.ledger.collection() {
        let mark = if entry.owned { "*" } else { " " };
        println!(" {} [{:>3}] {:<10} x{}", mark, entry.def.rarity.as_str(), entry.def.name, entry.count);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
