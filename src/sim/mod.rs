//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (grab rolls through an injectable [`RollSource`])
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; the wall clock comes in as input

pub mod chance;
pub mod claw;
pub mod field;
pub mod round;
pub mod state;
pub mod tick;

pub use chance::{ChanceModifiers, Resolution, RollOutcome, RollSource, ScriptedRolls, effective_chance, resolve};
pub use claw::{Claw, ClawPhase};
pub use field::{Doll, Field, Rect};
pub use round::{AttemptOutcome, RunState};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
