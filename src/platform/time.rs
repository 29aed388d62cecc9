//! Wall-clock time and the fixed-step frame clock

use crate::clamp_finite;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Turns variable frame deltas into a count of fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt` seconds and return how many `SIM_DT` steps to run now.
    /// Bad deltas (NaN, negative) count as zero.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.accumulator.is_finite() {
            self.accumulator = 0.0;
        }
        self.accumulator += clamp_finite(dt, 0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Unspent time, in seconds
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
