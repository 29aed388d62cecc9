//! Claw state machine
//!
//! Idle -> Dropping -> Grabbing -> Rising -> Idle. The claw only knows
//! where it is and which phase it is in; deciding what a grab yields is
//! the tick loop's job.

use glam::Vec2;
use serde::Serialize;

use super::field::Rect;
use crate::consts::*;

/// Current phase of the claw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ClawPhase {
    /// Player may steer and drop
    Idle,
    /// Descending, looking for a doll
    Dropping,
    /// Arms closing; wall-clock hold started at `since_ms`
    Grabbing { since_ms: f64 },
    /// Ascending back to the top
    Rising,
}

/// The claw
#[derive(Debug, Clone, Serialize)]
pub struct Claw {
    pub x: f32,
    pub y: f32,
    pub phase: ClawPhase,
    /// Field id of the doll in the arms
    pub held: Option<u32>,
}

impl Default for Claw {
    fn default() -> Self {
        Self {
            x: BOX_X + BOX_W / 2.0,
            y: CLAW_TOP_Y,
            phase: ClawPhase::Idle,
            held: None,
        }
    }
}

/// Horizontal travel limits
pub fn x_bounds() -> (f32, f32) {
    (BOX_X + CLAW_MARGIN, BOX_X + BOX_W - CLAW_MARGIN)
}

impl Claw {
    pub fn is_idle(&self) -> bool {
        self.phase == ClawPhase::Idle
    }

    /// Keep x inside the box margin (applied every tick, every phase)
    pub fn clamp_x(&mut self) {
        let (lo, hi) = x_bounds();
        self.x = self.x.clamp(lo, hi);
    }

    /// Sideways movement; ignored unless idle
    pub fn steer(&mut self, dir: i8, speed: f32, dt: f32) {
        if self.is_idle() {
            self.x += dir.signum() as f32 * speed * dt;
        }
        self.clamp_x();
    }

    /// Start a drop. Returns false unless idle.
    pub fn begin_drop(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = ClawPhase::Dropping;
        self.held = None;
        true
    }

    /// Move down; true once max depth is reached
    pub fn descend(&mut self, speed: f32, dt: f32) -> bool {
        self.y = (self.y + speed * dt).min(CLAW_MAX_Y);
        self.y >= CLAW_MAX_Y
    }

    /// Close the arms, holding `held` if anything was caught
    pub fn begin_grab(&mut self, now_ms: f64, held: Option<u32>) {
        self.phase = ClawPhase::Grabbing { since_ms: now_ms };
        self.held = held;
    }

    /// Whether the wall-clock hold has elapsed
    pub fn hold_done(&self, now_ms: f64, hold_ms: f64) -> bool {
        match self.phase {
            ClawPhase::Grabbing { since_ms } => now_ms - since_ms >= hold_ms,
            _ => false,
        }
    }

    pub fn begin_rise(&mut self) {
        self.phase = ClawPhase::Rising;
    }

    /// Move up; true once back at the top
    pub fn ascend(&mut self, speed: f32, dt: f32) -> bool {
        self.y = (self.y - speed * dt).max(CLAW_TOP_Y);
        self.y <= CLAW_TOP_Y
    }

    /// Back to idle at the top, arms empty. Returns what was held.
    pub fn settle(&mut self) -> Option<u32> {
        self.y = CLAW_TOP_Y;
        self.phase = ClawPhase::Idle;
        self.held.take()
    }

    /// Grab box under the claw body
    pub fn grab_rect(&self, grip_scale: f32) -> Rect {
        let w = GRAB_W * grip_scale;
        let h = GRAB_H * grip_scale;
        let top = self.y + GRAB_OFFSET_Y;
        Rect {
            min: Vec2::new(self.x - w / 2.0, top),
            max: Vec2::new(self.x + w / 2.0, top + h),
        }
    }

    /// Where a held doll hangs
    pub fn hold_point(&self) -> Vec2 {
        Vec2::new(self.x, self.y + HOLD_OFFSET_Y)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
