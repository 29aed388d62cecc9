//! Player preferences
//!
//! Persisted separately from the save record. Purely cosmetic: nothing
//! here reaches the grab odds.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// All cues silenced
    pub muted: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Feel ===
    /// Camera shake on catches and slips
    pub screen_shake: bool,
    /// Vibrate on catches (mobile)
    pub haptics: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flash)
    pub reduced_motion: bool,

    // === Debug ===
    /// Report the grab box on every resolution
    pub debug_grab: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            sfx_volume: 0.8,
            screen_shake: true,
            haptics: true,
            reduced_motion: false,
            debug_grab: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective full-screen flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective volume, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume.clamp(0.0, 1.0) }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }
}
