//! The play field: dolls drifting inside the cabinet

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::catalog::{CollectibleDef, DOLLS};
use crate::consts::*;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x && self.min.y <= other.max.y && self.max.y >= other.min.y
    }
}

/// A doll instance on the field
#[derive(Debug, Clone, Serialize)]
pub struct Doll {
    pub id: u32,
    pub def: &'static CollectibleDef,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Pinned to the claw
    pub held: bool,
}

impl Doll {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(DOLL_HALF_EXTENT))
    }
}

/// All dolls in the cabinet (sorted by id)
#[derive(Debug, Clone, Default)]
pub struct Field {
    pub dolls: Vec<Doll>,
    next_id: u32,
}

impl Field {
    /// A field with `count` random dolls
    pub fn populate(count: usize, rng: &mut Pcg32) -> Self {
        let mut field = Self { dolls: Vec::with_capacity(count), next_id: 1 };
        for _ in 0..count {
            field.spawn(rng);
        }
        field
    }

    /// Add one random doll somewhere in the lower box
    pub fn spawn(&mut self, rng: &mut Pcg32) -> u32 {
        let def = DOLLS.choose(rng).unwrap_or(&DOLLS[0]);
        let pos = Vec2::new(
            rng.random_range(BOX_X + 40.0..=BOX_X + BOX_W - 40.0),
            rng.random_range(BOX_Y + 60.0..=BOX_Y + BOX_H - 40.0),
        );
        let vel = Vec2::new(rng.random_range(-40.0..=40.0), rng.random_range(-25.0..=25.0));
        self.place(def, pos, vel)
    }

    /// Put a specific doll at a specific spot
    pub fn place(&mut self, def: &'static CollectibleDef, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.dolls.push(Doll { id, def, pos, vel, held: false });
        id
    }

    pub fn clear(&mut self) {
        self.dolls.clear();
    }

    pub fn get(&self, id: u32) -> Option<&Doll> {
        self.dolls.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Doll> {
        self.dolls.iter_mut().find(|d| d.id == id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Doll> {
        let idx = self.dolls.iter().position(|d| d.id == id)?;
        Some(self.dolls.remove(idx))
    }

    /// Drift every free doll, bouncing softly off the inner margin
    pub fn update(&mut self, dt: f32, drift: f32, rng: &mut Pcg32) {
        let left = BOX_X + DOLL_BOUNCE_MARGIN;
        let right = BOX_X + BOX_W - DOLL_BOUNCE_MARGIN;
        let top = BOX_Y + DOLL_BOUNCE_MARGIN;
        let bottom = BOX_Y + BOX_H - DOLL_BOUNCE_MARGIN;

        for doll in self.dolls.iter_mut().filter(|d| !d.held) {
            if doll.pos.x < left {
                doll.pos.x = left;
                doll.vel.x = doll.vel.x.abs();
            } else if doll.pos.x > right {
                doll.pos.x = right;
                doll.vel.x = -doll.vel.x.abs();
            }
            if doll.pos.y < top {
                doll.pos.y = top;
                doll.vel.y = doll.vel.y.abs();
            } else if doll.pos.y > bottom {
                doll.pos.y = bottom;
                doll.vel.y = -doll.vel.y.abs();
            }

            // Mild jitter keeps motion alive
            doll.vel.x += rng.random_range(-DOLL_JITTER..=DOLL_JITTER) * dt;
            doll.vel.y += rng.random_range(-DOLL_JITTER..=DOLL_JITTER) * dt;
            doll.vel.x = doll.vel.x.clamp(-DOLL_MAX_VX, DOLL_MAX_VX);
            doll.vel.y = doll.vel.y.clamp(-DOLL_MAX_VY, DOLL_MAX_VY);

            doll.pos += doll.vel * dt * drift;
        }
    }

    /// Nearest free doll whose bounds touch `grab`
    pub fn grab_candidate(&self, grab: &Rect, claw: Vec2) -> Option<u32> {
        self.dolls
            .iter()
            .filter(|d| !d.held && d.bounds().intersects(grab))
            .min_by(|a, b| {
                a.pos
                    .distance_squared(claw)
                    .partial_cmp(&b.pos.distance_squared(claw))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|d| d.id)
    }

    /// Pin a doll to the claw
    pub fn hold(&mut self, id: u32) {
        if let Some(doll) = self.get_mut(id) {
            doll.held = true;
            doll.vel = Vec2::ZERO;
        }
    }
}
