//! Goo projectile: flight, impact, splat
//!
//! A goo flies under half gravity until its probe touches a solid tile.
//! Hazard and goal tiles swallow it; anything else turns it into a splat
//! stuck to the face it hit. Splats never move again and act as bounce pads.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Face, collide_world, struck_face};
use super::grid::{TileGrid, TileKind};
use crate::consts::{GOO_FRAMES, GOO_PROBE_SIZE, SPLAT_HEIGHT, SPLAT_WIDTH};
use crate::tuning::Tuning;

/// Which way a splat faces, stored as the sprite rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplatOrientation {
    /// Resting on top of a tile (0°)
    Floor,
    /// Hanging under a tile, drawn flipped (180°)
    Ceiling,
    /// Stuck to a tile's left side (-90°)
    LeftWall,
    /// Stuck to a tile's right side (90°)
    RightWall,
}

impl SplatOrientation {
    pub fn from_face(face: Face) -> Self {
        match face {
            Face::Top => SplatOrientation::Floor,
            Face::Bottom => SplatOrientation::Ceiling,
            Face::Left => SplatOrientation::LeftWall,
            Face::Right => SplatOrientation::RightWall,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            SplatOrientation::Floor => 0,
            SplatOrientation::Ceiling => 180,
            SplatOrientation::LeftWall => -90,
            SplatOrientation::RightWall => 90,
        }
    }

    /// Exactly 180° apart on the signed angles.
    ///
    /// Note that `Ceiling` (180) and `LeftWall` (-90) differ by 270 and so
    /// are not opposite.
    pub fn is_opposite(self, other: SplatOrientation) -> bool {
        (self.degrees() - other.degrees()).abs() == 180
    }
}

/// Lifecycle of a goo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GooPhase {
    Flying,
    Splatted(SplatOrientation),
    /// Fell into lava or reached the princess; no longer in play
    Removed,
}

/// Something the caller should react to (sounds, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GooEvent {
    Splatted(SplatOrientation),
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goo {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: GooPhase,
    /// Current frame of the flying loop
    pub frame: u32,
    anim_time: f32,
}

impl Goo {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            phase: GooPhase::Flying,
            frame: 0,
            anim_time: 0.0,
        }
    }

    #[inline]
    pub fn is_splat(&self) -> bool {
        matches!(self.phase, GooPhase::Splatted(_))
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.phase != GooPhase::Removed
    }

    pub fn orientation(&self) -> Option<SplatOrientation> {
        match self.phase {
            GooPhase::Splatted(o) => Some(o),
            _ => None,
        }
    }

    /// Sprite rotation in degrees (0 while flying)
    pub fn rotation(&self) -> f32 {
        self.orientation().map_or(0.0, |o| o.degrees() as f32)
    }

    /// Probe used against the tile grid while flying
    fn probe(pos: Vec2) -> Aabb {
        Aabb::centered(pos, Vec2::splat(GOO_PROBE_SIZE))
    }

    /// Bounce surface of a visible splat, rotated onto the face it stuck to
    pub fn hitbox(&self) -> Option<Aabb> {
        let GooPhase::Splatted(orientation) = self.phase else {
            return None;
        };
        let Vec2 { x, y } = self.pos;
        let (w, h) = (SPLAT_WIDTH, SPLAT_HEIGHT);
        Some(match orientation {
            SplatOrientation::Floor => Aabb::new(x - w / 2.0, y, w, h),
            SplatOrientation::Ceiling => Aabb::new(x - w / 2.0, y - h, w, h),
            SplatOrientation::LeftWall => Aabb::new(x - h, y - w / 2.0, h, w),
            SplatOrientation::RightWall => Aabb::new(x, y - w / 2.0, h, w),
        })
    }

    /// Advance one frame. Splatted and removed goo do not move.
    pub fn update(&mut self, grid: &TileGrid, tuning: &Tuning, dt: f32) -> Option<GooEvent> {
        if self.phase != GooPhase::Flying {
            return None;
        }

        let prev = Self::probe(self.pos);
        self.pos += self.vel * dt;
        self.vel.y += tuning.goo_gravity() * dt;

        self.anim_time += dt;
        if self.anim_time >= tuning.goo_frame_secs {
            self.frame += (self.anim_time / tuning.goo_frame_secs) as u32;
            self.frame %= GOO_FRAMES;
            self.anim_time %= tuning.goo_frame_secs;
        }

        let &first = collide_world(grid, &Self::probe(self.pos)).first()?;

        if matches!(grid.tile_at(first).kind(), TileKind::Hazard | TileKind::Goal) {
            self.phase = GooPhase::Removed;
            log::debug!("Goo swallowed by tile {}", first);
            return Some(GooEvent::Removed);
        }

        let center = grid.tile_center(first);
        let face = struck_face(center, &prev, self.vel, &grid.neighbors(first));
        if let Some(face) = face {
            self.pos = face.snap(Aabb::new(self.pos.x, self.pos.y, 0.0, 0.0), center).min;
        }

        let orientation = face.map_or(SplatOrientation::Floor, SplatOrientation::from_face);
        self.phase = GooPhase::Splatted(orientation);
        self.vel = Vec2::ZERO;
        log::debug!("Goo splatted on tile {} facing {:?}", first, orientation);
        Some(GooEvent::Splatted(orientation))
    }
}
