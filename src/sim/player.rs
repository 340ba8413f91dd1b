//! The player character
//!
//! `pos` is the sprite anchor (the centre of the animation frame) in world
//! units. The hitbox is a fixed rectangle inside that frame.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Face, collide_rects, collide_world, struck_face};
use super::goo::{Goo, GooEvent, SplatOrientation};
use super::grid::{TileGrid, TileKind};
use crate::audio::{AudioCue, SoundEffect};
use crate::consts::{PLAYER_FRAME_HEIGHT, PLAYER_FRAME_WIDTH, PLAYER_HITBOX, TILE_SIZE};
use crate::tuning::Tuning;

/// Top-level behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Walking, idling, jumping and shooting
    #[default]
    Normal,
    /// Landed in lava; tumbling off screen until respawn
    Dead,
    /// Reached the princess; waiting for the next level
    Finished,
}

/// What the player is doing, as one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Walking,
    Shooting,
    Dead,
    Finished,
}

/// Animation frame, laid out on a 2-column by 5-row sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerFrame {
    /// Airborne or idle pose
    Stand,
    /// Shooting while airborne
    Shoot,
    /// Shooting while on the ground
    WalkShoot,
    Walk1,
    Walk2,
}

impl PlayerFrame {
    /// Cell on the sprite sheet, counted from the first cell
    pub fn sheet_index(self) -> u32 {
        match self {
            PlayerFrame::Shoot => 0,
            PlayerFrame::Stand => 2,
            PlayerFrame::WalkShoot => 6,
            PlayerFrame::Walk2 => 8,
            PlayerFrame::Walk1 => 9,
        }
    }
}

/// What the tile pass decided this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileContacts {
    /// Landed on top of a hazard
    pub died: bool,
    /// Touched the goal from any side
    pub finished: bool,
}

/// Orientations a bounce applies: the current splat, plus the first splat
/// touched since the player was last grounded unless the two face exactly
/// opposite ways. Touching two opposing splats at once therefore never
/// stacks both pushes onto the same tick.
pub fn bounce_orientations(
    first: SplatOrientation,
    current: SplatOrientation,
) -> impl Iterator<Item = SplatOrientation> {
    std::iter::once(current).chain((!current.is_opposite(first)).then_some(first))
}

/// Launch away from a splat: off floors upwards, off ceilings downwards,
/// off walls sideways. Only the axis the splat faces is overwritten.
pub fn apply_bounce(vel: &mut Vec2, orientation: SplatOrientation, bounce_height: f32) {
    match orientation {
        SplatOrientation::Ceiling => vel.y = -bounce_height,
        SplatOrientation::LeftWall => vel.x = -bounce_height,
        SplatOrientation::RightWall => vel.x = bounce_height,
        SplatOrientation::Floor => vel.y = bounce_height,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: PlayerState,
    pub frame: PlayerFrame,
    /// Sprite rotation in degrees
    pub rotation: f32,
    /// Mirror the sprite horizontally (aiming left)
    pub flip_x: bool,
    /// Rested on a solid top face during the last tile pass
    pub walking: bool,
    pub projectiles: Vec<Goo>,
    /// Orientation of the first splat touched since last grounded
    pub bounce_first: Option<SplatOrientation>,
    shooting: bool,
    shoot_time: f32,
    walk_frame_time: f32,
}

impl Player {
    /// Anchor position for a fresh player on `grid`.
    ///
    /// The anchor sits at the top of the spawn cell, centred horizontally;
    /// without a spawn tile it falls back to one tile in from the corner.
    pub fn spawn_point(grid: &TileGrid) -> Vec2 {
        match grid.spawn_index() {
            Some(index) => {
                let (col, row) = grid.col_row(index);
                Vec2::new(
                    col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                    (row + 1) as f32 * TILE_SIZE,
                )
            }
            None => Vec2::splat(TILE_SIZE),
        }
    }

    pub fn spawn(grid: &TileGrid) -> Self {
        Self::at(Self::spawn_point(grid))
    }

    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            state: PlayerState::Normal,
            frame: PlayerFrame::Walk2,
            rotation: 0.0,
            flip_x: false,
            walking: false,
            projectiles: Vec::new(),
            bounce_first: None,
            shooting: false,
            shoot_time: 0.0,
            walk_frame_time: 0.0,
        }
    }

    #[inline]
    fn anchor() -> Vec2 {
        Vec2::new(PLAYER_FRAME_WIDTH / 2.0, PLAYER_FRAME_HEIGHT / 2.0)
    }

    /// Anchor position relative to the hitbox's bottom-left corner
    #[inline]
    fn hitbox_offset() -> Vec2 {
        Self::anchor() - Vec2::new(PLAYER_HITBOX[0], PLAYER_HITBOX[1])
    }

    /// Hitbox with the anchor at `pos`
    pub fn hitbox_at(pos: Vec2) -> Aabb {
        let [x1, y1, x2, y2] = PLAYER_HITBOX;
        let corner = pos - Self::anchor();
        Aabb::new(corner.x + x1, corner.y + y1, x2 - x1, y2 - y1)
    }

    #[inline]
    pub fn hitbox(&self) -> Aabb {
        Self::hitbox_at(self.pos)
    }

    #[inline]
    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn activity(&self) -> Activity {
        match self.state {
            PlayerState::Dead => Activity::Dead,
            PlayerState::Finished => Activity::Finished,
            PlayerState::Normal if self.shooting => Activity::Shooting,
            PlayerState::Normal if self.walking => Activity::Walking,
            PlayerState::Normal => Activity::Idle,
        }
    }

    /// Projectiles still in play
    pub fn live_projectiles(&self) -> usize {
        self.projectiles.len()
    }

    /// Fraction of the magazine left, for the ammo bar
    pub fn ammo_fraction(&self, max_goo: u32) -> f32 {
        if max_goo == 0 {
            return 0.0;
        }
        max_goo.saturating_sub(self.projectiles.len() as u32) as f32 / max_goo as f32
    }

    /// Fire a goo towards `target`, given in the same screen space as `screen_pos`.
    ///
    /// Speed scales with the distance to the target. Returns false when the
    /// player cannot shoot or the magazine is empty.
    pub fn shoot(&mut self, target: Vec2, screen_pos: Vec2, max_goo: u32) -> bool {
        if self.state != PlayerState::Normal {
            return false;
        }
        if self.projectiles.len() >= max_goo as usize {
            return false;
        }

        self.projectiles.push(Goo::new(self.pos, target - screen_pos));
        self.shooting = true;
        true
    }

    /// Shape horizontal velocity from input (`dir` is -1, 0 or 1)
    pub fn steer(&mut self, dir: f32, tuning: &Tuning, dt: f32) {
        let walk = tuning.walk_speed;

        if self.walking {
            if dir < 0.0 {
                self.vel.x = -walk;
            } else if dir > 0.0 {
                self.vel.x = walk;
            } else if self.vel.x > 1.0 {
                self.vel.x -= walk * tuning.walk_damping;
            } else if self.vel.x < -1.0 {
                self.vel.x += walk * tuning.walk_damping;
            } else {
                self.vel.x = 0.0;
            }
        } else if dir < 0.0 {
            if self.vel.x > -walk {
                self.vel.x = (self.vel.x - walk * tuning.air_accel * dt).max(-walk);
            }
        } else if dir > 0.0 && self.vel.x < walk {
            self.vel.x = (self.vel.x + walk * tuning.air_accel * dt).min(walk);
        }
    }

    /// Integrate position and resolve tile collisions.
    ///
    /// Every overlapped tile gets its own directional correction in grid
    /// order; later corrections overwrite earlier ones on the same axis.
    pub fn integrate(&mut self, grid: &TileGrid, tuning: &Tuning, dt: f32) -> TileContacts {
        let prev = self.hitbox();
        let half_width = Self::anchor().x;

        self.pos.x += self.vel.x * dt;
        if self.pos.x < half_width {
            self.pos.x = half_width;
            self.vel.x = 0.0;
        }
        let right_limit = grid.world_width() - half_width;
        if self.pos.x > right_limit {
            self.pos.x = right_limit;
            self.vel.x = 0.0;
        }

        self.vel.y += tuning.gravity * dt;
        self.pos.y += self.vel.y * dt;

        self.walking = false;
        let mut contacts = TileContacts::default();

        for index in collide_world(grid, &self.hitbox()) {
            let kind = grid.tile_at(index).kind();
            if kind == TileKind::Goal {
                contacts.finished = true;
            }

            let center = grid.tile_center(index);
            let Some(face) = struck_face(center, &prev, self.vel, &grid.neighbors(index)) else {
                continue;
            };

            let snapped = face.snap(self.hitbox(), center).min + Self::hitbox_offset();
            if face.is_vertical() {
                self.pos.y = snapped.y;
            } else {
                self.pos.x = snapped.x;
            }
            match face {
                Face::Top => {
                    self.vel.y = 0.0;
                    self.walking = true;
                    if kind == TileKind::Hazard {
                        contacts.died = true;
                    }
                }
                Face::Bottom => self.vel.y = 0.0,
                Face::Left | Face::Right => self.vel.x = 0.0,
            }
        }

        contacts
    }

    /// Pick the animation frame for this tick
    pub fn animate(&mut self, tuning: &Tuning, dt: f32) {
        if self.shooting {
            self.shoot_time += dt;
            self.frame = if self.walking {
                PlayerFrame::WalkShoot
            } else {
                PlayerFrame::Shoot
            };

            if self.shoot_time >= tuning.shoot_pose_secs {
                self.shoot_time = 0.0;
                self.shooting = false;
                self.frame = if self.walking {
                    PlayerFrame::Walk2
                } else {
                    PlayerFrame::Stand
                };
            }
        } else if self.walking {
            if !matches!(self.frame, PlayerFrame::Walk1 | PlayerFrame::Walk2) {
                self.frame = PlayerFrame::Walk1;
            }

            self.walk_frame_time += dt;
            if self.walk_frame_time >= tuning.walk_frame_secs {
                self.frame = if self.frame == PlayerFrame::Walk1 {
                    PlayerFrame::Walk2
                } else {
                    PlayerFrame::Walk1
                };
                self.walk_frame_time = 0.0;
            }
        } else {
            self.frame = PlayerFrame::Stand;
        }

        if self.walking {
            self.bounce_first = None;
        }
    }

    /// Switch to `Dead`, flung away at a random velocity
    pub fn die<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) {
        let walk = tuning.walk_speed.abs();
        self.vel.x = rng.random_range(-walk..=walk);
        self.vel.y = rng.random_range(walk..=walk * 2.0);
        self.frame = PlayerFrame::Walk1;
        self.state = PlayerState::Dead;
    }

    pub fn finish(&mut self) {
        self.frame = PlayerFrame::Walk1;
        self.state = PlayerState::Finished;
    }

    /// Ballistic tumble while dead; no collisions
    pub fn fall_dead(&mut self, tuning: &Tuning, dt: f32) {
        self.vel.y += tuning.gravity * dt;
        self.pos += self.vel * dt;
        self.spin(tuning, dt);
    }

    pub fn spin(&mut self, tuning: &Tuning, dt: f32) {
        self.rotation = (self.rotation + tuning.spin_rate * dt) % 360.0;
    }

    /// Advance every projectile and, when `bounce` is set, launch the player
    /// off any visible splat it overlaps. Queues splat and bounce sounds.
    pub fn update_projectiles(
        &mut self,
        grid: &TileGrid,
        tuning: &Tuning,
        dt: f32,
        bounce: bool,
        cues: &mut Vec<AudioCue>,
    ) {
        let hitbox = self.hitbox();
        let mut bounced = false;

        for goo in &mut self.projectiles {
            if let Some(GooEvent::Splatted(_)) = goo.update(grid, tuning, dt) {
                cues.push(AudioCue::Sound(SoundEffect::Splat));
            }

            if !bounce || !goo.is_visible() {
                continue;
            }
            let (Some(orientation), Some(splat)) = (goo.orientation(), goo.hitbox()) else {
                continue;
            };
            if !collide_rects(&hitbox, &splat) {
                continue;
            }

            let first = *self.bounce_first.get_or_insert(orientation);
            for o in bounce_orientations(first, orientation) {
                apply_bounce(&mut self.vel, o, tuning.bounce_height);
            }
            bounced = true;
        }

        if bounced {
            log::debug!("Bounce, velocity now {:?}", self.vel);
            cues.push(AudioCue::Sound(SoundEffect::Bounce));
        }
    }
}
