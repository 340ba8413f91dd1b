//! Blank Page - a tile-based side-scroller with sticky goo
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (tile grid, collisions, goo, player)
//! - `level`: Level file format, validation and level progression
//! - `renderer`: Drawable view of the simulation for an external presentation layer
//! - `audio`: Fire-and-forget sound/music seam
//! - `settings` / `tuning`: Data-driven configuration
//! - `app`: Intro and play-phase driver

pub mod app;
pub mod audio;
pub mod level;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::{App, AppPhase, FrameOutcome};
pub use level::{Level, LevelError, LevelSession};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Edge length of one grid cell in world units
    pub const TILE_SIZE: f32 = 48.0;
    /// Standard gravity (world is y-up, units/s²)
    pub const GRAVITY: f32 = -300.0;

    /// Player sprite frame size; the anchor sits at the frame centre
    pub const PLAYER_FRAME_WIDTH: f32 = 48.0;
    pub const PLAYER_FRAME_HEIGHT: f32 = 48.0;
    /// Player hitbox as (x1, y1, x2, y2) relative to the frame's bottom-left corner
    pub const PLAYER_HITBOX: [f32; 4] = [10.0, 2.0, 38.0, 30.0];

    /// Side of the square probe a flying goo uses against the tile grid
    pub const GOO_PROBE_SIZE: f32 = 2.0;
    /// Number of frames in the flying goo loop
    pub const GOO_FRAMES: u32 = 4;
    /// Splat sprite size (unrotated, lying on a floor)
    pub const SPLAT_WIDTH: f32 = 32.0;
    pub const SPLAT_HEIGHT: f32 = 12.0;

    /// Ammo bar width in pixels when the magazine is full
    pub const AMMO_BAR_WIDTH: f32 = 135.0;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
}

/// Camera offset for a focus point: half a viewport behind it, never negative.
///
/// There is no clamp against the far edge of the level.
#[inline]
pub fn camera_offset(focus: Vec2, viewport: Vec2) -> Vec2 {
    (focus - viewport / 2.0).max(Vec2::ZERO)
}

/// Convert a world position to camera-relative screen coordinates
#[inline]
pub fn world_to_screen(pos: Vec2, offset: Vec2) -> Vec2 {
    pos - offset
}
