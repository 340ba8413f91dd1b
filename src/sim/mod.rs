//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Variable timestep, driven by the caller
//! - Seeded RNG only
//! - Stable iteration order (row-major tiles, projectiles in firing order)

pub mod collision;
pub mod goo;
pub mod grid;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Face, collide_rects, collide_world, struck_face};
pub use goo::{Goo, GooEvent, GooPhase, SplatOrientation};
pub use grid::{Neighbors, TileCode, TileGrid, TileKind};
pub use player::{Activity, Player, PlayerFrame, PlayerState, TileContacts};
pub use state::{Overlay, SimulationState};
pub use tick::{Key, TickInput, TickOutcome, shoot, tick};
