//! Drawable view of the simulation
//!
//! Produces plain `Pod` sprite instances and HUD data. The presentation layer
//! owns textures, fonts and the window; it only reads what is built here.

pub mod sprite;

pub use sprite::{
    DrawList, FLIP_X, Hud, SpriteInstance, SpriteKind, ammo_bar_width, as_bytes, build_draw_list,
};
