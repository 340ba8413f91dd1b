//! Sprite instances handed to the presentation layer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::consts::{AMMO_BAR_WIDTH, TILE_SIZE};
use crate::level::TileSprite;
use crate::sim::{Goo, GooPhase, Player, SimulationState, TileCode, TileKind};

/// Which texture a sprite is drawn from
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ground = 0,
    Lava = 1,
    Princess = 2,
    /// Solid tile with a code that has no dedicated texture
    Block = 3,
    GooFlying = 4,
    GooSplat = 5,
    Player = 6,
}

/// Mirror horizontally
pub const FLIP_X: u32 = 1;

/// One drawable sprite (must match the presentation layer's vertex layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Sprite centre in world units
    pub position: [f32; 2],
    /// Degrees, clockwise
    pub rotation: f32,
    pub frame: u32,
    pub kind: u32,
    pub flags: u32,
}

impl SpriteInstance {
    pub fn new(position: Vec2, kind: SpriteKind, frame: u32) -> Self {
        Self {
            position: position.to_array(),
            rotation: 0.0,
            frame,
            kind: kind as u32,
            flags: 0,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn flipped(mut self, flip: bool) -> Self {
        if flip {
            self.flags |= FLIP_X;
        }
        self
    }

    pub fn from_tile(tile: &TileSprite) -> Self {
        let kind = match tile.code.kind() {
            TileKind::Hazard => SpriteKind::Lava,
            TileKind::Goal => SpriteKind::Princess,
            _ if tile.code == TileCode::GROUND => SpriteKind::Ground,
            _ => SpriteKind::Block,
        };
        Self::new(tile.pos + Vec2::splat(TILE_SIZE / 2.0), kind, tile.frame)
    }

    pub fn from_goo(goo: &Goo) -> Self {
        match goo.phase {
            GooPhase::Splatted(_) => {
                Self::new(goo.pos, SpriteKind::GooSplat, 0).with_rotation(goo.rotation())
            }
            _ => Self::new(goo.pos, SpriteKind::GooFlying, goo.frame),
        }
    }

    pub fn from_player(player: &Player) -> Self {
        Self::new(player.pos, SpriteKind::Player, player.frame.sheet_index())
            .with_rotation(player.rotation)
            .flipped(player.flip_x)
    }
}

/// Heads-up display contents
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// Ammo bar width in pixels, never below 1
    pub ammo_bar_width: f32,
    pub overlay: Option<&'static str>,
}

/// Everything needed to draw one frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    /// Camera offset to subtract from world positions
    pub offset: Vec2,
    pub tiles: Vec<SpriteInstance>,
    pub goo: Vec<SpriteInstance>,
    pub player: SpriteInstance,
    pub hud: Hud,
}

impl DrawList {
    /// Raw instance bytes for upload, tiles first, player last
    pub fn instance_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(
            (self.tiles.len() + self.goo.len() + 1) * std::mem::size_of::<SpriteInstance>(),
        );
        bytes.extend_from_slice(as_bytes(&self.tiles));
        bytes.extend_from_slice(as_bytes(&self.goo));
        bytes.extend_from_slice(bytemuck::bytes_of(&self.player));
        bytes
    }

    pub fn instance_count(&self) -> usize {
        self.tiles.len() + self.goo.len() + 1
    }
}

#[inline]
pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// Ammo bar width for a magazine fraction in 0..=1
pub fn ammo_bar_width(fraction: f32) -> f32 {
    (AMMO_BAR_WIDTH * fraction).max(1.0)
}

/// Snapshot the simulation for drawing. Removed goo is skipped.
pub fn build_draw_list(state: &SimulationState) -> DrawList {
    DrawList {
        offset: state.offset,
        tiles: state
            .session
            .tiles()
            .iter()
            .map(SpriteInstance::from_tile)
            .collect(),
        goo: state
            .player
            .projectiles
            .iter()
            .filter(|g| g.is_visible())
            .map(SpriteInstance::from_goo)
            .collect(),
        player: SpriteInstance::from_player(&state.player),
        hud: Hud {
            ammo_bar_width: ammo_bar_width(state.ammo_fraction()),
            overlay: state.overlay.text(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelDef, LevelSession, MemoryLoader};
    use crate::sim::{Overlay, SplatOrientation};
    use crate::tuning::Tuning;

    fn state() -> SimulationState {
        let loader = MemoryLoader::new().with(
            "a",
            LevelDef {
                tiles: vec![1, 2, 3, 7, 0, -1, 0, 0],
                width: 4,
                music: "a.ogg".into(),
                max_goo: 3,
            },
        );
        let session = LevelSession::start(Box::new(loader), vec!["a".into()]).unwrap();
        SimulationState::new(session, Tuning::default(), Vec2::new(800.0, 600.0), 0)
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 24);
        let list = build_draw_list(&state());
        assert_eq!(list.instance_bytes().len(), list.instance_count() * 24);
    }

    #[test]
    fn test_tiles_map_to_kinds() {
        let list = build_draw_list(&state());
        let kinds: Vec<u32> = list.tiles.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Ground as u32,
                SpriteKind::Lava as u32,
                SpriteKind::Princess as u32,
                SpriteKind::Block as u32,
            ]
        );
        assert_eq!(list.tiles[1].position, [72.0, 24.0]);
    }

    #[test]
    fn test_removed_goo_is_not_drawn() {
        let mut s = state();
        let mut splat = Goo::new(Vec2::new(10.0, 48.0), Vec2::ZERO);
        splat.phase = GooPhase::Splatted(SplatOrientation::RightWall);
        let mut gone = Goo::new(Vec2::ZERO, Vec2::ZERO);
        gone.phase = GooPhase::Removed;
        s.player.projectiles = vec![splat, gone, Goo::new(Vec2::ONE, Vec2::ONE)];

        let list = build_draw_list(&s);
        assert_eq!(list.goo.len(), 2);
        assert_eq!(list.goo[0].kind, SpriteKind::GooSplat as u32);
        assert_eq!(list.goo[0].rotation, 90.0);
        assert_eq!(list.goo[1].kind, SpriteKind::GooFlying as u32);
    }

    #[test]
    fn test_hud() {
        let mut s = state();
        assert_eq!(build_draw_list(&s).hud.ammo_bar_width, 135.0);

        for _ in 0..3 {
            s.player.projectiles.push(Goo::new(Vec2::ZERO, Vec2::ZERO));
        }
        s.overlay = Overlay::Died;
        let hud = build_draw_list(&s).hud;
        assert_eq!(hud.ammo_bar_width, 1.0);
        assert_eq!(hud.overlay, Some("YOU DIED. PRESS SPACE"));
    }

    #[test]
    fn test_player_flip_flag() {
        let mut s = state();
        s.player.flip_x = true;
        let list = build_draw_list(&s);
        assert_eq!(list.player.flags & FLIP_X, FLIP_X);
        assert_eq!(list.player.kind, SpriteKind::Player as u32);
    }
}
