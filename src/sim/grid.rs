//! Static tile grid for one level
//!
//! Tiles are stored row-major with row 0 at the bottom of the world
//! (world space is y-up). Index `i` sits at column `i % width`, row
//! `i / width`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Raw tile code as it appears in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(pub i32);

impl TileCode {
    pub const EMPTY: TileCode = TileCode(0);
    pub const SPAWN: TileCode = TileCode(-1);
    pub const GROUND: TileCode = TileCode(1);
    pub const LAVA: TileCode = TileCode(2);
    pub const PRINCESS: TileCode = TileCode(3);

    pub fn kind(self) -> TileKind {
        match self.0 {
            0 => TileKind::Empty,
            c if c < 0 => TileKind::Spawn,
            2 => TileKind::Hazard,
            3 => TileKind::Goal,
            _ => TileKind::Solid,
        }
    }

    /// Every positive code collides, hazards and the goal included
    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 > 0
    }
}

/// What a tile code means to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Empty,
    /// Player spawn marker; never collides
    Spawn,
    Solid,
    /// Lava: lethal to land on
    Hazard,
    /// Princess: finishes the level
    Goal,
}

/// The four orthogonal neighbours of a cell.
///
/// `None` at grid edges and for spawn sentinel cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub left: Option<TileCode>,
    pub right: Option<TileCode>,
    /// Row above (higher y)
    pub top: Option<TileCode>,
    /// Row below (lower y)
    pub bottom: Option<TileCode>,
}

impl Neighbors {
    #[inline]
    pub fn left_solid(&self) -> bool {
        self.left.is_some_and(TileCode::is_solid)
    }

    #[inline]
    pub fn right_solid(&self) -> bool {
        self.right.is_some_and(TileCode::is_solid)
    }

    #[inline]
    pub fn top_solid(&self) -> bool {
        self.top.is_some_and(TileCode::is_solid)
    }

    #[inline]
    pub fn bottom_solid(&self) -> bool {
        self.bottom.is_some_and(TileCode::is_solid)
    }
}

/// Row-major tile lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<TileCode>,
    width: usize,
}

impl TileGrid {
    /// Callers guarantee `width > 0` and `tiles.len() % width == 0`
    /// (see `level::Level::from_def`).
    pub fn new(tiles: Vec<TileCode>, width: usize) -> Self {
        debug_assert!(width > 0 && tiles.len() % width == 0);
        Self { tiles, width }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tiles.len() / self.width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[TileCode] {
        &self.tiles
    }

    /// Tile code at `index`; `EMPTY` past the end of the grid
    #[inline]
    pub fn tile_at(&self, index: usize) -> TileCode {
        self.tiles.get(index).copied().unwrap_or(TileCode::EMPTY)
    }

    /// Checked lookup by column/row
    pub fn get(&self, col: i64, row: i64) -> Option<TileCode> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height() as i64 {
            return None;
        }
        Some(self.tiles[row as usize * self.width + col as usize])
    }

    #[inline]
    pub fn col_row(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    #[inline]
    pub fn index_of(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    /// Bottom-left corner of a cell in world units
    pub fn tile_origin(&self, index: usize) -> Vec2 {
        let (col, row) = self.col_row(index);
        Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
    }

    /// Centre of a cell in world units
    pub fn tile_center(&self, index: usize) -> Vec2 {
        self.tile_origin(index) + Vec2::splat(TILE_SIZE / 2.0)
    }

    /// Width of the level in world units
    pub fn world_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn neighbors(&self, index: usize) -> Neighbors {
        let (col, row) = self.col_row(index);
        let (col, row) = (col as i64, row as i64);
        let visible = |c: Option<TileCode>| c.filter(|c| c.0 >= 0);

        Neighbors {
            left: visible(self.get(col - 1, row)),
            right: visible(self.get(col + 1, row)),
            top: visible(self.get(col, row + 1)),
            bottom: visible(self.get(col, row - 1)),
        }
    }

    /// Index of the spawn sentinel; the last one wins when a level has several
    pub fn spawn_index(&self) -> Option<usize> {
        self.tiles.iter().rposition(|c| c.kind() == TileKind::Spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(codes: &[i32], width: usize) -> TileGrid {
        TileGrid::new(codes.iter().copied().map(TileCode).collect(), width)
    }

    #[test]
    fn test_tile_kinds() {
        assert_eq!(TileCode(0).kind(), TileKind::Empty);
        assert_eq!(TileCode(-1).kind(), TileKind::Spawn);
        assert_eq!(TileCode(-7).kind(), TileKind::Spawn);
        assert_eq!(TileCode(1).kind(), TileKind::Solid);
        assert_eq!(TileCode(2).kind(), TileKind::Hazard);
        assert_eq!(TileCode(3).kind(), TileKind::Goal);
        assert_eq!(TileCode(9).kind(), TileKind::Solid);
        assert!(TileCode::LAVA.is_solid());
        assert!(!TileCode::SPAWN.is_solid());
    }

    #[test]
    fn test_neighbors_interior() {
        // Row 0 (bottom): 1 2 3
        // Row 1:          4 5 6
        // Row 2 (top):    7 8 9
        let g = grid(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 3);
        let n = g.neighbors(4);
        assert_eq!(n.left, Some(TileCode(4)));
        assert_eq!(n.right, Some(TileCode(6)));
        assert_eq!(n.top, Some(TileCode(8)));
        assert_eq!(n.bottom, Some(TileCode(2)));
    }

    #[test]
    fn test_neighbors_edges() {
        let g = grid(&[1, 2, 3, 4, 5, 6], 3);
        let corner = g.neighbors(0);
        assert_eq!(corner.left, None);
        assert_eq!(corner.bottom, None);
        assert_eq!(corner.right, Some(TileCode(2)));
        assert_eq!(corner.top, Some(TileCode(4)));

        // Index `width` has a real cell beneath it
        assert_eq!(g.neighbors(3).bottom, Some(TileCode(1)));

        let far = g.neighbors(5);
        assert_eq!(far.right, None);
        assert_eq!(far.top, None);
    }

    #[test]
    fn test_neighbors_hide_sentinel() {
        let g = grid(&[1, -1, 1, 0, 0, 0], 3);
        assert_eq!(g.neighbors(0).right, None);
        assert_eq!(g.neighbors(4).bottom, None);
        assert_eq!(g.neighbors(3).right, Some(TileCode::EMPTY));
    }

    #[test]
    fn test_tile_geometry() {
        let g = grid(&[0; 12], 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.col_row(6), (2, 1));
        assert_eq!(g.tile_origin(6), Vec2::new(96.0, 48.0));
        assert_eq!(g.tile_center(6), Vec2::new(120.0, 72.0));
        assert_eq!(g.get(4, 0), None);
        assert_eq!(g.get(-1, 0), None);
        assert_eq!(g.tile_at(100), TileCode::EMPTY);
    }

    #[test]
    fn test_spawn_index_last_wins() {
        let g = grid(&[-1, 0, 0, -1], 2);
        assert_eq!(g.spawn_index(), Some(3));
        assert_eq!(grid(&[1, 1], 2).spawn_index(), None);
    }

    fn arb_grid() -> impl Strategy<Value = TileGrid> {
        (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(-1i32..4, w * h).prop_map(move |codes| grid(&codes, w))
        })
    }

    proptest! {
        #[test]
        fn neighbors_none_exactly_at_edges_or_sentinels(g in arb_grid()) {
            for index in 0..g.len() {
                let (col, row) = g.col_row(index);
                let n = g.neighbors(index);
                let expect = |c: i64, r: i64| g.get(c, r).filter(|t| t.0 >= 0);
                let (c, r) = (col as i64, row as i64);

                prop_assert_eq!(n.left, expect(c - 1, r));
                prop_assert_eq!(n.right, expect(c + 1, r));
                prop_assert_eq!(n.top, expect(c, r + 1));
                prop_assert_eq!(n.bottom, expect(c, r - 1));

                prop_assert_eq!(n.left.is_none(), col == 0 || g.tile_at(index - 1).0 < 0);
                for side in [n.left, n.right, n.top, n.bottom].into_iter().flatten() {
                    prop_assert!(side.0 >= 0);
                }
            }
        }
    }
}
