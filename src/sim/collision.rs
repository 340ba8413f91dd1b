//! Collision queries against the tile grid and between entities
//!
//! Everything here is a pure function of its inputs. Entities run the
//! tile query at their new position, then ask `struck_face` which side
//! of each returned tile they came through, using where they were before
//! this tick's integration.

use glam::Vec2;

use super::grid::{Neighbors, TileGrid};
use crate::consts::TILE_SIZE;

/// Axis-aligned rectangle in world units (y-up, `min` is the bottom-left corner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Closed-interval overlap: touching edges count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        !(self.min.x > b_max.x
            || a_max.x < other.min.x
            || self.min.y > b_max.y
            || a_max.y < other.min.y)
    }
}

/// Entity-vs-entity test on anchor-relative hitboxes already placed in world space
#[inline]
pub fn collide_rects(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

/// Indices of solid tiles overlapped by `rect`, row-major ascending.
///
/// Rows span `floor(y / T)..ceil((y + h) / T)` and columns likewise, so a rect
/// that only touches a cell boundary does not reach into the next cell.
/// Rows outside the grid are skipped; columns are clamped to the grid width
/// so a rect hanging off one side never wraps into the neighbouring row.
pub fn collide_world(grid: &TileGrid, rect: &Aabb) -> Vec<usize> {
    let mut collisions = Vec::new();

    let col_start = (rect.min.x / TILE_SIZE).floor() as i64;
    let col_end = (rect.max().x / TILE_SIZE).ceil() as i64;
    let row_start = (rect.min.y / TILE_SIZE).floor() as i64;
    let row_end = (rect.max().y / TILE_SIZE).ceil() as i64;

    let width = grid.width() as i64;
    let height = grid.height() as i64;

    if col_end < 0 || col_start >= width {
        return collisions;
    }
    let cols = col_start.max(0)..col_end.min(width);

    for row in row_start..row_end {
        if row < 0 || row >= height {
            continue;
        }
        for col in cols.clone() {
            let index = grid.index_of(col as usize, row as usize);
            if grid.tile_at(index).is_solid() {
                collisions.push(index);
            }
        }
    }

    collisions
}

/// Which face of a tile an entity came through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Landed on top of the tile
    Top,
    /// Hit the underside while rising
    Bottom,
    /// Ran into the tile's left side while moving right
    Left,
    /// Ran into the tile's right side while moving left
    Right,
}

impl Face {
    /// True for the faces that stop vertical motion
    pub fn is_vertical(self) -> bool {
        matches!(self, Face::Top | Face::Bottom)
    }

    /// Move `rect` so it rests flush against this face of the tile centred at `tile_center`
    pub fn snap(self, rect: Aabb, tile_center: Vec2) -> Aabb {
        let half = TILE_SIZE / 2.0;
        let mut min = rect.min;
        match self {
            Face::Top => min.y = tile_center.y + half,
            Face::Bottom => min.y = tile_center.y - half - rect.size.y,
            Face::Left => min.x = tile_center.x - half - rect.size.x,
            Face::Right => min.x = tile_center.x + half,
        }
        Aabb { min, ..rect }
    }
}

/// Decide which face of a tile was crossed.
///
/// `prev` is the entity's rectangle before this tick's integration and `vel`
/// its current velocity. Vertical faces are checked first and the first
/// matching branch wins, so only one axis is corrected per tile. A face is
/// only eligible when the neighbouring cell on that side is not solid, which
/// keeps entities from catching on the seams between contiguous tiles.
pub fn struck_face(tile_center: Vec2, prev: &Aabb, vel: Vec2, neighbors: &Neighbors) -> Option<Face> {
    let prev_max = prev.max();

    if vel.y < 0.0 && prev.min.y > tile_center.y && !neighbors.top_solid() {
        Some(Face::Top)
    } else if vel.y > 0.0 && prev_max.y < tile_center.y && !neighbors.bottom_solid() {
        Some(Face::Bottom)
    } else if vel.x > 0.0 && prev_max.x < tile_center.x && !neighbors.left_solid() {
        Some(Face::Left)
    } else if vel.x < 0.0 && prev.min.x > tile_center.x && !neighbors.right_solid() {
        Some(Face::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TileCode;
    use proptest::prelude::*;

    fn grid(codes: &[i32], width: usize) -> TileGrid {
        TileGrid::new(codes.iter().copied().map(TileCode).collect(), width)
    }

    #[test]
    fn test_collide_world_row_major_order() {
        // Row 0: 1 1 1
        // Row 1: 0 2 1
        let g = grid(&[1, 1, 1, 0, 2, 1], 3);
        let rect = Aabb::new(10.0, 10.0, 120.0, 60.0);
        assert_eq!(collide_world(&g, &rect), vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_collide_world_skips_empty_and_sentinel() {
        let g = grid(&[0, -1, 1, 0], 2);
        let rect = Aabb::new(0.0, 0.0, 96.0, 96.0);
        assert_eq!(collide_world(&g, &rect), vec![2]);
    }

    #[test]
    fn test_collide_world_touching_boundary_excluded() {
        let g = grid(&[1, 1], 2);
        // Right edge exactly on the boundary between column 0 and 1
        let rect = Aabb::new(20.0, 10.0, 28.0, 10.0);
        assert_eq!(collide_world(&g, &rect), vec![0]);
    }

    #[test]
    fn test_collide_world_outside_grid() {
        let g = grid(&[1, 1, 1, 1], 2);
        assert!(collide_world(&g, &Aabb::new(-200.0, 0.0, 50.0, 50.0)).is_empty());
        assert!(collide_world(&g, &Aabb::new(500.0, 0.0, 50.0, 50.0)).is_empty());
        assert!(collide_world(&g, &Aabb::new(0.0, -200.0, 50.0, 50.0)).is_empty());
        assert!(collide_world(&g, &Aabb::new(0.0, 400.0, 50.0, 50.0)).is_empty());
    }

    #[test]
    fn test_collide_world_does_not_wrap_rows() {
        // Row 0: 0 1
        // Row 1: 1 0
        let g = grid(&[0, 1, 1, 0], 2);
        // Hangs off the right edge of row 0 only; must not pick up index 2
        let rect = Aabb::new(60.0, 5.0, 100.0, 10.0);
        assert_eq!(collide_world(&g, &rect), vec![1]);
        // Hangs off the left edge of row 1 only
        let rect = Aabb::new(-30.0, 55.0, 40.0, 10.0);
        assert_eq!(collide_world(&g, &rect), vec![2]);
    }

    #[test]
    fn test_collide_rects() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(collide_rects(&a, &Aabb::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge counts
        assert!(collide_rects(&a, &Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!collide_rects(&a, &Aabb::new(10.5, 0.0, 10.0, 10.0)));
        assert!(!collide_rects(&a, &Aabb::new(0.0, -20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_struck_face_top() {
        let center = Vec2::new(24.0, 24.0);
        let prev = Aabb::new(10.0, 50.0, 28.0, 28.0);
        let face = struck_face(center, &prev, Vec2::new(0.0, -50.0), &Neighbors::default());
        assert_eq!(face, Some(Face::Top));
    }

    #[test]
    fn test_struck_face_top_blocked_by_solid_neighbor() {
        let center = Vec2::new(24.0, 24.0);
        let prev = Aabb::new(10.0, 50.0, 28.0, 28.0);
        let neighbors = Neighbors {
            top: Some(TileCode::GROUND),
            ..Default::default()
        };
        assert_eq!(
            struck_face(center, &prev, Vec2::new(0.0, -50.0), &neighbors),
            None
        );

        // An empty cell above does not block
        let neighbors = Neighbors {
            top: Some(TileCode::EMPTY),
            ..Default::default()
        };
        assert_eq!(
            struck_face(center, &prev, Vec2::new(0.0, -50.0), &neighbors),
            Some(Face::Top)
        );
    }

    #[test]
    fn test_struck_face_bottom_left_right() {
        let center = Vec2::new(72.0, 72.0);
        let n = Neighbors::default();

        let below = Aabb::new(60.0, 10.0, 28.0, 28.0);
        assert_eq!(struck_face(center, &below, Vec2::new(0.0, 80.0), &n), Some(Face::Bottom));

        let left_of = Aabb::new(10.0, 60.0, 28.0, 28.0);
        assert_eq!(struck_face(center, &left_of, Vec2::new(30.0, 0.0), &n), Some(Face::Left));

        let right_of = Aabb::new(110.0, 60.0, 28.0, 28.0);
        assert_eq!(struck_face(center, &right_of, Vec2::new(-30.0, 0.0), &n), Some(Face::Right));

        // Moving away from the tile matches nothing
        assert_eq!(struck_face(center, &right_of, Vec2::new(30.0, 0.0), &n), None);
    }

    #[test]
    fn test_struck_face_vertical_wins() {
        let center = Vec2::new(72.0, 24.0);
        // Above and to the left, falling while moving right
        let prev = Aabb::new(20.0, 50.0, 28.0, 28.0);
        let face = struck_face(center, &prev, Vec2::new(40.0, -40.0), &Neighbors::default());
        assert_eq!(face, Some(Face::Top));
    }

    #[test]
    fn test_snap_faces() {
        let center = Vec2::new(72.0, 72.0);
        let rect = Aabb::new(0.0, 0.0, 28.0, 20.0);
        assert_eq!(Face::Top.snap(rect, center).min.y, 96.0);
        assert_eq!(Face::Bottom.snap(rect, center).max().y, 48.0);
        assert_eq!(Face::Left.snap(rect, center).max().x, 48.0);
        assert_eq!(Face::Right.snap(rect, center).min.x, 96.0);
        assert_eq!(Face::Top.snap(rect, center).min.x, 0.0);
    }

    #[test]
    fn test_snap_is_idempotent_at_rest() {
        let g = grid(&[1, 0], 1);
        let center = g.tile_center(0);
        let n = g.neighbors(0);

        let falling = Aabb::new(10.0, 50.0, 28.0, 28.0);
        let face = struck_face(center, &falling, Vec2::new(0.0, -10.0), &n).unwrap();
        let rested = face.snap(falling, center);
        assert_eq!(rested.min.y, 48.0);

        // Resting with zero velocity: a repeated query changes nothing
        assert_eq!(struck_face(center, &rested, Vec2::ZERO, &n), None);
        assert_eq!(Face::Top.snap(rested, center), rested);
    }

    proptest! {
        #[test]
        fn collide_world_is_deterministic_and_solid(
            codes in proptest::collection::vec(-1i32..4, 24),
            x in -100.0f32..400.0,
            y in -100.0f32..300.0,
            w in 0.5f32..120.0,
            h in 0.5f32..120.0,
        ) {
            let g = grid(&codes, 6);
            let rect = Aabb::new(x, y, w, h);
            let first = collide_world(&g, &rect);
            prop_assert_eq!(&first, &collide_world(&g, &rect));
            prop_assert!(first.windows(2).all(|p| p[0] < p[1]));
            for &index in &first {
                prop_assert!(index < g.len());
                prop_assert!(g.tile_at(index).0 > 0);
            }
        }
    }
}
