//! Tile layout for the playing board
//!
//! Tiles are spread over a fixed number of rows, evenly spaced within each
//! row, then nudged by random jitter and a small rotation so the board looks
//! like cards scattered on a mat. After jitter every tile is clamped back
//! into the board. That clamp is the only overlap control: neighbouring tiles
//! may still overlap a little, which is fine for the scattered look.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// On-screen size of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileFootprint {
    pub size: Vec2,
}

impl TileFootprint {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    /// Footprint for the viewport width breakpoints (phone, tablet, desktop)
    pub fn for_viewport(viewport_width: f32) -> Self {
        let (w, h) = if viewport_width <= SMALL_VIEWPORT {
            TILE_SMALL
        } else if viewport_width <= MEDIUM_VIEWPORT {
            TILE_MEDIUM
        } else {
            TILE_LARGE
        };
        Self::new(w, h)
    }
}

impl Default for TileFootprint {
    fn default() -> Self {
        Self::new(TILE_LARGE.0, TILE_LARGE.1)
    }
}

/// The rectangle tiles are placed in, plus the tile size and row count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    /// Working area (render area minus padding)
    pub area: Vec2,
    pub tile: TileFootprint,
    pub rows: usize,
}

impl BoardGeometry {
    pub fn new(area: Vec2, tile: TileFootprint, rows: usize) -> Self {
        Self { area, tile, rows }
    }

    /// Build from the host's render area, removing the fixed padding
    pub fn from_render_area(width: f32, height: f32, tile: TileFootprint) -> Self {
        let area = (Vec2::new(width, height) - Vec2::splat(AREA_PADDING)).max(Vec2::ZERO);
        Self::new(area, tile, BOARD_ROWS)
    }

    /// Largest legal top-left corner. Collapses to zero when the tile
    /// does not fit.
    pub fn max_origin(&self) -> Vec2 {
        (self.area - self.tile.size).max(Vec2::ZERO)
    }

    /// Evenly spaced slot for tile `index` out of `count`, before jitter
    pub fn base_position(&self, index: usize, count: usize) -> Vec2 {
        let rows = self.rows.max(1);
        let per_row = count.div_ceil(rows).max(1);
        let row = index / per_row;
        let col = index % per_row;
        let in_row = per_row.min(count.saturating_sub(row * per_row)).max(1);

        let span = self.area - self.tile.size;
        let col_step = span.x / (in_row - 1).max(1) as f32;
        let row_step = span.y / (rows - 1).max(1) as f32;

        Vec2::new(col as f32 * col_step, row as f32 * row_step)
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        let tile = TileFootprint::default();
        Self::from_render_area(1000.0, min_area_height(tile, BOARD_ROWS), tile)
    }
}

/// Minimum render-area height that fits `rows` rows of tiles with gaps
pub fn min_area_height(tile: TileFootprint, rows: usize) -> f32 {
    let rows = rows.max(1);
    tile.size.y * rows as f32 + ROW_GAP * (rows - 1) as f32 + AREA_PADDING
}

/// A tile placed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    /// Candidate name this tile stands for
    pub key: String,
    /// Top-left corner inside the working area
    pub pos: Vec2,
    pub rotation_deg: f32,
    /// Stacking order; later placements draw on top
    pub z_index: u32,
}

/// Place one tile per key
///
/// Keys are expected to be shuffled already; placement order follows the
/// slice, and so does stacking order.
pub fn layout_tiles<K, R>(keys: &[K], geometry: &BoardGeometry, rng: &mut R) -> Vec<PlacedTile>
where
    K: AsRef<str>,
    R: Rng + ?Sized,
{
    let count = keys.len();
    let max_origin = geometry.max_origin();

    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let base = geometry.base_position(index, count);
            let jitter = Vec2::new(
                rng.random_range(-JITTER_X..=JITTER_X),
                rng.random_range(-JITTER_Y..=JITTER_Y),
            );
            let pos = (base + jitter).clamp(Vec2::ZERO, max_origin);
            let rotation_deg = rng.random_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG);

            PlacedTile {
                key: key.as_ref().to_string(),
                pos,
                rotation_deg,
                z_index: index as u32 + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tile-{i}")).collect()
    }

    fn in_bounds(tile: &PlacedTile, geometry: &BoardGeometry) -> bool {
        let max = geometry.max_origin();
        tile.pos.x >= 0.0 && tile.pos.y >= 0.0 && tile.pos.x <= max.x && tile.pos.y <= max.y
    }

    #[test]
    fn test_footprint_breakpoints() {
        assert_eq!(
            TileFootprint::for_viewport(375.0),
            TileFootprint::new(70.0, 100.0)
        );
        assert_eq!(
            TileFootprint::for_viewport(480.0),
            TileFootprint::new(70.0, 100.0)
        );
        assert_eq!(
            TileFootprint::for_viewport(700.0),
            TileFootprint::new(85.0, 120.0)
        );
        assert_eq!(
            TileFootprint::for_viewport(1440.0),
            TileFootprint::new(100.0, 140.0)
        );
    }

    #[test]
    fn test_render_area_padding() {
        let g = BoardGeometry::from_render_area(840.0, 690.0, TileFootprint::default());
        assert_eq!(g.area, Vec2::new(800.0, 650.0));
        assert_eq!(g.rows, BOARD_ROWS);
    }

    #[test]
    fn test_min_area_height() {
        // 140 * 4 + 30 * 3 + 40
        assert_eq!(min_area_height(TileFootprint::default(), 4), 690.0);
    }

    #[test]
    fn test_base_positions_split_rows() {
        // 10 tiles over 4 rows -> 3, 3, 3, 1
        let g = BoardGeometry::new(Vec2::new(700.0, 460.0), TileFootprint::new(100.0, 160.0), 4);
        assert_eq!(g.base_position(0, 10), Vec2::new(0.0, 0.0));
        assert_eq!(g.base_position(1, 10), Vec2::new(300.0, 0.0));
        assert_eq!(g.base_position(2, 10), Vec2::new(600.0, 0.0));
        assert_eq!(g.base_position(3, 10), Vec2::new(0.0, 100.0));
        assert_eq!(g.base_position(8, 10), Vec2::new(600.0, 200.0));
        // Lone tile in the last row sits at the left edge
        assert_eq!(g.base_position(9, 10), Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_layout_keeps_every_key_once() {
        let g = BoardGeometry::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let keys = keys(13);
        let placed = layout_tiles(&keys, &g, &mut rng);

        assert_eq!(placed.len(), 13);
        for key in &keys {
            assert_eq!(placed.iter().filter(|t| &t.key == key).count(), 1);
        }
    }

    #[test]
    fn test_stacking_follows_placement_order() {
        let g = BoardGeometry::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let placed = layout_tiles(&keys(6), &g, &mut rng);
        let z: Vec<u32> = placed.iter().map(|t| t.z_index).collect();
        assert_eq!(z, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_rotation_within_range() {
        let g = BoardGeometry::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for tile in layout_tiles(&keys(40), &g, &mut rng) {
            assert!(tile.rotation_deg.abs() <= MAX_ROTATION_DEG);
        }
    }

    #[test]
    fn test_jitter_stays_near_base_slot() {
        assert_eq!(JITTER_X, 30.0);
        assert_eq!(JITTER_Y, 20.0);

        // Clamping only pulls a tile back toward its slot, so edge tiles obey the bound too
        let g = BoardGeometry::new(Vec2::new(2000.0, 1600.0), TileFootprint::default(), 4);
        let n = 12;
        let mut moved = false;
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let placed = layout_tiles(&keys(n), &g, &mut rng);
            for (i, tile) in placed.iter().enumerate() {
                let offset = tile.pos - g.base_position(i, n);
                assert!(offset.x.abs() <= JITTER_X + 1e-3, "x offset {}", offset.x);
                assert!(offset.y.abs() <= JITTER_Y + 1e-3, "y offset {}", offset.y);
                moved |= offset != Vec2::ZERO;
            }
        }
        assert!(moved);
    }

    #[test]
    fn test_area_smaller_than_tile_collapses_to_origin() {
        let g = BoardGeometry::new(Vec2::new(50.0, 60.0), TileFootprint::default(), 4);
        let mut rng = Pcg32::seed_from_u64(5);
        for tile in layout_tiles(&keys(8), &g, &mut rng) {
            assert_eq!(tile.pos, Vec2::ZERO);
        }
    }

    #[test]
    fn test_empty_layout() {
        let g = BoardGeometry::default();
        let mut rng = Pcg32::seed_from_u64(5);
        assert!(layout_tiles::<String, _>(&[], &g, &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let g = BoardGeometry::default();
        let a = layout_tiles(&keys(12), &g, &mut Pcg32::seed_from_u64(77));
        let b = layout_tiles(&keys(12), &g, &mut Pcg32::seed_from_u64(77));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_tiles_stay_inside_area(
            n in 0usize..60,
            rows in 1usize..6,
            w in 0.0f32..1600.0,
            h in 0.0f32..1000.0,
            seed in any::<u64>(),
        ) {
            let g = BoardGeometry::new(Vec2::new(w, h), TileFootprint::default(), rows);
            let mut rng = Pcg32::seed_from_u64(seed);
            let placed = layout_tiles(&keys(n), &g, &mut rng);
            prop_assert_eq!(placed.len(), n);
            for tile in &placed {
                prop_assert!(in_bounds(tile, &g));
            }
        }
    }
}
