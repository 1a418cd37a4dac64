//! Scrolling-world mapping: camera, parallax starfield and radar

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{ParallaxTuning, Tuning};

/// Top-left corner of the viewport in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// Center the viewport on `target` without letting it leave the world
    pub fn follow(target: Vec2, tuning: &Tuning) -> Self {
        let viewport = tuning.viewport_size();
        let world = tuning.world_size();
        let mut pos = (target - viewport / 2.0).trunc();

        for axis in 0..2 {
            if pos[axis] < 0.0 {
                pos[axis] = 0.0;
            }
            if pos[axis] >= world[axis] - viewport[axis] {
                pos[axis] = world[axis] - viewport[axis] - 1.0;
            }
        }
        Self { pos }
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.pos
    }

    /// A craft is drawn unless its center is more than half a craft outside
    /// the viewport
    pub fn craft_on_screen(&self, world: Vec2, tuning: &Tuning) -> bool {
        let half = tuning.craft_size() / 2.0;
        let screen = self.to_screen(world);
        let view = tuning.viewport_size();
        screen.x >= -half.x
            && screen.y >= -half.y
            && screen.x < view.x + half.x
            && screen.y < view.y + half.y
    }
}

/// Session-stable random tile choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl TileGrid {
    pub fn random<R: Rng + ?Sized>(width: usize, height: usize, variants: u8, rng: &mut R) -> Self {
        let cells = (0..width * height)
            .map(|_| rng.random_range(0..variants.max(1)))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Variant at a cell; indices wrap around the grid
    pub fn get(&self, col: usize, row: usize) -> u8 {
        self.cells[(row % self.height) * self.width + col % self.width]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Back,
    Front,
}

/// One tile to blit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Top-left corner on screen
    pub screen: Vec2,
    /// Grid cell (column, row)
    pub cell: (usize, usize),
    pub variant: u8,
}

/// A tiled background layer scrolling at `1 / factor` of camera speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub kind: LayerKind,
    pub factor: f32,
    pub tile_size: Vec2,
    pub grid: TileGrid,
}

impl ParallaxLayer {
    pub fn new<R: Rng + ?Sized>(kind: LayerKind, parallax: &ParallaxTuning, rng: &mut R) -> Self {
        let factor = match kind {
            LayerKind::Back => parallax.back_factor,
            LayerKind::Front => parallax.front_factor,
        };
        Self {
            kind,
            factor,
            tile_size: Vec2::new(parallax.tile_width, parallax.tile_height),
            grid: TileGrid::random(parallax.grid_width, parallax.grid_height, parallax.variants, rng),
        }
    }

    fn grid_size(&self) -> Vec2 {
        Vec2::new(self.grid.width() as f32, self.grid.height() as f32)
    }

    /// Grid cell under the viewport's top-left corner
    pub fn start_tile(&self, camera: &Camera) -> (usize, usize) {
        let tile = (camera.pos / self.factor / self.tile_size)
            .rem_euclid(self.grid_size())
            .floor();
        (tile.x as usize, tile.y as usize)
    }

    /// Screen offset of the first tile (zero or negative)
    pub fn draw_offset(&self, camera: &Camera) -> Vec2 {
        -(camera.pos / self.factor).rem_euclid(self.tile_size).trunc()
    }

    /// Every tile needed to cover a `viewport` sized screen
    pub fn layout(&self, camera: &Camera, viewport: Vec2) -> Vec<TilePlacement> {
        let (start_col, start_row) = self.start_tile(camera);
        let offset = self.draw_offset(camera);
        let mut tiles = Vec::new();

        let mut y = offset.y;
        let mut row = start_row;
        while y < viewport.y {
            let mut x = offset.x;
            let mut col = start_col;
            while x < viewport.x {
                tiles.push(TilePlacement {
                    screen: Vec2::new(x, y),
                    cell: (col, row),
                    variant: self.grid.get(col, row),
                });
                x += self.tile_size.x;
                col = (col + 1) % self.grid.width();
            }
            y += self.tile_size.y;
            row = (row + 1) % self.grid.height();
        }
        tiles
    }
}

/// The two background layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starfield {
    pub back: ParallaxLayer,
    pub front: ParallaxLayer,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(parallax: &ParallaxTuning, rng: &mut R) -> Self {
        Self {
            back: ParallaxLayer::new(LayerKind::Back, parallax, rng),
            front: ParallaxLayer::new(LayerKind::Front, parallax, rng),
        }
    }
}

/// World position to radar panel coordinates
pub fn radar_blip(world_pos: Vec2, world_size: Vec2, radar_size: Vec2) -> Vec2 {
    (world_pos / (world_size / radar_size)).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn layer(factor: f32) -> ParallaxLayer {
        let mut rng = Pcg32::seed_from_u64(4);
        let parallax = ParallaxTuning {
            back_factor: factor,
            ..Default::default()
        };
        ParallaxLayer::new(LayerKind::Back, &parallax, &mut rng)
    }

    #[test]
    fn test_camera_centers_on_target() {
        let tuning = Tuning::default();
        let camera = Camera::follow(Vec2::new(1000.5, 900.0), &tuning);
        assert_eq!(camera.pos, Vec2::new(680.0, 660.0));
        assert_eq!(camera.to_screen(Vec2::new(1000.0, 900.0)), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn test_camera_clamps() {
        let tuning = Tuning::default();
        assert_eq!(Camera::follow(Vec2::new(10.0, 10.0), &tuning).pos, Vec2::ZERO);
        assert_eq!(
            Camera::follow(Vec2::new(1999.0, 1999.0), &tuning).pos,
            Vec2::new(1359.0, 1519.0)
        );
    }

    #[test]
    fn test_craft_culling() {
        let tuning = Tuning::default();
        let camera = Camera { pos: Vec2::new(100.0, 100.0) };
        assert!(camera.craft_on_screen(Vec2::new(100.0, 100.0), &tuning));
        assert!(camera.craft_on_screen(Vec2::new(60.0, 60.0), &tuning));
        assert!(!camera.craft_on_screen(Vec2::new(40.0, 300.0), &tuning));
        assert!(!camera.craft_on_screen(Vec2::new(800.0, 300.0), &tuning));
    }

    #[test]
    fn test_tile_indices() {
        let layer = layer(4.0);
        let camera = Camera { pos: Vec2::new(1000.0, 300.0) };
        // 1000 / 4 = 250 -> tile 3, offset 58
        assert_eq!(layer.start_tile(&camera), (3, 1));
        assert_eq!(layer.draw_offset(&camera), Vec2::new(-58.0, -11.0));
    }

    #[test]
    fn test_tile_index_wraps_grid() {
        let layer = layer(1.0);
        let camera = Camera { pos: Vec2::new(64.0 * 103.0, 0.0) };
        assert_eq!(layer.start_tile(&camera), (3, 0));
    }

    #[test]
    fn test_layout_covers_viewport() {
        let layer = layer(4.0);
        let camera = Camera { pos: Vec2::new(1000.0, 300.0) };
        let viewport = Vec2::new(640.0, 480.0);
        let tiles = layer.layout(&camera, viewport);

        // x: -58 .. 640 in steps of 64 -> 11 columns; y: -11 .. 480 -> 8 rows
        assert_eq!(tiles.len(), 11 * 8);
        assert_eq!(tiles[0].screen, Vec2::new(-58.0, -11.0));
        assert_eq!(tiles[0].cell, (3, 1));
        assert_eq!(tiles[1].cell, (4, 1));
        assert!(tiles.iter().all(|t| t.variant < 4));
    }

    #[test]
    fn test_grid_is_stable() {
        let layer = layer(2.0);
        assert_eq!(layer.grid.get(5, 7), layer.grid.get(105, 207));
    }

    #[test]
    fn test_radar_blip() {
        let blip = radar_blip(Vec2::new(1999.0, 20.0), Vec2::splat(2000.0), Vec2::splat(100.0));
        assert_eq!(blip, Vec2::new(99.0, 1.0));
    }
}
