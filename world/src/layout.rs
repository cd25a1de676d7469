//! Mapping between maze cells and world space.

use glam::{Vec2, Vec3};
use maze_walker_core::{CellCoord, MazeGrid};
use maze_walker_system_movement::Aabb;

/// Share of the maze width at which fog fully obscures the scene.
const FOG_DISTANCE_FACTOR: f32 = 0.7;

/// World-space placement of an immutable maze.
///
/// Cell `(column, row)` is centred at
/// `x = (column - columns / 2) * tile_size`, `z = (row - rows / 2) * tile_size`
/// with fractional halves, so the maze is centred on the origin.
#[derive(Clone, Debug)]
pub struct MazeLayout {
    grid: MazeGrid,
    tile_size: f32,
    wall_height: f32,
    walls: Vec<Aabb>,
}

impl MazeLayout {
    /// Places `grid` in world space and precomputes one box per wall cell.
    #[must_use]
    pub fn new(grid: MazeGrid, tile_size: f32, wall_height: f32) -> Self {
        let mut layout = Self {
            grid,
            tile_size,
            wall_height,
            walls: Vec::new(),
        };
        let half_extents = Vec3::new(tile_size / 2.0, wall_height / 2.0, tile_size / 2.0);
        layout.walls = layout
            .grid
            .walls()
            .map(|cell| Aabb::from_center_half_extents(layout.cell_center(cell), half_extents))
            .collect();
        layout
    }

    /// Maze placed by this layout.
    #[must_use]
    pub const fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Edge length of one cell.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Height of the wall volumes.
    #[must_use]
    pub const fn wall_height(&self) -> f32 {
        self.wall_height
    }

    /// Center of the cell at half wall height.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec3 {
        let dimensions = self.grid.dimensions();
        let half_columns = dimensions.columns() as f32 / 2.0;
        let half_rows = dimensions.rows() as f32 / 2.0;
        Vec3::new(
            (cell.column() as f32 - half_columns) * self.tile_size,
            self.wall_height / 2.0,
            (cell.row() as f32 - half_rows) * self.tile_size,
        )
    }

    /// Cell whose footprint contains the horizontal part of `position`.
    #[must_use]
    pub fn cell_at(&self, position: Vec3) -> Option<CellCoord> {
        let dimensions = self.grid.dimensions();
        let column = (position.x / self.tile_size + dimensions.columns() as f32 / 2.0).round();
        let row = (position.z / self.tile_size + dimensions.rows() as f32 / 2.0).round();
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }

        let cell = CellCoord::new(column as u32, row as u32);
        dimensions.contains(cell).then_some(cell)
    }

    /// Collision boxes of every wall cell in row-major order.
    #[must_use]
    pub fn wall_boxes(&self) -> &[Aabb] {
        &self.walls
    }

    /// Camera position at which the player spawns.
    #[must_use]
    pub fn spawn_point(&self) -> Vec3 {
        self.cell_center(self.grid.start())
    }

    /// Center of the exit marker.
    #[must_use]
    pub fn exit_point(&self) -> Vec3 {
        self.cell_center(self.grid.end())
    }

    /// Width and depth of the ground plane.
    #[must_use]
    pub fn floor_size(&self) -> Vec2 {
        let dimensions = self.grid.dimensions();
        Vec2::new(
            dimensions.columns() as f32 * self.tile_size,
            dimensions.rows() as f32 * self.tile_size,
        )
    }

    /// Distance at which fog fully hides the scene.
    #[must_use]
    pub fn fog_far(&self) -> f32 {
        self.tile_size * self.grid.dimensions().columns() as f32 * FOG_DISTANCE_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
#######
#S....#
#####.#
#.....#
#.#####
#....E#
#######";

    fn layout() -> MazeLayout {
        MazeLayout::new(MazeGrid::from_ascii(SMALL).expect("valid grid"), 8.0, 7.0)
    }

    #[test]
    fn cells_are_centred_on_origin() {
        let layout = layout();
        assert_eq!(
            layout.cell_center(CellCoord::new(0, 0)),
            Vec3::new(-28.0, 3.5, -28.0)
        );
        assert_eq!(layout.spawn_point(), Vec3::new(-20.0, 3.5, -20.0));
        assert_eq!(layout.exit_point(), Vec3::new(12.0, 3.5, 12.0));
    }

    #[test]
    fn one_box_per_wall_cell() {
        let layout = layout();
        let grid = layout.grid();
        assert_eq!(layout.wall_boxes().len(), grid.walls().count());

        let first = layout.wall_boxes()[0];
        assert_eq!(first.min, Vec3::new(-32.0, 0.0, -32.0));
        assert_eq!(first.max, Vec3::new(-24.0, 7.0, -24.0));
    }

    #[test]
    fn cell_lookup_inverts_centres() {
        let layout = layout();
        for (cell, _) in layout.grid().iter() {
            assert_eq!(layout.cell_at(layout.cell_center(cell)), Some(cell));
        }
        assert_eq!(layout.cell_at(Vec3::new(-100.0, 0.0, 0.0)), None);
        assert_eq!(layout.cell_at(Vec3::new(0.0, 0.0, 100.0)), None);
    }

    #[test]
    fn scene_extents_follow_tile_size() {
        let layout = layout();
        assert_eq!(layout.floor_size(), Vec2::new(56.0, 56.0));
        assert!((layout.fog_far() - 39.2).abs() < 1e-4);
    }
}
