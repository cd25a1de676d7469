use maze_walker_core::{CellCoord, CellState, MazeDimensions, MazeGrid};
use maze_walker_system_maze_generation::{FirstFrontier, FrontierSelector, MazeGenerator};

const FIRST_FRONTIER_21: &str = "\
#####################
#S..................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#...................#
#.###################
#..................E#
#####################";

fn dimensions(columns: u32, rows: u32) -> MazeDimensions {
    MazeDimensions::new(columns, rows).expect("valid dimensions")
}

fn assert_perfect_maze(grid: &MazeGrid) {
    let dims = grid.dimensions();
    assert_eq!(grid.count(CellState::Start), 1);
    assert_eq!(grid.count(CellState::End), 1);
    assert_eq!(grid.start(), CellCoord::new(1, 1));
    assert_eq!(
        grid.end(),
        CellCoord::new(dims.columns() - 2, dims.rows() - 2)
    );

    for (cell, state) in grid.iter() {
        if !dims.is_interior(cell) {
            assert_eq!(
                state,
                CellState::Wall,
                "border cell {cell:?} must be a wall"
            );
        }
        if cell.column() % 2 == 0 && cell.row() % 2 == 0 {
            assert_eq!(
                state,
                CellState::Wall,
                "lattice corner {cell:?} must be a wall"
            );
        }
        if cell.column() % 2 == 1 && cell.row() % 2 == 1 {
            assert!(state.is_walkable(), "lattice cell {cell:?} must be carved");
        }
    }

    let reachable = grid.reachable_from(grid.start());
    let walkable = grid.iter().filter(|(_, state)| state.is_walkable()).count();
    let visited = reachable.iter().filter(|visited| **visited).count();
    assert_eq!(
        visited,
        walkable,
        "every corridor must connect to the start"
    );

    let lattice_cells = ((dims.columns() / 2) * (dims.rows() / 2)) as usize;
    assert_eq!(
        walkable,
        2 * lattice_cells - 1,
        "a spanning tree carves exactly one wall per joined lattice cell"
    );
}

#[test]
fn first_frontier_matches_snapshot() {
    let grid = MazeGenerator::new().generate_with(dimensions(21, 21), &mut FirstFrontier);
    assert_eq!(grid.to_ascii(), FIRST_FRONTIER_21);
}

#[test]
fn first_frontier_small_grid() {
    let grid = MazeGenerator::new().generate_with(dimensions(7, 5), &mut FirstFrontier);
    assert_eq!(
        grid.to_ascii(),
        "#######\n#S....#\n#.#####\n#....E#\n#######"
    );
}

#[test]
fn snapshot_solution_walks_the_spine() {
    let grid = MazeGrid::from_ascii(FIRST_FRONTIER_21).expect("snapshot is valid");
    let path = grid
        .shortest_path(grid.start(), grid.end())
        .expect("end reachable");
    assert_eq!(path.len(), 37);
}

#[test]
fn seeded_mazes_are_perfect() {
    let generator = MazeGenerator::new();
    for seed in 0..32 {
        let grid = generator.generate(dimensions(21, 21), Some(seed));
        assert_perfect_maze(&grid);
    }
}

#[test]
fn rectangular_and_minimal_mazes_are_perfect() {
    let generator = MazeGenerator::new();
    for (columns, rows) in [(5, 5), (5, 9), (31, 11), (41, 41)] {
        let grid = generator.generate(dimensions(columns, rows), Some(99));
        assert_perfect_maze(&grid);
        assert_eq!(grid.dimensions().columns(), columns);
        assert_eq!(grid.dimensions().rows(), rows);
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let generator = MazeGenerator::new();
    let first = generator.generate(dimensions(21, 21), Some(1234));
    let second = generator.generate(dimensions(21, 21), Some(1234));
    assert_eq!(first, second);
}

#[test]
fn different_seeds_generally_differ() {
    let generator = MazeGenerator::new();
    let reference = generator.generate(dimensions(21, 21), Some(1));
    let distinct = (2..10)
        .map(|seed| generator.generate(dimensions(21, 21), Some(seed)))
        .filter(|grid| *grid != reference)
        .count();
    assert!(distinct >= 7, "expected seeds to produce varied layouts");
}

#[test]
fn entropy_generation_is_valid() {
    let grid = MazeGenerator::new().generate(dimensions(11, 11), None);
    assert_perfect_maze(&grid);
}

#[test]
fn generated_grid_survives_text_validation() {
    let grid = MazeGenerator::new().generate(dimensions(15, 9), Some(42));
    let parsed = MazeGrid::from_ascii(&grid.to_ascii()).expect("generated grid is valid");
    assert_eq!(parsed, grid);
}

struct LastFrontier;

impl FrontierSelector for LastFrontier {
    fn pick(&mut self, len: usize) -> usize {
        len - 1
    }
}

struct OutOfRange;

impl FrontierSelector for OutOfRange {
    fn pick(&mut self, len: usize) -> usize {
        len * 3
    }
}

#[test]
fn custom_selectors_still_produce_perfect_mazes() {
    let generator = MazeGenerator::new();
    assert_perfect_maze(&generator.generate_with(dimensions(21, 21), &mut LastFrontier));
    assert_perfect_maze(&generator.generate_with(dimensions(21, 21), &mut OutOfRange));
}
