#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure maze generation system that carves perfect mazes on the odd lattice.
//!
//! The generator runs a randomized variant of Prim's algorithm. Lattice cells
//! (odd row and column) are joined through the wall cell between them, so the
//! carved corridors form a spanning tree and the exit is always reachable from
//! the spawn. Randomness is injected through [`FrontierSelector`], letting
//! tests and replays pick deterministic strategies.

use maze_walker_core::{CarvingGrid, CellCoord, MazeDimensions, MazeGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Offsets visited when growing the frontier, in push order: up, down, left, right.
const LATTICE_STEPS: [(i32, i32); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Strategy deciding which frontier entry is expanded next.
pub trait FrontierSelector {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform selector backed by a ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct SeededSelector {
    rng: ChaCha8Rng,
}

impl SeededSelector {
    /// Creates a reproducible selector from the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a selector seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl FrontierSelector for SeededSelector {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Selector that always expands the oldest frontier entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FirstFrontier;

impl FrontierSelector for FirstFrontier {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Candidate lattice cell together with the wall separating it from the carved tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    target: CellCoord,
    between: CellCoord,
}

/// Stateless maze generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generates a maze using a seeded selector, or fresh entropy when `seed` is `None`.
    #[must_use]
    pub fn generate(&self, dimensions: MazeDimensions, seed: Option<u64>) -> MazeGrid {
        let mut selector = match seed {
            Some(seed) => SeededSelector::new(seed),
            None => SeededSelector::from_entropy(),
        };
        self.generate_with(dimensions, &mut selector)
    }

    /// Generates a maze, delegating every frontier choice to `selector`.
    #[must_use]
    pub fn generate_with<S>(&self, dimensions: MazeDimensions, selector: &mut S) -> MazeGrid
    where
        S: FrontierSelector + ?Sized,
    {
        let mut carving = CarvingGrid::new(dimensions);
        let mut frontier = Vec::new();

        let root = dimensions.start();
        carving.carve(root);
        push_frontier(&carving, root, &mut frontier);

        let mut carved_cells = 1_usize;
        let mut stale_entries = 0_usize;
        while !frontier.is_empty() {
            let index = selector.pick(frontier.len()).min(frontier.len() - 1);
            let entry = frontier.remove(index);
            if !carving.is_wall(entry.target) {
                stale_entries += 1;
                continue;
            }

            carving.carve(entry.between);
            carving.carve(entry.target);
            carved_cells += 1;
            push_frontier(&carving, entry.target, &mut frontier);
        }

        tracing::debug!(
            columns = dimensions.columns(),
            rows = dimensions.rows(),
            carved_cells,
            stale_entries,
            "maze carved"
        );

        carving.finish()
    }
}

fn push_frontier(carving: &CarvingGrid, cell: CellCoord, frontier: &mut Vec<FrontierEntry>) {
    let dimensions = carving.dimensions();
    for (columns, rows) in LATTICE_STEPS {
        let Some(target) = cell.offset(columns, rows) else {
            continue;
        };
        if !dimensions.is_interior(target) || !carving.is_wall(target) {
            continue;
        }
        let Some(between) = cell.offset(columns / 2, rows / 2) else {
            continue;
        };
        frontier.push(FrontierEntry { target, between });
    }
}
