#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Walker engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents and frame ticks, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that presentation layers react to. The immutable [`MazeGrid`] produced by
//! the maze generation system is also defined here so every crate shares a
//! single notion of cells, coordinates, and layout invariants.

use std::{collections::VecDeque, fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Walker. Find the exit before nightfall.";

/// Smallest permitted extent of a maze along either axis.
pub const MIN_MAZE_EXTENT: u32 = 5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reports whether the player is actively engaged with the game (pointer locked).
    SetEngaged {
        /// `true` while the player controls the camera.
        engaged: bool,
    },
    /// Replaces the currently held movement keys.
    SetMovement {
        /// Movement flags held during the upcoming ticks.
        intent: MovementIntent,
    },
    /// Updates the horizontal facing of the camera.
    Look {
        /// Rotation around the vertical axis in radians; zero faces negative Z.
        yaw: f32,
    },
    /// Requests a jump on the next tick. Ignored while airborne.
    Jump,
    /// Requests that the handheld torch be lit or extinguished.
    ToggleTorch,
    /// Jumps the day/night cycle to the opposite half.
    ToggleTimeOfDay,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous frame.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the player engaged with or released the game.
    EngagementChanged {
        /// `true` when the player became engaged.
        engaged: bool,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player changed position during a tick.
    PlayerMoved {
        /// World-space position before the tick as `[x, y, z]`.
        from: [f32; 3],
        /// World-space position after the tick as `[x, y, z]`.
        to: [f32; 3],
    },
    /// Confirms that the player left the ground.
    PlayerJumped,
    /// Confirms that the player touched the floor after being airborne.
    PlayerLanded,
    /// Reports that the torch changed state.
    TorchChanged {
        /// `true` when the torch is now lit.
        lit: bool,
    },
    /// Reports that the time of day was overridden by the toggle control.
    TimeOfDayChanged {
        /// Cycle progress immediately after the override.
        progress: f64,
    },
    /// Reports that night started or ended.
    NightfallChanged {
        /// `true` when night just began.
        is_night: bool,
    },
    /// Announces that the player reached the exit tile.
    ExitReached {
        /// Active play time accumulated before the exit was reached.
        elapsed: Duration,
    },
}

/// Lifecycle phase of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// The player has not engaged with the game yet.
    Idle,
    /// The player controls the camera; time and movement advance.
    Active,
    /// The player released control; time is frozen.
    Paused,
    /// The exit was reached; the session is over.
    Won,
}

impl SessionPhase {
    /// Reports whether the simulation advances in this phase.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Optional features unlocked by assets that finished loading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// A handheld torch model is available.
    pub torch: bool,
}

/// Movement keys held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementIntent {
    /// Move along the facing direction.
    pub forward: bool,
    /// Move against the facing direction.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
}

impl MovementIntent {
    /// Intent with every key released.
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
    };

    /// Reports whether any movement key is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Solid wall that blocks horizontal movement.
    Wall,
    /// Carved corridor.
    Path,
    /// Corridor cell where the player spawns.
    Start,
    /// Corridor cell holding the exit marker.
    End,
}

impl CellState {
    /// Reports whether the cell is solid.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Reports whether the player may stand in the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !self.is_wall()
    }

    /// Character used by the text form of a grid.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Path => '.',
            Self::Start => 'S',
            Self::End => 'E',
        }
    }

    /// Parses a character produced by [`CellState::symbol`].
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Path),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            _ => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the coordinate displaced by the provided signed offsets.
    ///
    /// Returns `None` when the result would have a negative component.
    #[must_use]
    pub fn offset(self, columns: i32, rows: i32) -> Option<Self> {
        let column = self.column.checked_add_signed(columns)?;
        let row = self.row.checked_add_signed(rows)?;
        Some(Self::new(column, row))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Validated maze extents. Both axes are odd and at least [`MIN_MAZE_EXTENT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MazeDimensions {
    columns: u32,
    rows: u32,
}

impl MazeDimensions {
    /// Validates the provided extents.
    pub const fn new(columns: u32, rows: u32) -> Result<Self, MazeError> {
        if columns < MIN_MAZE_EXTENT
            || rows < MIN_MAZE_EXTENT
            || columns % 2 == 0
            || rows % 2 == 0
        {
            return Err(MazeError::InvalidDimensions { columns, rows });
        }

        Ok(Self { columns, rows })
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the coordinate lies strictly inside the outer border.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() > 0
            && cell.row() > 0
            && cell.column() < self.columns - 1
            && cell.row() < self.rows - 1
    }

    /// Cell where the player spawns.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Cell holding the exit marker.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        CellCoord::new(self.columns - 2, self.rows - 2)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    fn coord(&self, index: usize) -> CellCoord {
        let width = self.columns as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }
}

/// Mutable workspace used while a maze is being carved.
///
/// Every cell starts as [`CellState::Wall`]. The workspace can only be turned
/// into a [`MazeGrid`] through [`CarvingGrid::finish`], after which the layout
/// is frozen.
#[derive(Clone, Debug)]
pub struct CarvingGrid {
    dimensions: MazeDimensions,
    cells: Vec<CellState>,
}

impl CarvingGrid {
    /// Creates a workspace filled with walls.
    #[must_use]
    pub fn new(dimensions: MazeDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![CellState::Wall; dimensions.cell_count()],
        }
    }

    /// Extents of the workspace.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Reports whether the cell is still solid. Cells outside the grid count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.dimensions
            .index(cell)
            .map_or(true, |index| self.cells[index].is_wall())
    }

    /// Turns the cell into a corridor. Border and out-of-range cells are left untouched.
    pub fn carve(&mut self, cell: CellCoord) {
        if !self.dimensions.is_interior(cell) {
            return;
        }
        if let Some(index) = self.dimensions.index(cell) {
            self.cells[index] = CellState::Path;
        }
    }

    /// Marks the start and end cells and freezes the layout.
    #[must_use]
    pub fn finish(mut self) -> MazeGrid {
        let start = self.dimensions.start();
        let end = self.dimensions.end();
        if let Some(index) = self.dimensions.index(start) {
            self.cells[index] = CellState::Start;
        }
        if let Some(index) = self.dimensions.index(end) {
            self.cells[index] = CellState::End;
        }

        MazeGrid {
            dimensions: self.dimensions,
            cells: self.cells,
        }
    }
}

/// Immutable maze layout shared by rendering, collision, and win detection.
///
/// Cells are stored in row-major order. The grid serialises as a list of text
/// rows (see [`MazeGrid::to_ascii`]) and is validated when deserialised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct MazeGrid {
    dimensions: MazeDimensions,
    cells: Vec<CellState>,
}

impl MazeGrid {
    /// Builds a grid from explicit rows, checking every layout invariant.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, MazeError> {
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let column_count = rows
            .first()
            .map_or(0, |row| u32::try_from(row.len()).unwrap_or(u32::MAX));
        if let Some(index) = rows
            .iter()
            .position(|row| u32::try_from(row.len()).unwrap_or(u32::MAX) != column_count)
        {
            return Err(MazeError::RaggedRows { row: index });
        }

        let dimensions = MazeDimensions::new(column_count, row_count)?;
        let grid = Self {
            dimensions,
            cells: rows.into_iter().flatten().collect(),
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Parses the text form produced by [`MazeGrid::to_ascii`].
    pub fn from_ascii(text: &str) -> Result<Self, MazeError> {
        let mut rows = Vec::new();
        for (row, line) in text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let mut cells = Vec::with_capacity(line.len());
            for (column, symbol) in line.chars().enumerate() {
                let cell = CellState::from_symbol(symbol).ok_or(MazeError::UnknownSymbol {
                    symbol,
                    row,
                    column,
                })?;
                cells.push(cell);
            }
            rows.push(cells);
        }
        Self::from_rows(rows)
    }

    /// Renders the grid as one line of symbols per row.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        self.text_rows().join("\n")
    }

    /// Extents of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Returns the state of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Cell where the player spawns.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.find(CellState::Start)
            .unwrap_or_else(|| self.dimensions.start())
    }

    /// Cell holding the exit marker.
    #[must_use]
    pub fn end(&self) -> CellCoord {
        self.find(CellState::End)
            .unwrap_or_else(|| self.dimensions.end())
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, state)| (self.dimensions.coord(index), *state))
    }

    /// Iterates over the coordinates of every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(|(_, state)| state.is_wall())
            .map(|(cell, _)| cell)
    }

    /// Counts cells in the provided state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Flood fills walkable cells reachable from `origin` using 4-connected moves.
    ///
    /// The returned mask is indexed in row-major order. A wall origin reaches nothing.
    #[must_use]
    pub fn reachable_from(&self, origin: CellCoord) -> Vec<bool> {
        let mut visited = vec![false; self.cells.len()];
        let Some(origin_index) = self.walkable_index(origin) else {
            return visited;
        };

        visited[origin_index] = true;
        let mut queue = VecDeque::from([origin]);
        while let Some(cell) = queue.pop_front() {
            for neighbor in self.walkable_neighbors(cell) {
                let Some(index) = self.dimensions.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                queue.push_back(neighbor);
            }
        }

        visited
    }

    /// Finds the shortest corridor route between two walkable cells, inclusive of both ends.
    #[must_use]
    pub fn shortest_path(&self, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
        let from_index = self.walkable_index(from)?;
        let to_index = self.walkable_index(to)?;

        let mut parents: Vec<Option<usize>> = vec![None; self.cells.len()];
        let mut visited = vec![false; self.cells.len()];
        visited[from_index] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(cell) = queue.pop_front() {
            if cell == to {
                break;
            }
            let Some(current) = self.dimensions.index(cell) else {
                continue;
            };
            for neighbor in self.walkable_neighbors(cell) {
                let Some(index) = self.dimensions.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                parents[index] = Some(current);
                queue.push_back(neighbor);
            }
        }

        if !visited[to_index] {
            return None;
        }

        let mut path = vec![to];
        let mut cursor = to_index;
        while let Some(parent) = parents[cursor] {
            path.push(self.dimensions.coord(parent));
            cursor = parent;
        }
        path.reverse();
        Some(path)
    }

    fn validate(&self) -> Result<(), MazeError> {
        match self.count(CellState::Start) {
            0 => return Err(MazeError::MissingStart),
            1 => {}
            count => return Err(MazeError::DuplicateStart { count }),
        }
        match self.count(CellState::End) {
            0 => return Err(MazeError::MissingEnd),
            1 => {}
            count => return Err(MazeError::DuplicateEnd { count }),
        }

        if let Some((cell, _)) = self
            .iter()
            .find(|(cell, state)| !self.dimensions.is_interior(*cell) && !state.is_wall())
        {
            return Err(MazeError::OpenBorder { cell });
        }

        let start = self.start();
        let end = self.end();
        let reachable = self.reachable_from(start);
        let end_reached = self
            .dimensions
            .index(end)
            .is_some_and(|index| reachable[index]);
        if !end_reached {
            return Err(MazeError::Unreachable { start, end });
        }

        Ok(())
    }

    fn find(&self, state: CellState) -> Option<CellCoord> {
        self.cells
            .iter()
            .position(|cell| *cell == state)
            .map(|index| self.dimensions.coord(index))
    }

    fn walkable_index(&self, cell: CellCoord) -> Option<usize> {
        let index = self.dimensions.index(cell)?;
        self.cells[index].is_walkable().then_some(index)
    }

    fn walkable_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(move |(columns, rows)| cell.offset(columns, rows))
            .filter(move |neighbor| self.cell(*neighbor).is_some_and(CellState::is_walkable))
    }

    fn text_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.dimensions.columns() as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

impl From<MazeGrid> for Vec<String> {
    fn from(grid: MazeGrid) -> Self {
        grid.text_rows()
    }
}

impl TryFrom<Vec<String>> for MazeGrid {
    type Error = MazeError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_ascii(&rows.join("\n"))
    }
}

/// Linear RGB color with channels in the range `0.0..=1.0`.
///
/// Colors serialise as `#rrggbb` strings so configuration files can use the
/// familiar hexadecimal notation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    red: f32,
    green: f32,
    blue: f32,
}

impl Rgb {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from a packed `0xRRGGBB` value.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            red: ((hex >> 16) & 0xff) as f32 / 255.0,
            green: ((hex >> 8) & 0xff) as f32 / 255.0,
            blue: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packs the color into `0xRRGGBB`, rounding each channel.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.red) << 16) | (channel(self.green) << 8) | channel(self.blue)
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> f32 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> f32 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> f32 {
        self.blue
    }

    /// Interpolates channel-wise towards `other`. `t` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
        }
    }

    /// Reports whether every channel lies within `tolerance` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: f32) -> bool {
        (self.red - other.red).abs() <= tolerance
            && (self.green - other.green).abs() <= tolerance
            && (self.blue - other.blue).abs() <= tolerance
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ColorParseError(value.to_owned()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorParseError(value.to_owned()))
    }
}

/// Error returned when a color string is not of the form `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("color '{0}' is not of the form #rrggbb")]
pub struct ColorParseError(String);

/// Reasons a maze layout may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Extents must be odd and at least [`MIN_MAZE_EXTENT`].
    #[error(
        "maze dimensions {columns}x{rows} must be odd and at least {}",
        MIN_MAZE_EXTENT
    )]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// Rows of a textual grid have differing lengths.
    #[error("row {row} does not match the width of the first row")]
    RaggedRows {
        /// Zero-based index of the first offending row.
        row: usize,
    },
    /// A textual grid contains an unrecognised character.
    #[error("unknown cell symbol '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// The grid has no start cell.
    #[error("maze has no start cell")]
    MissingStart,
    /// The grid has more than one start cell.
    #[error("maze has {count} start cells")]
    DuplicateStart {
        /// Number of start cells found.
        count: usize,
    },
    /// The grid has no end cell.
    #[error("maze has no end cell")]
    MissingEnd,
    /// The grid has more than one end cell.
    #[error("maze has {count} end cells")]
    DuplicateEnd {
        /// Number of end cells found.
        count: usize,
    },
    /// A border cell is not a wall.
    #[error("border cell ({}, {}) is not a wall", .cell.column(), .cell.row())]
    OpenBorder {
        /// First open border cell in row-major order.
        cell: CellCoord,
    },
    /// The end cell cannot be reached from the start cell.
    #[error(
        "end ({}, {}) is unreachable from start ({}, {})",
        .end.column(), .end.row(), .start.column(), .start.row()
    )]
    Unreachable {
        /// Start cell of the grid.
        start: CellCoord,
        /// End cell of the grid.
        end: CellCoord,
    },
}

/// Reasons a configuration may be rejected before a session starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The day/night cycle must last a positive, finite number of seconds.
    #[error("cycle duration must be positive and finite, got {seconds}")]
    InvalidCycleDuration {
        /// Rejected duration in seconds.
        seconds: f64,
    },
    /// Tiles must have a positive, finite edge length.
    #[error("tile size must be positive and finite, got {size}")]
    InvalidTileSize {
        /// Rejected tile edge length.
        size: f32,
    },
    /// Walls must have a positive, finite height.
    #[error("wall height must be positive and finite, got {height}")]
    InvalidWallHeight {
        /// Rejected wall height.
        height: f32,
    },
    /// A numeric tuning value is negative or not finite.
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidTuning {
        /// Name of the rejected setting.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The configured maze extents are invalid.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    const SMALL: &str = "\
#######
#S....#
#####.#
#.....#
#.#####
#....E#
#######";

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn dimensions_reject_even_and_small_extents() {
        assert!(MazeDimensions::new(5, 5).is_ok());
        assert_eq!(
            MazeDimensions::new(6, 5),
            Err(MazeError::InvalidDimensions {
                columns: 6,
                rows: 5
            })
        );
        assert!(MazeDimensions::new(5, 8).is_err());
        assert!(MazeDimensions::new(3, 3).is_err());
        assert!(MazeDimensions::new(1, 21).is_err());
    }

    #[test]
    fn dimensions_place_start_and_end_inside_border() {
        let dimensions = MazeDimensions::new(21, 11).expect("valid");
        assert_eq!(dimensions.start(), CellCoord::new(1, 1));
        assert_eq!(dimensions.end(), CellCoord::new(19, 9));
        assert!(dimensions.is_interior(dimensions.end()));
        assert!(!dimensions.is_interior(CellCoord::new(20, 5)));
    }

    #[test]
    fn ascii_round_trips_through_parser() {
        let grid = MazeGrid::from_ascii(SMALL).expect("valid grid");
        assert_eq!(grid.to_ascii(), SMALL);
        assert_eq!(grid.start(), CellCoord::new(1, 1));
        assert_eq!(grid.end(), CellCoord::new(5, 5));
        assert_eq!(grid.cell(CellCoord::new(5, 2)), Some(CellState::Path));
        assert_eq!(grid.cell(CellCoord::new(7, 0)), None);
    }

    #[test]
    fn grid_round_trips_through_bincode() {
        let grid = MazeGrid::from_ascii(SMALL).expect("valid grid");
        assert_round_trip(&grid);
    }

    #[test]
    fn color_round_trips_through_bincode() {
        assert_round_trip(&Rgb::from_hex(0x87ceeb));
    }

    #[test]
    fn validation_rejects_unreachable_end() {
        let text = "\
#######
#S....#
#######
#.....#
#.#####
#....E#
#######";
        assert!(matches!(
            MazeGrid::from_ascii(text),
            Err(MazeError::Unreachable { .. })
        ));
    }

    #[test]
    fn validation_rejects_open_border() {
        let text = "\
#######
#S.....
#####.#
#.....#
#.#####
#....E#
#######";
        assert_eq!(
            MazeGrid::from_ascii(text),
            Err(MazeError::OpenBorder {
                cell: CellCoord::new(6, 1)
            })
        );
    }

    #[test]
    fn validation_counts_markers() {
        let missing_start = SMALL.replace('S', ".");
        assert_eq!(
            MazeGrid::from_ascii(&missing_start),
            Err(MazeError::MissingStart)
        );

        let two_ends = SMALL.replacen("#.....#", "#E....#", 1);
        assert_eq!(
            MazeGrid::from_ascii(&two_ends),
            Err(MazeError::DuplicateEnd { count: 2 })
        );
    }

    #[test]
    fn validation_rejects_malformed_text() {
        assert_eq!(
            MazeGrid::from_ascii("#####\n####\n#####\n#####\n#####"),
            Err(MazeError::RaggedRows { row: 1 })
        );
        assert!(matches!(
            MazeGrid::from_ascii(&SMALL.replacen('.', "x", 1)),
            Err(MazeError::UnknownSymbol { symbol: 'x', .. })
        ));
    }

    #[test]
    fn shortest_path_follows_corridors() {
        let grid = MazeGrid::from_ascii(SMALL).expect("valid grid");
        let path = grid
            .shortest_path(grid.start(), grid.end())
            .expect("end reachable");

        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        assert_eq!(path.len(), 17);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn reachable_from_wall_is_empty() {
        let grid = MazeGrid::from_ascii(SMALL).expect("valid grid");
        let mask = grid.reachable_from(CellCoord::new(0, 0));
        assert!(mask.iter().all(|visited| !visited));
    }

    #[test]
    fn carving_never_opens_the_border() {
        let dimensions = MazeDimensions::new(5, 5).expect("valid");
        let mut carving = CarvingGrid::new(dimensions);
        carving.carve(CellCoord::new(0, 2));
        carving.carve(CellCoord::new(2, 2));
        assert!(carving.is_wall(CellCoord::new(0, 2)));
        assert!(!carving.is_wall(CellCoord::new(2, 2)));
        assert!(carving.is_wall(CellCoord::new(9, 9)));
    }

    #[test]
    fn color_lerp_clamps_and_parses() {
        let black = Rgb::from_hex(0x000000);
        let white = Rgb::from_hex(0xffffff);
        assert_eq!(black.lerp(white, 2.0), white);
        assert!(black
            .lerp(white, 0.5)
            .approx_eq(Rgb::new(0.5, 0.5, 0.5), 1e-6));

        let parsed: Rgb = "#87ceeb".parse().expect("valid color");
        assert_eq!(parsed, Rgb::from_hex(0x87ceeb));
        assert_eq!(parsed.to_string(), "#87ceeb");
        assert!("87ceebff".parse::<Rgb>().is_err());
        assert!("#+abcde".parse::<Rgb>().is_err());
        assert!("0x-12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn movement_intent_reports_any_key() {
        assert!(!MovementIntent::IDLE.any());
        let intent = MovementIntent {
            left: true,
            ..MovementIntent::default()
        };
        assert!(intent.any());
    }
}
