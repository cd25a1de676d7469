//! Session configuration shared by adapters.

use maze_walker_core::{ConfigError, MazeDimensions};
use maze_walker_system_day_night::DayNightConfig;
use maze_walker_system_movement::PlayerTuning;
use serde::{Deserialize, Serialize};

const DEFAULT_COLUMNS: u32 = 21;
const DEFAULT_ROWS: u32 = 21;
const DEFAULT_TILE_SIZE: f32 = 8.0;
const DEFAULT_WALL_HEIGHT: f32 = 7.0;

/// Tunable parameters of a play session.
///
/// Every field has a default, so partial configuration files are accepted.
/// Player tuning is derived from the tile geometry unless overridden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of maze columns; odd and at least five.
    pub columns: u32,
    /// Number of maze rows; odd and at least five.
    pub rows: u32,
    /// Edge length of one maze cell in world units.
    pub tile_size: f32,
    /// Height of the wall volumes in world units.
    pub wall_height: f32,
    /// Seed for reproducible mazes. A fresh maze is generated per session when absent.
    pub seed: Option<u64>,
    /// Day/night cycle timings and palette.
    pub day_night: DayNightConfig,
    /// Explicit player physics, replacing the values derived from the tile geometry.
    pub player: Option<PlayerTuning>,
}

impl GameConfig {
    /// Validated maze extents.
    pub fn dimensions(&self) -> Result<MazeDimensions, ConfigError> {
        Ok(MazeDimensions::new(self.columns, self.rows)?)
    }

    /// Player physics for this configuration.
    #[must_use]
    pub fn player_tuning(&self) -> PlayerTuning {
        self.player
            .unwrap_or_else(|| PlayerTuning::for_tiles(self.tile_size, self.wall_height))
    }

    /// Checks every setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.dimensions()?;
        self.validate_environment()
    }

    /// Checks every setting except the maze extents.
    pub(crate) fn validate_environment(&self) -> Result<(), ConfigError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(ConfigError::InvalidTileSize {
                size: self.tile_size,
            });
        }
        if !self.wall_height.is_finite() || self.wall_height <= 0.0 {
            return Err(ConfigError::InvalidWallHeight {
                height: self.wall_height,
            });
        }
        self.day_night.validate()?;
        self.player_tuning().validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            wall_height: DEFAULT_WALL_HEIGHT,
            seed: None,
            day_night: DayNightConfig::default(),
            player: None,
        }
    }
}
