use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use super::state::Cell;

/// Reasons a [`GameConfig`] cannot start a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least one cell in each dimension, got {width}x{height}")]
    InvalidBoard { width: i32, height: i32 },
    #[error("cell size must be positive and fit the board, got {0}")]
    InvalidCellSize(i32),
    #[error("spawn cell ({x}, {y}) is outside the board")]
    SpawnOutOfBounds { x: i32, y: i32 },
    #[error("spawn ({x}, {y}) is not a cell centre, so food could never be reached")]
    SpawnOffGrid { x: i32, y: i32 },
    #[error("tick interval {initial_ms}ms must be at least the {min_ms}ms floor, and the floor must be positive")]
    InvalidTickInterval { initial_ms: u64, min_ms: u64 },
    #[error("turn buffer must hold at least one pending turn")]
    EmptyTurnBuffer,
}

/// Configuration for the game
///
/// All distances are in board units; cells are `cell_size` units wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the board
    pub board_width: i32,
    /// Height of the board
    pub board_height: i32,
    /// Side length of one grid cell
    pub cell_size: i32,
    /// Where the snake's single segment starts
    pub spawn: Cell,
    /// Direction the snake faces at spawn
    pub initial_direction: Direction,
    /// Tick interval at the start of each game
    pub initial_tick_interval_ms: u64,
    /// Food can never push the interval below this
    pub min_tick_interval_ms: u64,
    /// Maximum number of turn requests waiting for a tick
    pub turn_buffer_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 810,
            board_height: 600,
            cell_size: 30,
            spawn: Cell::new(405, 315),
            initial_direction: Direction::Right,
            initial_tick_interval_ms: 100,
            min_tick_interval_ms: 20,
            turn_buffer_capacity: 3,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size, spawning at the centre cell
    pub fn new(width: i32, height: i32) -> Self {
        let defaults = Self::default();
        let cell = defaults.cell_size;
        let spawn = Cell::center_of(width / cell / 2, height / cell / 2, cell);
        Self {
            board_width: width,
            board_height: height,
            spawn,
            ..defaults
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(300, 300)
    }

    /// Number of grid columns
    pub fn columns(&self) -> i32 {
        self.board_width / self.cell_size
    }

    /// Number of grid rows
    pub fn rows(&self) -> i32 {
        self.board_height / self.cell_size
    }

    /// Check every constraint a session relies on
    ///
    /// The spawn must be a cell centre, the same lattice food is placed on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width <= 0 || self.board_height <= 0 {
            return Err(ConfigError::InvalidBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }

        if self.cell_size <= 0
            || self.cell_size > self.board_width
            || self.cell_size > self.board_height
        {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }

        let Cell { x, y } = self.spawn;
        if x < 0 || x >= self.board_width || y < 0 || y >= self.board_height {
            return Err(ConfigError::SpawnOutOfBounds { x, y });
        }

        if !self.spawn.is_cell_center(self.cell_size) {
            return Err(ConfigError::SpawnOffGrid { x, y });
        }

        if self.min_tick_interval_ms == 0
            || self.initial_tick_interval_ms < self.min_tick_interval_ms
        {
            return Err(ConfigError::InvalidTickInterval {
                initial_ms: self.initial_tick_interval_ms,
                min_ms: self.min_tick_interval_ms,
            });
        }

        if self.turn_buffer_capacity == 0 {
            return Err(ConfigError::EmptyTurnBuffer);
        }

        Ok(())
    }
}
