use std::time::Duration;

use clap::ValueEnum;
use thiserror::Error;

use crate::snake::Position;
use crate::surface::Rgb;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

pub const COLOR_HEAD: Rgb = Rgb::new(1.0, 0.0, 0.0);
pub const COLOR_BODY: Rgb = Rgb::new(1.0, 1.0, 1.0);
pub const COLOR_FOOD: Rgb = Rgb::new(0.0, 1.0, 0.0);
pub const COLOR_BACKGROUND: Rgb = Rgb::new(0.0, 0.0, 0.0);

/// Interval between two transitions of the game state.
pub const TICK_DURATION: Duration = Duration::from_millis(500);

/// First wait for the input thread after the tick loop has stopped.
pub const INPUT_JOIN_GRACE: Duration = Duration::from_millis(500);

/// Second wait, after the user was asked to press a key.
pub const INPUT_JOIN_DEADLINE: Duration = Duration::from_secs(5);

/// Cell where a fresh snake appears and the start animation blinks.
pub const SPAWN_POINT: Position = Position { x: 0, y: 0 };

/// Growth units a freshly spawned snake still has to consume.
pub const INITIAL_DELAYED_SEGMENTS: u32 = 2;

/// Tick of the very first start animation after launch.
pub const START_ANIMATION_INITIAL_TICK: i32 = -1;

/// Last tick that still belongs to the death animation.
pub const DEATH_ANIMATION_LAST_TICK: i32 = 5;

/// Output presets offered on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum Frontend {
    /// Terminal preview sized like two RAM sticks (4x10).
    Small,
    /// Terminal preview with a roomier 8x20 grid.
    Large,
}

impl Frontend {
    #[must_use]
    pub fn grid(self) -> GridSize {
        match self {
            Self::Small => GridSize {
                width: 4,
                height: 10,
            },
            Self::Large => GridSize {
                width: 8,
                height: 20,
            },
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "Debug mode (terminal, 4x10)",
            Self::Large => "Debug mode (terminal, 8x20)",
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("tick interval must be greater than zero")]
    ZeroTick,
}

/// Validated runtime settings for one game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub grid: GridSize,
    pub tick: Duration,
    /// Seed for food placement; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(grid: GridSize, tick: Duration, seed: Option<u64>) -> Result<Self, ConfigError> {
        if grid.width == 0 || grid.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: grid.width,
                height: grid.height,
            });
        }

        if tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }

        Ok(Self { grid, tick, seed })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: Frontend::Small.grid(),
            tick: TICK_DURATION,
            seed: None,
        }
    }
}
