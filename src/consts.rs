//! Assorted constants & hard-coded configuration
use crate::game::{Coordinate, Direction, GridSize};
use std::time::Duration;

/// Grid dimensions used when no configuration overrides them
pub const DEFAULT_GRID: GridSize = GridSize {
    width: 20,
    height: 30,
};

/// The cell the snake starts on in every fresh session
pub const SNAKE_START: Coordinate = Coordinate { x: 5, y: 5 };

/// The heading of a freshly spawned snake
pub const START_DIRECTION: Direction = Direction::Right;

/// Tick interval while the snake is short (lengths 1 through 5)
pub const TICK_SLOW: Duration = Duration::from_millis(120);

/// Tick interval at lengths 6 through 10
pub const TICK_MEDIUM: Duration = Duration::from_millis(110);

/// Tick interval once the snake is longer than 10 cells
pub const TICK_FAST: Duration = Duration::from_millis(100);
