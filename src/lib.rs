//! Deterministic simulation engine for a single-player grid-snake game.
//!
//! The crate has two halves.  [`Engine`] is the simulation itself: pure
//! functions that transform one [`GameState`] snapshot into the next in
//! response to a timer tick, a tap-to-turn intent, or a lifecycle intent
//! (start, pause, reset).  [`GameDriver`] is an optional host for the
//! engine that owns the current snapshot, serializes every intent through
//! a single update point, runs the length-dependent tick loop on a
//! background thread, and publishes each accepted transition to
//! subscribers.  Rendering, input capture, and audio are left entirely to
//! the consumer.
//!
//! ```
//! use snakesim::{Engine, GameStatus, DEFAULT_GRID};
//!
//! let mut engine = Engine::new();
//! let state = engine.initial_state(DEFAULT_GRID)?;
//! let state = state.with_status(GameStatus::Started);
//! let state = engine.tick(&state);
//! assert_eq!(state.snake().head().x, 6);
//! assert_eq!(state.score(), state.snake().len() - 1);
//! # Ok::<(), snakesim::GameError>(())
//! ```
mod config;
mod consts;
mod driver;
mod game;

pub use crate::config::{Config, ConfigError};
pub use crate::consts::{
    DEFAULT_GRID, SNAKE_START, START_DIRECTION, TICK_FAST, TICK_MEDIUM, TICK_SLOW,
};
pub use crate::driver::{tick_interval, GameDriver, GameEvent};
pub use crate::game::{
    Coordinate, Direction, Engine, GameError, GameState, GameStatus, GridSize, Snake,
};
