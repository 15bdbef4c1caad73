mod direction;
mod snake;
pub use self::direction::Direction;
pub use self::snake::Snake;
use crate::consts;
use rand::rngs::ThreadRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A grid cell address.  A plain value type with no identity beyond its
/// fields.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: u16,
    pub y: u16,
}

/// Playing-field dimensions, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl Default for GridSize {
    fn default() -> GridSize {
        consts::DEFAULT_GRID
    }
}

/// Lifecycle phase of a session.
///
/// `Idle` and `Paused` both permit a start; only `Started` permits tick
/// processing; any phase may return to `Idle` via reset.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum GameStatus {
    Idle,
    Started,
    Paused,
}

/// An immutable snapshot of one instant of the game.
///
/// Every intent applied through an [`Engine`] returns a fresh `GameState`;
/// nothing mutates a snapshot in place, and the engine retains no reference
/// to the states it returns.  The driving layer owns the current snapshot
/// and replaces it wholesale on each accepted intent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameState {
    grid: GridSize,
    direction: Direction,
    snake: Snake,
    food: Coordinate,
    game_over: bool,
    status: GameStatus,
}

impl GameState {
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Coordinate {
        self.food
    }

    /// Whether the session has ended.  Monotonic: once set, every further
    /// tick returns the state unchanged.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The score is derived, not stored: one point per food eaten.
    pub fn score(&self) -> usize {
        self.snake.len() - 1
    }

    /// Return a copy of this state with `status` replaced.  The start and
    /// pause intents are plain field updates; gating them on the prior
    /// phase (e.g. refusing to start a finished game) is the driver's job.
    pub fn with_status(&self, status: GameStatus) -> GameState {
        let mut next = self.clone();
        next.status = status;
        next
    }

    #[cfg(test)]
    pub(crate) fn with_food(&self, food: Coordinate) -> GameState {
        let mut next = self.clone();
        next.food = food;
        next
    }

    fn collided(&self) -> GameState {
        let mut next = self.clone();
        next.game_over = true;
        next
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum GameError {
    /// The interior food band `[1, width-1] x [1, height-1]` is empty.
    #[error("grid {width}x{height} is too small to place food inside the border")]
    GridTooSmall { width: u16, height: u16 },
    /// Integer division would make a grid cell zero pixels wide.
    #[error("canvas width {canvas_width}px gives a zero-pixel cell on a {grid_width}-column grid")]
    CanvasTooNarrow { canvas_width: u32, grid_width: u16 },
}

/// The simulation engine: pure state-transition functions plus the one
/// impure seam, the RNG used for food placement.
///
/// The RNG is a type parameter so that tests can drive the engine with a
/// seeded generator and replay identical sessions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Engine<R = ThreadRng> {
    rng: R,
}

impl Engine<ThreadRng> {
    pub fn new() -> Engine<ThreadRng> {
        Engine::with_rng(rand::rng())
    }
}

impl Default for Engine<ThreadRng> {
    fn default() -> Engine<ThreadRng> {
        Engine::new()
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(rng: R) -> Engine<R> {
        Engine { rng }
    }

    /// Create a fresh state: a length-one snake at the fixed start cell,
    /// heading right, idle, with food placed randomly inside the border
    /// ring.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GridTooSmall`] if either dimension is below 2,
    /// which would leave no interior cell to place food in.
    pub fn initial_state(&mut self, grid: GridSize) -> Result<GameState, GameError> {
        if grid.width < 2 || grid.height < 2 {
            return Err(GameError::GridTooSmall {
                width: grid.width,
                height: grid.height,
            });
        }
        let food = self.place_food(grid);
        Ok(GameState {
            grid,
            direction: consts::START_DIRECTION,
            snake: Snake::spawn(consts::SNAKE_START),
            food,
            game_over: false,
            status: GameStatus::Idle,
        })
    }

    /// Discard the current session and create a brand-new initial state.
    /// Always valid, whatever the prior status or game-over flag.
    ///
    /// # Errors
    ///
    /// Same contract as [`Engine::initial_state`].
    pub fn reset(&mut self, grid: GridSize) -> Result<GameState, GameError> {
        self.initial_state(grid)
    }

    /// Advance the simulation by one discrete step.
    ///
    /// A finished game is an absorbing state: the input is returned
    /// unchanged.  Otherwise the head moves one cell along the current
    /// heading and the move is checked against the pre-move body (tail
    /// included) and the field bounds.  The bounds check deliberately
    /// allows `x == width` and `y == height`; only going strictly past the
    /// grid dimension, or below zero, ends the game.  On a collision only
    /// the game-over flag changes; the fatal head cell is not recorded.
    ///
    /// Eating food keeps the grown body and respawns the food; the new
    /// food cell is drawn without checking for overlap with the body, so
    /// it may briefly share a cell with the snake.
    pub fn tick(&mut self, state: &GameState) -> GameState {
        if state.game_over {
            return state.clone();
        }
        let Some(new_head) = state.direction.step(state.snake.head()) else {
            return state.collided();
        };
        if state.snake.contains(new_head)
            || new_head.x > state.grid.width
            || new_head.y > state.grid.height
        {
            return state.collided();
        }
        let mut next = state.clone();
        next.snake.push_head(new_head);
        if new_head == state.food {
            next.food = self.place_food(state.grid);
        } else {
            next.snake.drop_tail();
        }
        next
    }

    /// Apply a tap at pixel offset (`tap_x`, `tap_y`) on a canvas
    /// `canvas_width` pixels wide, turning the snake onto the axis
    /// orthogonal to its current travel.
    ///
    /// While moving vertically a tap left of the head's column turns left,
    /// anything else turns right; while moving horizontally a tap above
    /// the head's row turns up, anything else turns down.  A direct
    /// reversal is structurally impossible.  The head and heading are read
    /// from `state` at the moment the new direction is computed, never
    /// from a stale capture.  No-op on a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CanvasTooNarrow`] if `canvas_width` divided by
    /// the grid width rounds down to zero pixels per cell.
    pub fn update_direction(
        &self,
        state: &GameState,
        tap_x: f64,
        tap_y: f64,
        canvas_width: u32,
    ) -> Result<GameState, GameError> {
        if state.game_over {
            return Ok(state.clone());
        }
        let cell_px = canvas_width / u32::from(state.grid.width);
        if cell_px == 0 {
            return Err(GameError::CanvasTooNarrow {
                canvas_width,
                grid_width: state.grid.width,
            });
        }
        let tap_col = tap_x / f64::from(cell_px);
        let tap_row = tap_y / f64::from(cell_px);
        let head = state.snake.head();
        let direction = match state.direction {
            Direction::Up | Direction::Down => {
                if tap_col < f64::from(head.x) {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
            Direction::Left | Direction::Right => {
                if tap_row < f64::from(head.y) {
                    Direction::Up
                } else {
                    Direction::Down
                }
            }
        };
        let mut next = state.clone();
        next.direction = direction;
        Ok(next)
    }

    /// Draw a food cell uniformly from the interior band
    /// `[1, width-1] x [1, height-1]` (both bounds inclusive).
    fn place_food(&mut self, grid: GridSize) -> Coordinate {
        Coordinate {
            x: self.rng.random_range(1..=grid.width - 1),
            y: self.rng.random_range(1..=grid.height - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn engine() -> Engine<ChaCha12Rng> {
        Engine::with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn started(engine: &mut Engine<ChaCha12Rng>) -> GameState {
        engine
            .initial_state(consts::DEFAULT_GRID)
            .expect("default grid is valid")
            .with_status(GameStatus::Started)
    }

    #[test]
    fn initial_state_defaults() {
        let mut engine = engine();
        let state = engine
            .initial_state(consts::DEFAULT_GRID)
            .expect("default grid is valid");
        assert_eq!(state.snake().head(), consts::SNAKE_START);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.status(), GameStatus::Idle);
        assert!(!state.is_game_over());
        assert_eq!(state.score(), 0);
        let food = state.food();
        assert!((1..=19).contains(&food.x));
        assert!((1..=29).contains(&food.y));
    }

    #[rstest]
    #[case(GridSize { width: 1, height: 30 })]
    #[case(GridSize { width: 20, height: 1 })]
    #[case(GridSize { width: 0, height: 0 })]
    fn degenerate_grid_is_rejected(#[case] grid: GridSize) {
        let mut engine = engine();
        assert_eq!(
            engine.initial_state(grid),
            Err(GameError::GridTooSmall {
                width: grid.width,
                height: grid.height,
            })
        );
    }

    #[test]
    fn tick_moves_the_head_and_keeps_length() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.food = Coordinate { x: 1, y: 1 };
        let next = engine.tick(&state);
        assert_eq!(next.snake().head(), Coordinate { x: 6, y: 5 });
        assert_eq!(next.snake().len(), state.snake().len());
        assert_eq!(next.food(), state.food());
        assert!(!next.is_game_over());
        assert_eq!(next.status(), GameStatus::Started);
    }

    #[test]
    fn eating_food_grows_by_one_and_respawns() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.food = Coordinate { x: 6, y: 5 };
        let next = engine.tick(&state);
        assert_eq!(next.snake().head(), Coordinate { x: 6, y: 5 });
        assert_eq!(next.snake().len(), state.snake().len() + 1);
        assert!(next.snake().contains(consts::SNAKE_START));
        assert_eq!(next.score(), 1);
        assert!((1..=19).contains(&next.food().x));
        assert!((1..=29).contains(&next.food().y));
    }

    #[rstest]
    #[case(Coordinate { x: 20, y: 5 }, Direction::Right)]
    #[case(Coordinate { x: 0, y: 5 }, Direction::Left)]
    #[case(Coordinate { x: 5, y: 0 }, Direction::Up)]
    #[case(Coordinate { x: 5, y: 30 }, Direction::Down)]
    fn wall_hit_ends_the_game(#[case] head: Coordinate, #[case] direction: Direction) {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.snake = Snake::spawn(head);
        state.direction = direction;
        let next = engine.tick(&state);
        assert!(next.is_game_over());
        // Only the flag changes: the fatal head is not appended.
        assert_eq!(next.snake(), state.snake());
        assert_eq!(next.food(), state.food());
        assert_eq!(next.status(), GameStatus::Started);
    }

    #[test]
    fn the_last_column_is_still_playable() {
        // The bound is x > width, not x >= width: a 20-wide grid admits
        // head positions up to x == 20.
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.snake = Snake::spawn(Coordinate { x: 19, y: 5 });
        state.food = Coordinate { x: 1, y: 1 };
        let next = engine.tick(&state);
        assert!(!next.is_game_over());
        assert_eq!(next.snake().head(), Coordinate { x: 20, y: 5 });
    }

    #[test]
    fn self_collision_ends_the_game() {
        // Head-first loop: moving right from (5,5) lands on the tail cell
        // (6,5), which still counts because nothing is removed before the
        // collision check.
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.snake = Snake::spawn(Coordinate { x: 6, y: 5 });
        state.snake.push_head(Coordinate { x: 6, y: 6 });
        state.snake.push_head(Coordinate { x: 5, y: 6 });
        state.snake.push_head(Coordinate { x: 5, y: 5 });
        state.direction = Direction::Right;
        let next = engine.tick(&state);
        assert!(next.is_game_over());
        assert_eq!(next.snake(), state.snake());
    }

    #[test]
    fn game_over_is_absorbing() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.snake = Snake::spawn(Coordinate { x: 20, y: 5 });
        let dead = engine.tick(&state);
        assert!(dead.is_game_over());
        let after = engine.tick(&dead);
        assert_eq!(after, dead);
        assert_eq!(engine.tick(&after), dead);
    }

    #[rstest]
    #[case(Direction::Up, 40.0, 60.0, Direction::Left)]
    #[case(Direction::Up, 60.0, 60.0, Direction::Right)]
    #[case(Direction::Up, 50.0, 60.0, Direction::Right)]
    #[case(Direction::Down, 40.0, 60.0, Direction::Left)]
    #[case(Direction::Down, 60.0, 60.0, Direction::Right)]
    #[case(Direction::Left, 60.0, 40.0, Direction::Up)]
    #[case(Direction::Left, 60.0, 60.0, Direction::Down)]
    #[case(Direction::Right, 60.0, 40.0, Direction::Up)]
    #[case(Direction::Right, 60.0, 60.0, Direction::Down)]
    #[case(Direction::Right, 60.0, 50.0, Direction::Down)]
    fn tap_turns_only_onto_the_orthogonal_axis(
        #[case] heading: Direction,
        #[case] tap_x: f64,
        #[case] tap_y: f64,
        #[case] expected: Direction,
    ) {
        // Head at (5,5) on a 200px canvas: 10px cells, so the head's cell
        // spans pixels [50,60).
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.direction = heading;
        let next = engine
            .update_direction(&state, tap_x, tap_y, 200)
            .expect("canvas is wide enough");
        assert_eq!(next.direction(), expected);
        assert_eq!(next.snake(), state.snake());
        assert_eq!(next.food(), state.food());
        assert_eq!(next.status(), state.status());
    }

    #[test]
    fn turn_is_a_noop_after_game_over() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.game_over = true;
        let next = engine
            .update_direction(&state, 0.0, 0.0, 200)
            .expect("canvas is wide enough");
        assert_eq!(next, state);
    }

    #[test]
    fn zero_pixel_cells_are_an_error() {
        let mut engine = engine();
        let state = started(&mut engine);
        assert_eq!(
            engine.update_direction(&state, 0.0, 0.0, 19),
            Err(GameError::CanvasTooNarrow {
                canvas_width: 19,
                grid_width: 20,
            })
        );
    }

    #[test]
    fn reset_discards_everything() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        state.snake.push_head(Coordinate { x: 6, y: 5 });
        state.game_over = true;
        let fresh = engine
            .reset(consts::DEFAULT_GRID)
            .expect("default grid is valid");
        assert_eq!(fresh.snake().head(), Coordinate { x: 5, y: 5 });
        assert_eq!(fresh.snake().len(), 1);
        assert_eq!(fresh.direction(), Direction::Right);
        assert_eq!(fresh.status(), GameStatus::Idle);
        assert!(!fresh.is_game_over());
    }

    #[test]
    fn status_updates_touch_nothing_else() {
        let mut engine = engine();
        let state = engine
            .initial_state(consts::DEFAULT_GRID)
            .expect("default grid is valid");
        let running = state.with_status(GameStatus::Started);
        assert_eq!(running.status(), GameStatus::Started);
        assert_eq!(running.snake(), state.snake());
        assert_eq!(running.food(), state.food());
        let paused = running.with_status(GameStatus::Paused);
        assert_eq!(paused.status(), GameStatus::Paused);
    }

    #[test]
    fn food_stays_inside_the_border_ring() {
        let mut engine = engine();
        let grid = GridSize {
            width: 4,
            height: 3,
        };
        for _ in 0..200 {
            let food = engine.place_food(grid);
            assert!((1..=3).contains(&food.x), "food x out of band: {food:?}");
            assert!((1..=2).contains(&food.y), "food y out of band: {food:?}");
        }
    }

    #[test]
    fn score_tracks_length_through_a_session() {
        let mut engine = engine();
        let mut state = started(&mut engine);
        for _ in 0..3 {
            state.food = state
                .direction()
                .step(state.snake().head())
                .expect("head is away from the edge");
            state = engine.tick(&state);
        }
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), 3);
    }
}
