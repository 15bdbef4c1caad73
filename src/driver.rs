use crate::consts;
use crate::game::{Engine, GameError, GameState, GameStatus, GridSize};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Cues derived from consecutive snapshots, for render layers that play a
/// sound or animation when the snake eats or the session ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameEvent {
    FoodEaten,
    GameOver,
}

/// Owns the current [`GameState`] and funnels every intent (ticks from
/// the internal loop, turns and lifecycle requests from the caller)
/// through one mutex-guarded update point, so a read-modify-replace race
/// between the timer and user input cannot occur.
///
/// While the status is [`GameStatus::Started`] a background thread applies
/// a tick at an interval derived from the snake's length (120 ms up to
/// length 5, 110 ms up to 10, then 100 ms).  Each loop iteration re-checks
/// the status and a generation counter under the lock before stepping:
/// pausing takes effect within one interval, and a loop left over from
/// before a reset can never apply a tick to the new session's state.
///
/// Every accepted transition is published to [`subscribe`] receivers;
/// derived cues go to [`events`] receivers.
///
/// [`subscribe`]: GameDriver::subscribe
/// [`events`]: GameDriver::events
#[derive(Debug)]
pub struct GameDriver<R = StdRng> {
    shared: Arc<Mutex<Shared<R>>>,
    grid: GridSize,
}

#[derive(Debug)]
struct Shared<R> {
    engine: Engine<R>,
    state: GameState,
    epoch: u64,
    watchers: Vec<Sender<GameState>>,
    listeners: Vec<Sender<GameEvent>>,
}

impl GameDriver<StdRng> {
    /// Create a driver with an OS-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GridTooSmall`] for grids below 2 x 2.
    pub fn new(grid: GridSize) -> Result<GameDriver<StdRng>, GameError> {
        GameDriver::with_engine(grid, Engine::with_rng(StdRng::from_os_rng()))
    }
}

impl<R: Rng + Send + 'static> GameDriver<R> {
    /// Create a driver around a caller-supplied engine, e.g. one with a
    /// seeded RNG for reproducible sessions.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GridTooSmall`] for grids below 2 x 2.
    pub fn with_engine(grid: GridSize, mut engine: Engine<R>) -> Result<GameDriver<R>, GameError> {
        let state = engine.initial_state(grid)?;
        Ok(GameDriver {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                state,
                epoch: 0,
                watchers: Vec::new(),
                listeners: Vec::new(),
            })),
            grid,
        })
    }

    /// Begin (or resume) ticking.  Ignored if the game is already running
    /// or over; a finished session can only be revived through [`reset`].
    ///
    /// [`reset`]: GameDriver::reset
    pub fn start(&self) {
        let mut shared = self.lock();
        if shared.state.is_game_over() || shared.state.status() == GameStatus::Started {
            debug!("ignoring start intent: game over or already running");
            return;
        }
        shared.epoch += 1;
        let epoch = shared.epoch;
        let next = shared.state.with_status(GameStatus::Started);
        shared.publish(next);
        drop(shared);
        info!("session started (epoch {epoch})");
        let handle = Arc::clone(&self.shared);
        let _ = thread::spawn(move || run_ticks(&handle, epoch));
    }

    /// Stop ticking.  The loop observes the status change within one tick
    /// interval; the pause itself is unconditional.
    pub fn pause(&self) {
        let mut shared = self.lock();
        let next = shared.state.with_status(GameStatus::Paused);
        shared.publish(next);
        info!("session paused");
    }

    /// Discard the session and publish a brand-new idle state.  Safe to
    /// issue at any time: the generation counter is bumped first, so an
    /// in-flight tick loop retires instead of ticking the fresh state.
    pub fn reset(&self) {
        let mut shared = self.lock();
        shared.epoch += 1;
        let shared = &mut *shared;
        match shared.engine.reset(self.grid) {
            Ok(fresh) => {
                shared.publish(fresh);
                info!("session reset (epoch {})", shared.epoch);
            }
            // The grid was validated at construction; nothing re-sizes it.
            Err(e) => debug!("reset failed: {e}"),
        }
    }

    /// Apply a tap at (`tap_x`, `tap_y`) pixels on a canvas `canvas_width`
    /// pixels wide.  Turn intents are only honored while running; taps
    /// during any other phase are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CanvasTooNarrow`] if `canvas_width` is below
    /// one pixel per grid column.
    pub fn turn(&self, tap_x: f64, tap_y: f64, canvas_width: u32) -> Result<(), GameError> {
        let mut shared = self.lock();
        if shared.state.status() != GameStatus::Started {
            debug!("ignoring turn intent while not running");
            return Ok(());
        }
        let next = shared
            .engine
            .update_direction(&shared.state, tap_x, tap_y, canvas_width)?;
        shared.publish(next);
        Ok(())
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> GameState {
        self.lock().state.clone()
    }

    /// Receive every accepted state transition, starting with the next
    /// one.  Disconnected receivers are dropped on the following publish.
    pub fn subscribe(&self) -> Receiver<GameState> {
        let (tx, rx) = channel();
        self.lock().watchers.push(tx);
        rx
    }

    /// Receive derived cues ([`GameEvent`]) for transitions that grow the
    /// snake or end the game.
    pub fn events(&self) -> Receiver<GameEvent> {
        let (tx, rx) = channel();
        self.lock().listeners.push(tx);
        rx
    }

    fn lock(&self) -> MutexGuard<'_, Shared<R>> {
        self.shared.lock().expect("state mutex should not be poisoned")
    }
}

impl<R> Drop for GameDriver<R> {
    fn drop(&mut self) {
        // Retire any live tick loop; it holds its own Arc to the state.
        if let Ok(mut shared) = self.shared.lock() {
            shared.epoch += 1;
        }
    }
}

impl<R> Shared<R> {
    fn publish(&mut self, next: GameState) {
        let prev = std::mem::replace(&mut self.state, next);
        if self.state.snake().len() > prev.snake().len() {
            self.emit(GameEvent::FoodEaten);
        }
        if self.state.is_game_over() && !prev.is_game_over() {
            self.emit(GameEvent::GameOver);
        }
        self.watchers.retain(|tx| tx.send(self.state.clone()).is_ok());
    }

    fn emit(&mut self, event: GameEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }
}

fn run_ticks<R: Rng>(shared: &Arc<Mutex<Shared<R>>>, epoch: u64) {
    loop {
        let interval = {
            let guard = shared.lock().expect("state mutex should not be poisoned");
            if stale(&guard, epoch) {
                return;
            }
            tick_interval(guard.state.snake().len())
        };
        thread::sleep(interval);
        let mut guard = shared.lock().expect("state mutex should not be poisoned");
        if stale(&guard, epoch) {
            return;
        }
        let inner = &mut *guard;
        let next = inner.engine.tick(&inner.state);
        let over = next.is_game_over();
        inner.publish(next);
        if over {
            info!("game over at score {}", guard.state.score());
            return;
        }
    }
}

fn stale<R>(shared: &Shared<R>, epoch: u64) -> bool {
    if shared.epoch != epoch || shared.state.status() != GameStatus::Started {
        debug!("tick loop for epoch {epoch} retiring");
        true
    } else {
        false
    }
}

/// Tick interval for the driving loop as a function of snake length.  The
/// speed ramp is a property of the loop, not of the engine, which performs
/// one discrete step per call regardless of timing.
pub fn tick_interval(snake_len: usize) -> Duration {
    match snake_len {
        0..=5 => consts::TICK_SLOW,
        6..=10 => consts::TICK_MEDIUM,
        _ => consts::TICK_FAST,
    }
}
