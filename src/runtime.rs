//! Tick loop and input thread sharing one mutex-guarded game state.
//!
//! The tick loop snapshots `(state, requested direction)` under the lock,
//! computes the next state outside of it and publishes the result only if no
//! exit was requested in the meantime. The input thread only ever touches the
//! requested direction or replaces the state with [`GameState::Exit`].

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{GameConfig, INPUT_JOIN_DEADLINE, INPUT_JOIN_GRACE};
use crate::game::GameState;
use crate::input::{Direction, GameInput, InputSource, map_key};
use crate::renderer::render;
use crate::surface::{Surface, SurfaceError};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to spawn input thread: {0}")]
    Spawn(#[source] io::Error),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// How the input thread ended once the tick loop stopped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Shutdown {
    /// The input thread finished and was joined.
    Clean,
    /// The input thread is still blocked on a read and was left behind.
    InputStuck,
}

#[derive(Debug)]
struct Shared {
    state: GameState,
    requested: Direction,
}

/// Game state and requested direction behind a single lock.
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<Mutex<Shared>>,
}

impl SharedState {
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                state,
                requested: Direction::Up,
            })),
        }
    }

    // Every write replaces whole values, so a poisoned lock still holds a
    // consistent record.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current state together with the latest requested direction.
    #[must_use]
    pub fn snapshot(&self) -> (GameState, Direction) {
        let shared = self.lock();
        (shared.state.clone(), shared.requested)
    }

    /// Installs `next` unless an exit was requested since the snapshot.
    ///
    /// During gameplay the requested direction is reset to the direction the
    /// snake actually took, so a rejected reversal does not linger.
    pub fn publish(&self, next: &GameState) -> bool {
        let mut shared = self.lock();
        if shared.state.is_exit() {
            return false;
        }

        shared.state = next.clone();
        if let GameState::Gameplay(gameplay) = next {
            shared.requested = gameplay.direction;
        }
        true
    }

    pub fn request_direction(&self, direction: Direction) {
        self.lock().requested = direction;
    }

    pub fn request_exit(&self) {
        self.lock().state = GameState::Exit;
    }

    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.lock().state.is_exit()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn requested_direction(&self) -> Direction {
        self.lock().requested
    }
}

/// Forces the shared state to [`GameState::Exit`] when dropped, including
/// while unwinding out of a panicking input source.
struct ExitOnDrop<'a>(&'a SharedState);

impl Drop for ExitOnDrop<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("input thread panicked");
        }
        self.0.request_exit();
    }
}

/// Translates key presses into direction requests until an exit is seen.
///
/// Read failures end the loop like an exit key does. The state is always
/// left at [`GameState::Exit`] when this returns or unwinds.
pub fn input_loop<I: InputSource + ?Sized>(shared: &SharedState, source: &mut I) {
    let _exit = ExitOnDrop(shared);

    while !shared.is_exit() {
        let key = match source.read_key() {
            Ok(key) => key,
            Err(error) => {
                error!(%error, "input thread crashed");
                break;
            }
        };

        match map_key(key) {
            Some(GameInput::Direction(direction)) => {
                debug!(?direction, "direction requested");
                shared.request_direction(direction);
            }
            Some(GameInput::Exit) => {
                info!("exit requested");
                break;
            }
            None => {}
        }
    }
}

type WaitHint = Box<dyn FnMut() + Send>;

/// Fixed-interval driver of the game.
pub struct Scheduler<R> {
    shared: SharedState,
    tick: Duration,
    rng: R,
    join_grace: Duration,
    join_deadline: Duration,
    wait_hint: Option<WaitHint>,
}

impl<R> fmt::Debug for Scheduler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("shared", &self.shared)
            .field("tick", &self.tick)
            .field("join_grace", &self.join_grace)
            .field("join_deadline", &self.join_deadline)
            .field("wait_hint", &self.wait_hint.is_some())
            .finish_non_exhaustive()
    }
}

impl Scheduler<StdRng> {
    /// Creates a scheduler from validated settings, seeding food placement.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::new(config.tick, rng)
    }
}

impl<R: Rng> Scheduler<R> {
    #[must_use]
    pub fn new(tick: Duration, rng: R) -> Self {
        Self {
            shared: SharedState::new(GameState::initial()),
            tick,
            rng,
            join_grace: INPUT_JOIN_GRACE,
            join_deadline: INPUT_JOIN_DEADLINE,
            wait_hint: None,
        }
    }

    /// Starts from `state` instead of the intro animation.
    #[must_use]
    pub fn with_state(mut self, state: GameState) -> Self {
        self.shared = SharedState::new(state);
        self
    }

    /// Overrides how long shutdown waits for the input thread.
    #[must_use]
    pub fn with_join_timeouts(mut self, grace: Duration, deadline: Duration) -> Self {
        self.join_grace = grace;
        self.join_deadline = deadline;
        self
    }

    /// Sets what to show the player when the input thread outlives the
    /// grace period and needs a key press to wake up.
    #[must_use]
    pub fn with_input_wait_hint<F>(mut self, hint: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.wait_hint = Some(Box::new(hint));
        self
    }

    /// Returns a handle to the state shared with the input thread.
    #[must_use]
    pub fn shared(&self) -> SharedState {
        self.shared.clone()
    }

    /// Runs the game until an exit is requested.
    ///
    /// Spawns the input thread, drives the tick loop on the calling thread and
    /// then waits a bounded time for the input thread to finish. A render
    /// failure stops the loop and is returned after that wait.
    pub fn run<S, I>(mut self, surface: &mut S, mut input: I) -> Result<Shutdown, RuntimeError>
    where
        S: Surface + ?Sized,
        I: InputSource + Send + 'static,
    {
        let (done_tx, done_rx) = mpsc::channel();
        let shared = self.shared.clone();
        let handle = thread::Builder::new()
            .name("input".to_owned())
            .spawn(move || {
                input_loop(&shared, &mut input);
                let _ = done_tx.send(());
            })
            .map_err(RuntimeError::Spawn)?;

        info!(
            width = surface.width(),
            height = surface.height(),
            tick = ?self.tick,
            "game started"
        );

        let outcome = self.tick_loop(surface);
        if let Err(error) = &outcome {
            error!(%error, "tick loop failed");
        }

        self.shared.request_exit();
        let shutdown = self.join_input(handle, &done_rx);
        info!(?shutdown, "game stopped");

        outcome.map(|()| shutdown)
    }

    fn tick_loop<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), RuntimeError> {
        let bounds = surface.grid();

        while !self.shared.is_exit() {
            thread::sleep(self.tick);

            let (state, requested) = self.shared.snapshot();
            if state.is_exit() {
                break;
            }

            let next = state.update(requested, bounds, &mut self.rng);
            if !self.shared.publish(&next) {
                break;
            }

            render(&next, surface)?;
        }

        Ok(())
    }

    fn join_input(&mut self, handle: JoinHandle<()>, done: &Receiver<()>) -> Shutdown {
        let finished = wait_for(done, self.join_grace) || {
            warn!("input thread still blocked; press any key to exit");
            if let Some(hint) = self.wait_hint.as_mut() {
                hint();
            }
            wait_for(done, self.join_deadline)
        };

        if !finished {
            error!("input thread did not stop in time");
            return Shutdown::InputStuck;
        }

        // Panics were already logged from the input thread.
        let _ = handle.join();
        Shutdown::Clean
    }
}

// A disconnected channel means the thread is gone, panicked or not.
fn wait_for(done: &Receiver<()>, timeout: Duration) -> bool {
    !matches!(done.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
}
