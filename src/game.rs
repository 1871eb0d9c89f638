use rand::Rng;
use tracing::debug;

use crate::config::{
    DEATH_ANIMATION_LAST_TICK, GridSize, INITIAL_DELAYED_SEGMENTS, SPAWN_POINT,
    START_ANIMATION_INITIAL_TICK,
};
use crate::food::Food;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{self, Position, Segment};

/// Snake, food and heading while the game is being played.
#[derive(Debug, Clone, PartialEq)]
pub struct Gameplay {
    /// Body cells, head first. Never empty.
    pub segments: Vec<Segment>,
    pub food: Option<Food>,
    pub direction: Direction,
    /// Growth units still to be consumed, one per tick.
    pub delayed_segments: u32,
}

impl Gameplay {
    /// Creates a fresh one-cell snake at the spawn point.
    #[must_use]
    pub fn spawn() -> Self {
        Self {
            segments: vec![Segment::head(SPAWN_POINT)],
            food: None,
            direction: Direction::Up,
            delayed_segments: INITIAL_DELAYED_SEGMENTS,
        }
    }

    /// Returns the head segment.
    #[must_use]
    pub fn head(&self) -> Segment {
        *self
            .segments
            .first()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        snake::occupies(&self.segments, position)
    }

    /// Returns the direction actually taken when `requested` is asked for.
    #[must_use]
    pub fn resolve_direction(&self, requested: Direction) -> Direction {
        if direction_change_is_valid(self.direction, requested) {
            requested
        } else {
            self.direction
        }
    }

    fn advance<R: Rng + ?Sized>(
        &self,
        requested: Direction,
        bounds: GridSize,
        rng: &mut R,
    ) -> GameState {
        let direction = self.resolve_direction(requested);
        let head = self.head();
        let new_head = head.position.step(direction);

        if !new_head.is_within_bounds(bounds) || self.occupies(new_head) {
            debug!(?new_head, length = self.segments.len(), "snake crashed");
            return GameState::DeathAnimation {
                head,
                body: self.segments[1..].to_vec(),
                tick: 0,
            };
        }

        // Occupancy is checked before the move: food is consumed one tick
        // after the head lands on it.
        let food_eaten = self.food.is_some_and(|food| self.occupies(food.position));
        let grow = self.delayed_segments > 0 || food_eaten;
        let segments = snake::advance(&self.segments, new_head, grow);

        let delayed_segments = if food_eaten {
            self.delayed_segments
        } else {
            self.delayed_segments.saturating_sub(1)
        };

        let food = if food_eaten { None } else { self.food };
        let food = food.or_else(|| Food::spawn(rng, bounds, &segments));

        if food_eaten {
            debug!(length = segments.len(), "food eaten");
        }
        if food.is_none() {
            debug!("no free cell left for food");
        }

        GameState::Gameplay(Self {
            segments,
            food,
            direction,
            delayed_segments,
        })
    }
}

/// Phase of the game. Replaced wholesale on every tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    /// Intro sweep followed by a blinking spawn point.
    StartAnimation { tick: i32 },
    Gameplay(Gameplay),
    /// Blinking head over the frozen body of the crashed snake.
    DeathAnimation {
        head: Segment,
        body: Vec<Segment>,
        tick: i32,
    },
    /// Terminal state; the tick loop stops once it is observed.
    Exit,
}

impl GameState {
    /// Returns the state the game starts in after launch.
    #[must_use]
    pub fn initial() -> Self {
        Self::StartAnimation {
            tick: START_ANIMATION_INITIAL_TICK,
        }
    }

    #[must_use]
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit)
    }

    /// Computes the state of the next tick.
    ///
    /// `requested` is the latest direction asked for by the player; `rng` is
    /// only consulted when new food has to be placed.
    #[must_use]
    pub fn update<R: Rng + ?Sized>(
        &self,
        requested: Direction,
        bounds: GridSize,
        rng: &mut R,
    ) -> Self {
        match self {
            Self::StartAnimation { tick } => {
                if *tick > i32::from(bounds.height) / 2 + 3 {
                    debug!("start animation finished");
                    Self::Gameplay(Gameplay::spawn())
                } else {
                    Self::StartAnimation { tick: tick + 1 }
                }
            }
            Self::Gameplay(gameplay) => gameplay.advance(requested, bounds, rng),
            Self::DeathAnimation { head, body, tick } => {
                if *tick > DEATH_ANIMATION_LAST_TICK {
                    debug!("death animation finished");
                    Self::StartAnimation { tick: 0 }
                } else {
                    Self::DeathAnimation {
                        head: *head,
                        body: body.clone(),
                        tick: tick + 1,
                    }
                }
            }
            Self::Exit => Self::Exit,
        }
    }
}
