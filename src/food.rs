use rand::Rng;

use crate::config::{COLOR_FOOD, GridSize};
use crate::snake::{Position, Segment, occupies};
use crate::surface::Rgb;

/// Food currently placed on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub position: Position,
    pub color: Rgb,
}

impl Food {
    /// Creates regular food at `position`.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            color: COLOR_FOOD,
        }
    }

    /// Spawns food in an unoccupied cell, or `None` when the board is full.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: GridSize,
        segments: &[Segment],
    ) -> Option<Self> {
        spawn_position(rng, bounds, segments).map(Self::new)
    }
}

/// Picks a free cell uniformly among all cells not covered by `segments`.
///
/// Candidates are collected in row-major order, so a seeded `rng` always
/// yields the same cell for the same board.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    segments: &[Segment],
) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells());

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !occupies(segments, position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}
