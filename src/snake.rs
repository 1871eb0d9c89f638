use crate::config::{COLOR_BODY, COLOR_HEAD, GridSize};
use crate::input::Direction;
use crate::surface::Rgb;

/// Grid position in logical cell coordinates. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring position one step towards `direction`.
    ///
    /// The result may lie outside the grid; callers bounds-check it.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// One occupied cell of the snake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub position: Position,
    pub color: Rgb,
}

impl Segment {
    #[must_use]
    pub fn head(position: Position) -> Self {
        Self {
            position,
            color: COLOR_HEAD,
        }
    }

    #[must_use]
    pub fn body(position: Position) -> Self {
        Self {
            position,
            color: COLOR_BODY,
        }
    }

    /// Returns a copy of this segment placed at `position`.
    #[must_use]
    pub fn moved_to(self, position: Position) -> Self {
        Self { position, ..self }
    }
}

/// Returns true if any segment occupies `position`.
#[must_use]
pub fn occupies(segments: &[Segment], position: Position) -> bool {
    segments.iter().any(|segment| segment.position == position)
}

/// Builds the next body: the head moves to `new_head` and every other segment
/// takes the cell its predecessor held. With `grow`, a body segment is
/// appended on the previous tail cell.
#[must_use]
pub fn advance(segments: &[Segment], new_head: Position, grow: bool) -> Vec<Segment> {
    let mut vacated = new_head;
    let mut next: Vec<Segment> = segments
        .iter()
        .map(|segment| {
            let moved = segment.moved_to(vacated);
            vacated = segment.position;
            moved
        })
        .collect();

    if grow {
        next.push(Segment::body(vacated));
    }

    next
}
