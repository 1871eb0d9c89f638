use crate::config::{COLOR_BACKGROUND, COLOR_BODY, COLOR_HEAD, SPAWN_POINT};
use crate::food::Food;
use crate::game::{GameState, Gameplay};
use crate::snake::{Position, Segment};
use crate::surface::{Rgb, Surface, SurfaceError};

/// Paints `state` onto `surface` and presents it with exactly one flush.
pub fn render<S: Surface + ?Sized>(
    state: &GameState,
    surface: &mut S,
) -> Result<(), SurfaceError> {
    surface.fill(COLOR_BACKGROUND);

    match state {
        GameState::StartAnimation { tick } => render_start_animation(surface, *tick),
        GameState::Gameplay(gameplay) => render_gameplay(surface, gameplay),
        GameState::DeathAnimation { head, body, tick } => {
            render_death_animation(surface, *head, body, *tick);
        }
        GameState::Exit => {}
    }

    surface.flush()
}

fn render_start_animation<S: Surface + ?Sized>(surface: &mut S, tick: i32) {
    let height = i32::from(surface.height());

    if tick < height / 2 {
        for x in 0..i32::from(surface.width()) {
            paint(surface, Position { x, y: tick * 2 }, COLOR_BODY);
            paint(surface, Position { x, y: tick * 2 + 1 }, COLOR_BODY);
        }
    } else if (tick - height) % 2 == 0 {
        paint(surface, SPAWN_POINT, COLOR_HEAD);
    }
}

fn render_gameplay<S: Surface + ?Sized>(surface: &mut S, gameplay: &Gameplay) {
    if let Some(Food { position, color }) = gameplay.food {
        paint(surface, position, color);
    }

    for segment in &gameplay.segments {
        paint(surface, segment.position, segment.color);
    }
}

fn render_death_animation<S: Surface + ?Sized>(
    surface: &mut S,
    head: Segment,
    body: &[Segment],
    tick: i32,
) {
    if tick % 2 == 0 {
        paint(surface, head.position, head.color);
    }

    for segment in body {
        paint(surface, segment.position, segment.color);
    }
}

fn paint<S: Surface + ?Sized>(surface: &mut S, position: Position, color: Rgb) {
    if surface.contains(position) {
        surface.set_color(position, color);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{COLOR_BACKGROUND, COLOR_BODY, COLOR_FOOD, COLOR_HEAD, GridSize};
    use crate::food::Food;
    use crate::game::{GameState, Gameplay};
    use crate::input::Direction;
    use crate::snake::{Position, Segment};
    use crate::surface::FrameBuffer;

    use super::render;

    const BOUNDS: GridSize = GridSize {
        width: 4,
        height: 10,
    };

    fn rendered(state: &GameState) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(BOUNDS);
        render(state, &mut buffer).expect("in-memory render cannot fail");
        buffer
    }

    fn row(y: i32) -> Vec<Position> {
        (0..4).map(|x| Position { x, y }).collect()
    }

    #[test]
    fn start_sweep_draws_two_rows() {
        let buffer = rendered(&GameState::StartAnimation { tick: 2 });

        let mut expected = row(4);
        expected.extend(row(5));
        assert_eq!(buffer.positions_with(COLOR_BODY), expected);
        assert_eq!(buffer.flush_count(), 1);
    }

    #[test]
    fn sweep_rows_below_grid_are_clipped() {
        let buffer = rendered(&GameState::StartAnimation { tick: -1 });
        assert_eq!(buffer.positions_with(COLOR_BACKGROUND).len(), 40);
    }

    #[test]
    fn spawn_point_blinks_after_sweep() {
        let lit = rendered(&GameState::StartAnimation { tick: 6 });
        assert_eq!(lit.positions_with(COLOR_HEAD), vec![Position { x: 0, y: 0 }]);
        assert!(lit.positions_with(COLOR_BODY).is_empty());

        let dark = rendered(&GameState::StartAnimation { tick: 7 });
        assert!(dark.positions_with(COLOR_HEAD).is_empty());
    }

    #[test]
    fn gameplay_draws_food_and_segments() {
        let state = GameState::Gameplay(Gameplay {
            segments: vec![
                Segment::head(Position { x: 1, y: 2 }),
                Segment::body(Position { x: 1, y: 1 }),
            ],
            food: Some(Food::new(Position { x: 3, y: 8 })),
            direction: Direction::Up,
            delayed_segments: 0,
        });

        let buffer = rendered(&state);

        assert_eq!(buffer.positions_with(COLOR_HEAD), vec![Position { x: 1, y: 2 }]);
        assert_eq!(buffer.positions_with(COLOR_BODY), vec![Position { x: 1, y: 1 }]);
        assert_eq!(buffer.positions_with(COLOR_FOOD), vec![Position { x: 3, y: 8 }]);
    }

    #[test]
    fn head_hides_food_under_it() {
        let state = GameState::Gameplay(Gameplay {
            segments: vec![Segment::head(Position { x: 2, y: 2 })],
            food: Some(Food::new(Position { x: 2, y: 2 })),
            direction: Direction::Up,
            delayed_segments: 0,
        });

        let buffer = rendered(&state);

        assert!(buffer.positions_with(COLOR_FOOD).is_empty());
        assert_eq!(buffer.positions_with(COLOR_HEAD), vec![Position { x: 2, y: 2 }]);
    }

    #[test]
    fn death_animation_blinks_head_only() {
        let head = Segment::head(Position { x: 0, y: 9 });
        let body = vec![Segment::body(Position { x: 0, y: 8 })];

        let even = rendered(&GameState::DeathAnimation {
            head,
            body: body.clone(),
            tick: 2,
        });
        assert_eq!(even.positions_with(COLOR_HEAD), vec![head.position]);
        assert_eq!(even.positions_with(COLOR_BODY), vec![body[0].position]);

        let odd = rendered(&GameState::DeathAnimation {
            head,
            body: body.clone(),
            tick: 3,
        });
        assert!(odd.positions_with(COLOR_HEAD).is_empty());
        assert_eq!(odd.positions_with(COLOR_BODY), vec![body[0].position]);
    }

    #[test]
    fn exit_clears_surface() {
        let buffer = rendered(&GameState::Exit);
        assert_eq!(buffer.positions_with(COLOR_BACKGROUND).len(), 40);
        assert_eq!(buffer.flush_count(), 1);
    }
}
