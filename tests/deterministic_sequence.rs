use rand::SeedableRng;
use rand::rngs::StdRng;
use rgb_snake::config::{COLOR_BODY, COLOR_HEAD, GridSize};
use rgb_snake::food::Food;
use rgb_snake::game::{GameState, Gameplay};
use rgb_snake::input::Direction;
use rgb_snake::renderer::render;
use rgb_snake::snake::{Position, Segment};
use rgb_snake::surface::FrameBuffer;

const DEBUG_GRID: GridSize = GridSize {
    width: 4,
    height: 10,
};

#[test]
fn intro_hands_over_to_fresh_snake() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut state = GameState::initial();

    // Ticks -1..=9 animate; the update seen at tick 9 spawns the snake.
    for _ in 0..10 {
        state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
        assert!(matches!(state, GameState::StartAnimation { .. }));
    }
    assert_eq!(state, GameState::StartAnimation { tick: 9 });

    state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
    let GameState::Gameplay(gameplay) = state else {
        panic!("expected gameplay, got {state:?}");
    };
    assert_eq!(gameplay.segments, vec![Segment::head(Position { x: 0, y: 0 })]);
    assert_eq!(gameplay.direction, Direction::Up);
    assert_eq!(gameplay.delayed_segments, 2);
    assert_eq!(gameplay.food, None);
}

#[test]
fn restart_after_death_takes_ten_updates() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut state = GameState::StartAnimation { tick: 0 };

    for _ in 0..10 {
        state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
    }

    assert_eq!(state, GameState::Gameplay(Gameplay::spawn()));
}

#[test]
fn one_cell_grid_kills_immediately() {
    let grid = GridSize {
        width: 1,
        height: 1,
    };

    for requested in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        let mut rng = StdRng::seed_from_u64(5);
        let state = GameState::Gameplay(Gameplay {
            segments: vec![Segment::head(Position { x: 0, y: 0 })],
            food: None,
            direction: Direction::Up,
            delayed_segments: 0,
        });

        assert_eq!(
            state.update(requested, grid, &mut rng),
            GameState::DeathAnimation {
                head: Segment::head(Position { x: 0, y: 0 }),
                body: Vec::new(),
                tick: 0,
            }
        );
    }
}

#[test]
fn full_round_from_spawn_to_restart() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = GameState::Gameplay(Gameplay::spawn());

    // Up the left edge: two delayed segments grow the snake to three cells.
    for _ in 0..9 {
        state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
        if let GameState::Gameplay(gameplay) = &mut state {
            // Keep food out of the column so length only follows the delay.
            gameplay.food = Some(Food::new(Position { x: 3, y: 0 }));
        }
    }

    let GameState::Gameplay(gameplay) = state.clone() else {
        panic!("expected gameplay, got {state:?}");
    };
    assert_eq!(gameplay.head().position, Position { x: 0, y: 9 });
    assert_eq!(gameplay.segments.len(), 3);

    state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
    assert_eq!(
        state,
        GameState::DeathAnimation {
            head: gameplay.segments[0],
            body: gameplay.segments[1..].to_vec(),
            tick: 0,
        }
    );

    let mut frame = FrameBuffer::new(DEBUG_GRID);
    render(&state, &mut frame).expect("in-memory render cannot fail");
    assert_eq!(frame.positions_with(COLOR_HEAD), vec![Position { x: 0, y: 9 }]);
    assert_eq!(
        frame.positions_with(COLOR_BODY),
        vec![Position { x: 0, y: 7 }, Position { x: 0, y: 8 }]
    );

    for _ in 0..6 {
        state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
        assert!(matches!(state, GameState::DeathAnimation { .. }));
    }
    state = state.update(Direction::Up, DEBUG_GRID, &mut rng);
    assert_eq!(state, GameState::StartAnimation { tick: 0 });
}
