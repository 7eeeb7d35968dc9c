//! Input collaborators that decide when and where the player steps.

use std::time::Duration;

use anyhow::{bail, Result};
use gridwalk_core::{CellCoord, Command, Direction, Event, OccupantId};
use gridwalk_system_movement::Movement;
use gridwalk_world::Grid;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAX_TICKS_PER_STEP: u32 = 10_000;

/// Parses a move script such as `"UURDL"` into directions.
///
/// Whitespace and commas are ignored; letters are case-insensitive.
pub(crate) fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    let mut directions = Vec::new();
    for symbol in script.chars() {
        let direction = match symbol.to_ascii_uppercase() {
            'U' => Direction::Up,
            'D' => Direction::Down,
            'L' => Direction::Left,
            'R' => Direction::Right,
            ' ' | ',' | '\t' => continue,
            other => bail!("unknown move `{other}`; expected one of U, D, L, R"),
        };
        directions.push(direction);
    }
    Ok(directions)
}

/// Seeded walker that picks a random enterable neighbour each step.
#[derive(Debug)]
pub(crate) struct RandomWalker {
    rng: ChaCha8Rng,
}

impl RandomWalker {
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Direction toward a random enterable neighbour, or `None` when boxed in.
    pub(crate) fn next_direction(&mut self, grid: &Grid, cell: CellCoord) -> Option<Direction> {
        let options: Vec<Direction> = grid
            .walkable_neighbours(cell)
            .filter_map(|neighbour| cell.direction_to(neighbour.coord()))
            .collect();
        options.choose(&mut self.rng).copied()
    }
}

/// Requests a single step and ticks until the transition settles.
///
/// Returns every event produced along the way.
pub(crate) fn step(
    grid: &mut Grid,
    movement: &mut Movement,
    occupant: OccupantId,
    direction: Direction,
    dt: Duration,
) -> Vec<Event> {
    let mut events = Vec::new();
    movement.apply(
        grid,
        Command::RequestMove {
            occupant,
            direction,
        },
        &mut events,
    );
    if !matches!(events.last(), Some(Event::MoveStarted { .. })) {
        return events;
    }

    for _ in 0..MAX_TICKS_PER_STEP {
        let before = events.len();
        movement.apply(grid, Command::Tick { dt }, &mut events);
        if events[before..]
            .iter()
            .any(|event| matches!(event, Event::MoveCompleted { occupant: id, .. } if *id == occupant))
        {
            break;
        }
    }
    events
}
