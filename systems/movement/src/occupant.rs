//! Per-entity movement state machine.

use std::time::Duration;

use glam::Vec3;
use gridwalk_core::{CellCoord, Direction, MoveRejection, OccupantId, SpawnRejection};
use gridwalk_world::Grid;

use crate::{Easing, MovementSettings, OccupancyPolicy};

/// In-flight interpolation between two cell centres.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    from: CellCoord,
    to: CellCoord,
    start: Vec3,
    end: Vec3,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    fn new(
        from: CellCoord,
        to: CellCoord,
        start: Vec3,
        end: Vec3,
        settings: &MovementSettings,
    ) -> Self {
        Self {
            from,
            to,
            start,
            end,
            elapsed: Duration::ZERO,
            duration: settings.duration,
            easing: settings.easing,
        }
    }

    /// Cell the occupant departed.
    #[must_use]
    pub const fn departed(&self) -> CellCoord {
        self.from
    }

    /// Cell the occupant committed to.
    #[must_use]
    pub const fn destination(&self) -> CellCoord {
        self.to
    }

    /// Time accumulated since the transition began.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total time the transition takes.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear completion ratio in `0.0..=1.0`, before easing.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn position(&self) -> Vec3 {
        if self.is_complete() {
            return self.end;
        }
        self.start.lerp(self.end, self.easing.apply(self.progress()))
    }
}

/// Grid-bound entity that steps between adjacent cells.
///
/// The logical [`cell`](Self::cell) is committed when a move starts, so the
/// departed cell is never targeted twice; the visual [`position`](Self::position)
/// catches up over the following ticks. The occupant holds no reference to the
/// grid; every operation that needs it borrows it explicitly.
#[derive(Clone, Debug)]
pub struct Occupant {
    id: OccupantId,
    cell: CellCoord,
    position: Vec3,
    transition: Option<Transition>,
    settings: MovementSettings,
}

impl Occupant {
    /// Creates an idle occupant snapped to the centre of `start`.
    ///
    /// With [`OccupancyPolicy::Enforced`] the start cell must be enterable and
    /// is claimed; otherwise only its existence is checked.
    pub fn spawn(
        id: OccupantId,
        grid: &mut Grid,
        start: CellCoord,
        settings: MovementSettings,
    ) -> Result<Self, SpawnRejection> {
        check_spawn_cell(grid, start, settings.occupancy)?;
        if settings.occupancy == OccupancyPolicy::Enforced {
            set_occupied(grid, start, true);
        }

        tracing::debug!(occupant = id.get(), cell = ?start, "occupant spawned");

        Ok(Self {
            id,
            cell: start,
            position: grid.cell_center_world(start),
            transition: None,
            settings,
        })
    }

    /// Snaps the occupant to `start`, canceling any in-flight transition.
    ///
    /// The canceled transition never completes. Re-initialising onto the
    /// occupant's own cell is always allowed. On rejection nothing changes.
    pub fn initialize(&mut self, grid: &mut Grid, start: CellCoord) -> Result<(), SpawnRejection> {
        if start != self.cell {
            check_spawn_cell(grid, start, self.settings.occupancy)?;
        } else if !grid.is_valid_coordinate(start) {
            return Err(SpawnRejection::OutOfBounds);
        }

        if self.settings.occupancy == OccupancyPolicy::Enforced {
            set_occupied(grid, self.cell, false);
            set_occupied(grid, start, true);
        }

        self.transition = None;
        self.cell = start;
        self.position = grid.cell_center_world(start);
        Ok(())
    }

    /// Attempts to start a transition one cell in `direction`.
    ///
    /// Only the target cell is inspected. On success the logical cell is
    /// updated immediately and the new target is returned.
    pub fn attempt_move(
        &mut self,
        grid: &mut Grid,
        direction: Direction,
    ) -> Result<CellCoord, MoveRejection> {
        if self.transition.is_some() {
            return Err(MoveRejection::Busy);
        }

        let target = self.cell.step(direction);
        let cell = grid.cell(target).ok_or(MoveRejection::OutOfBounds)?;
        if !cell.is_walkable() {
            return Err(MoveRejection::Blocked);
        }
        if cell.is_occupied() {
            return Err(MoveRejection::Occupied);
        }

        let from = self.cell;
        if self.settings.occupancy == OccupancyPolicy::Enforced {
            set_occupied(grid, from, false);
            set_occupied(grid, target, true);
        }

        self.cell = target;
        self.transition = Some(Transition::new(
            from,
            target,
            self.position,
            grid.cell_center_world(target),
            &self.settings,
        ));
        Ok(target)
    }

    /// Requests a single step, reporting whether a transition started.
    ///
    /// Never blocks and never queues: a request while moving returns `false`.
    pub fn request_move(&mut self, grid: &mut Grid, direction: Direction) -> bool {
        self.attempt_move(grid, direction).is_ok()
    }

    /// Advances the in-flight transition by `dt`.
    ///
    /// Returns the settled cell on the tick the transition completes, at which
    /// point the visual position equals that cell's centre exactly.
    pub fn advance(&mut self, dt: Duration) -> Option<CellCoord> {
        let transition = self.transition.as_mut()?;
        transition.elapsed = transition.elapsed.saturating_add(dt);

        if transition.is_complete() {
            self.position = transition.end;
            self.transition = None;
            Some(self.cell)
        } else {
            self.position = transition.position();
            None
        }
    }

    /// Removes the occupant, returning the cell it held.
    ///
    /// Any in-flight transition is dropped with the occupant and never
    /// completes. With [`OccupancyPolicy::Enforced`] the cell is released.
    pub fn despawn(self, grid: &mut Grid) -> CellCoord {
        if self.settings.occupancy == OccupancyPolicy::Enforced {
            set_occupied(grid, self.cell, false);
        }
        tracing::debug!(occupant = self.id.get(), cell = ?self.cell, "occupant despawned");
        self.cell
    }

    /// Identifier of the occupant.
    #[must_use]
    pub const fn id(&self) -> OccupantId {
        self.id
    }

    /// Logical cell the occupant has committed to.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current visual position in world space.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.transition.is_some()
    }

    /// In-flight transition, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }
}

fn check_spawn_cell(
    grid: &Grid,
    start: CellCoord,
    occupancy: OccupancyPolicy,
) -> Result<(), SpawnRejection> {
    let cell = grid.cell(start).ok_or(SpawnRejection::OutOfBounds)?;
    if occupancy == OccupancyPolicy::Enforced {
        if !cell.is_walkable() {
            return Err(SpawnRejection::Blocked);
        }
        if cell.is_occupied() {
            return Err(SpawnRejection::Occupied);
        }
    }
    Ok(())
}

fn set_occupied(grid: &mut Grid, coord: CellCoord, occupied: bool) {
    if let Some(cell) = grid.cell_mut(coord) {
        cell.set_occupied(occupied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_world::GridParameters;

    fn grid() -> Grid {
        Grid::new(GridParameters {
            width: 5,
            height: 5,
            cell_size: 1.0,
            cell_spacing: 0.0,
            origin: Vec3::ZERO,
        })
        .expect("grid")
    }

    fn linear(duration_ms: u64) -> MovementSettings {
        MovementSettings {
            duration: Duration::from_millis(duration_ms),
            easing: Easing::Linear,
            occupancy: OccupancyPolicy::Enforced,
        }
    }

    #[test]
    fn progress_is_clamped_and_handles_zero_duration() {
        let settings = linear(100);
        let mut transition = Transition::new(
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            Vec3::ZERO,
            Vec3::Y,
            &settings,
        );
        assert_eq!(transition.progress(), 0.0);
        transition.elapsed = Duration::from_millis(50);
        assert!((transition.progress() - 0.5).abs() < 1e-6);
        transition.elapsed = Duration::from_millis(500);
        assert_eq!(transition.progress(), 1.0);
        assert_eq!(transition.position(), Vec3::Y);

        let instant = Transition::new(
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            Vec3::ZERO,
            Vec3::Y,
            &linear(0),
        );
        assert_eq!(instant.progress(), 1.0);
    }

    #[test]
    fn linear_interpolation_tracks_elapsed_time() {
        let mut grid = grid();
        let mut occupant =
            Occupant::spawn(OccupantId::new(0), &mut grid, CellCoord::new(1, 1), linear(100))
                .expect("spawned");

        assert!(occupant.request_move(&mut grid, Direction::Right));
        assert_eq!(occupant.advance(Duration::from_millis(25)), None);
        let position = occupant.position();
        assert!((position.x - 1.75).abs() < 1e-5);
        assert!((position.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_transition_completes_on_next_advance() {
        let mut grid = grid();
        let mut occupant =
            Occupant::spawn(OccupantId::new(0), &mut grid, CellCoord::new(1, 1), linear(0))
                .expect("spawned");

        assert!(occupant.request_move(&mut grid, Direction::Up));
        assert!(occupant.is_moving());
        assert_eq!(occupant.advance(Duration::ZERO), Some(CellCoord::new(1, 2)));
        assert!(!occupant.is_moving());
    }

    #[test]
    fn reinitialising_onto_own_cell_is_allowed() {
        let mut grid = grid();
        let start = CellCoord::new(2, 2);
        let mut occupant =
            Occupant::spawn(OccupantId::new(0), &mut grid, start, linear(100)).expect("spawned");

        assert_eq!(occupant.initialize(&mut grid, start), Ok(()));
        assert!(grid.cell(start).expect("cell").is_occupied());
    }
}
