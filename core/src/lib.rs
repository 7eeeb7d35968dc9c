#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridwalk engine.
//!
//! This crate defines the value types and the message surface that connect the
//! orchestration layer, the grid model, and the movement system. Drivers submit
//! [`Command`] values describing desired mutations, the movement system applies
//! them against the grid, and then reports the outcome through [`Event`]
//! values. Rejections are ordinary data ([`MoveRejection`], [`SpawnRejection`])
//! rather than errors, because blocked moves are an expected part of play.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible occupant mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a new occupant be spawned at the provided cell.
    SpawnOccupant {
        /// Cell the occupant snaps to without any transition.
        cell: CellCoord,
    },
    /// Requests that an occupant step one cell in the specified direction.
    RequestMove {
        /// Identifier of the occupant attempting to move.
        occupant: OccupantId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Snaps an existing occupant to a new cell, canceling any transition.
    Teleport {
        /// Identifier of the occupant to relocate.
        occupant: OccupantId,
        /// Destination cell.
        cell: CellCoord,
    },
    /// Removes an occupant, discarding any in-flight transition.
    DespawnOccupant {
        /// Identifier of the occupant to remove.
        occupant: OccupantId,
    },
    /// Advances every in-flight transition by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the movement system after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an occupant was created.
    OccupantSpawned {
        /// Identifier assigned to the new occupant.
        occupant: OccupantId,
        /// Cell the occupant committed to.
        cell: CellCoord,
    },
    /// Reports that a spawn request was rejected. No identifier was consumed.
    SpawnRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Specific reason the request failed.
        reason: SpawnRejection,
    },
    /// Confirms that an occupant was snapped to a new cell.
    OccupantTeleported {
        /// Identifier of the relocated occupant.
        occupant: OccupantId,
        /// Cell the occupant now occupies.
        cell: CellCoord,
    },
    /// Reports that a teleport request was rejected. The occupant is unchanged.
    TeleportRejected {
        /// Identifier of the occupant named by the request.
        occupant: OccupantId,
        /// Destination provided in the request.
        cell: CellCoord,
        /// Specific reason the teleport failed.
        reason: SpawnRejection,
    },
    /// Confirms that an occupant committed to a neighbouring cell and began
    /// interpolating toward it.
    MoveStarted {
        /// Identifier of the moving occupant.
        occupant: OccupantId,
        /// Cell the occupant departed.
        from: CellCoord,
        /// Cell the occupant committed to.
        to: CellCoord,
    },
    /// Reports that a move request was rejected. No state changed.
    MoveRejected {
        /// Identifier of the occupant named by the request.
        occupant: OccupantId,
        /// Direction provided in the request.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Announces that an occupant's visual position reached its committed cell.
    MoveCompleted {
        /// Identifier of the occupant that settled.
        occupant: OccupantId,
        /// Cell whose centre the occupant now rests on.
        cell: CellCoord,
    },
    /// Confirms that an occupant was removed.
    OccupantDespawned {
        /// Identifier of the removed occupant.
        occupant: OccupantId,
        /// Cell the occupant held when it was removed.
        cell: CellCoord,
    },
    /// Reports that a despawn request named no live occupant.
    DespawnRejected {
        /// Identifier provided in the request.
        occupant: OccupantId,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
}

/// Cardinal movement directions, listed in neighbour query order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward decreasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Every direction in the fixed order used by neighbour queries.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset applied to a coordinate when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Unique identifier assigned to an occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupantId(u32);

impl OccupantId {
    /// Creates a new occupant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as signed `x` and `y` indices.
///
/// Coordinates are signed so that offsets past the grid edge remain
/// representable; the grid reports such coordinates as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Coordinate one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Coordinate displaced by the provided offsets, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Direction of a single axis-aligned step from `self` to `other`, if they
    /// are adjacent.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == other)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
///
/// The origin is the bottom-left cell; the rectangle extends toward
/// increasing `x` and `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Bottom-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Returns `true` when the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Top-right cell of the rectangle, or `None` for an empty rectangle.
    #[must_use]
    pub fn far_corner(&self) -> Option<CellCoord> {
        if self.is_empty() {
            return None;
        }
        let dx = i32::try_from(self.size.width - 1).unwrap_or(i32::MAX);
        let dy = i32::try_from(self.size.height - 1).unwrap_or(i32::MAX);
        Some(self.origin.offset(dx, dy))
    }

    /// Iterates every covered cell, row by row starting at the origin.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let width = self.size.width;
        let height = self.size.height;
        (0..height).flat_map(move |dy| {
            (0..width).map(move |dx| {
                origin.offset(
                    i32::try_from(dx).unwrap_or(i32::MAX),
                    i32::try_from(dy).unwrap_or(i32::MAX),
                )
            })
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for CellRectSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Types of static props that can be placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropKind {
    /// Boulder blocking its footprint.
    Rock,
    /// Tree blocking its footprint.
    Tree,
    /// Crate blocking its footprint.
    Crate,
    /// Wall segment blocking its footprint.
    Wall,
}

/// Reasons a move request may be rejected by the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The occupant is still transitioning toward its committed cell.
    Busy,
    /// The target coordinate lies outside the grid.
    OutOfBounds,
    /// The target cell is not walkable.
    Blocked,
    /// The target cell is already occupied.
    Occupied,
    /// No occupant with the provided identifier exists.
    UnknownOccupant,
}

/// Reasons a spawn or teleport request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is not walkable.
    Blocked,
    /// The requested cell is already occupied.
    Occupied,
    /// No occupant with the provided identifier exists.
    UnknownOccupant,
    /// Every occupant identifier has already been handed out.
    IdentifiersExhausted,
}
