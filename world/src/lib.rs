#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for Gridwalk.
//!
//! The [`Grid`] is a fixed, dense, row-major array of [`Cell`] values that
//! owns the mapping between cell coordinates and world space. Props stamp
//! their footprints onto it once at load time, and the movement system reads
//! walkability and toggles occupancy while occupants step between cells.

mod level;
mod props;

use glam::Vec3;
use gridwalk_core::{CellCoord, CellRect, CellRectSize, Direction, PropKind};
use serde::Deserialize;
use thiserror::Error;

pub use level::{Level, LevelConfig, PropSpawn};
pub use props::{apply_footprint, footprint_anchor, Prop};

const DEFAULT_GRID_WIDTH: u32 = 10;
const DEFAULT_GRID_HEIGHT: u32 = 10;
const DEFAULT_CELL_SIZE: f32 = 1.0;
const DEFAULT_CELL_SPACING: f32 = 0.5;

/// Errors reported while constructing grids or placing props.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GridError {
    /// Width or height was zero.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// Width or height exceeds the addressable coordinate range.
    #[error("grid dimensions {width}x{height} exceed the addressable range")]
    TooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// Cell size was zero, negative or not finite.
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    /// Cell spacing was negative or not finite.
    #[error("cell spacing must be a non-negative finite number, got {0}")]
    InvalidCellSpacing(f32),
    /// A prop declared a footprint with no cells.
    #[error("{kind:?} prop footprint must be at least 1x1, got {}x{}", .size.width(), .size.height())]
    EmptyFootprint {
        /// Kind of the rejected prop.
        kind: PropKind,
        /// Footprint supplied for the prop.
        size: CellRectSize,
    },
}

/// Level parameters from which a [`Grid`] is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridParameters {
    /// Number of cell columns.
    pub width: u32,
    /// Number of cell rows.
    pub height: u32,
    /// Side length of a square cell in world units.
    pub cell_size: f32,
    /// Gap between neighbouring cells in world units.
    pub cell_spacing: f32,
    /// World-space position of the bottom-left corner of cell `(0, 0)`.
    pub origin: Vec3,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            cell_spacing: DEFAULT_CELL_SPACING,
            origin: Vec3::ZERO,
        }
    }
}

/// A single addressable grid location with walkability and occupancy flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    walkable: bool,
    occupied: bool,
}

impl Cell {
    fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            walkable: true,
            occupied: false,
        }
    }

    /// Coordinate of the cell within its grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Whether the terrain permits entering the cell.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Whether an occupant currently holds the cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Reports whether an occupant may step into the cell.
    #[must_use]
    pub const fn can_enter(&self) -> bool {
        self.walkable && !self.occupied
    }

    /// Overrides the walkability flag.
    pub fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }

    /// Overrides the occupancy flag.
    pub fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }
}

/// Fixed-size 2D container of cells with world-space transforms.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cell_size: f32,
    cell_spacing: f32,
    origin: Vec3,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid with every cell walkable and unoccupied.
    ///
    /// Fails when the parameters describe a degenerate grid, since all of the
    /// world-space math assumes positive dimensions and stride.
    pub fn new(parameters: GridParameters) -> Result<Self, GridError> {
        let GridParameters {
            width,
            height,
            cell_size,
            cell_spacing,
            origin,
        } = parameters;

        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GridError::TooLarge { width, height });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        if !cell_spacing.is_finite() || cell_spacing < 0.0 {
            return Err(GridError::InvalidCellSpacing(cell_spacing));
        }

        let capacity = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| GridError::TooLarge { width, height })?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| GridError::TooLarge { width, height })?;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(Cell::new(CellCoord::new(x, y)));
            }
        }

        tracing::debug!(width, height, cell_size, cell_spacing, "grid initialized");

        Ok(Self {
            width,
            height,
            cell_size,
            cell_spacing,
            origin,
            cells,
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Side length of a single cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Gap between neighbouring cells in world units.
    #[must_use]
    pub const fn cell_spacing(&self) -> f32 {
        self.cell_spacing
    }

    /// World-space distance between the origins of adjacent cells.
    #[must_use]
    pub fn stride(&self) -> f32 {
        self.cell_size + self.cell_spacing
    }

    /// World-space anchor of the bottom-left corner of cell `(0, 0)`.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Reports whether the coordinate addresses a cell of this grid.
    #[must_use]
    pub fn is_valid_coordinate(&self, coord: CellCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Returns the cell at the coordinate, or `None` when it is off-grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).map(|index| &self.cells[index])
    }

    /// Mutable access to the cell at the coordinate, or `None` when it is off-grid.
    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).map(move |index| &mut self.cells[index])
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Existing axis-aligned neighbours in up, down, left, right order.
    pub fn neighbours(&self, coord: CellCoord) -> impl Iterator<Item = &Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.cell(coord.step(direction)))
    }

    /// Neighbours that an occupant may currently step into.
    pub fn walkable_neighbours(&self, coord: CellCoord) -> impl Iterator<Item = &Cell> + '_ {
        self.neighbours(coord).filter(|cell| cell.can_enter())
    }

    /// World-space centre of the cell.
    ///
    /// This is the canonical mapping used for occupant endpoints and prop
    /// anchors; it is defined for off-grid coordinates too.
    #[must_use]
    pub fn cell_center_world(&self, coord: CellCoord) -> Vec3 {
        let stride = self.stride();
        let half = self.cell_size * 0.5;
        self.origin
            + Vec3::new(
                coord.x() as f32 * stride + half,
                coord.y() as f32 * stride + half,
                0.0,
            )
    }

    /// World-space position of the cell's bottom-left corner.
    #[must_use]
    pub fn cell_origin_world(&self, coord: CellCoord) -> Vec3 {
        let stride = self.stride();
        self.origin + Vec3::new(coord.x() as f32 * stride, coord.y() as f32 * stride, 0.0)
    }

    /// Coordinate of the stride-sized square containing the world position.
    ///
    /// Positions inside the spacing gap map to the preceding cell, and the
    /// result may lie outside the grid.
    #[must_use]
    pub fn coordinate_from_world(&self, position: Vec3) -> CellCoord {
        let stride = self.stride();
        let local = position - self.origin;
        CellCoord::new(
            (local.x / stride).floor() as i32,
            (local.y / stride).floor() as i32,
        )
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        span(self.width, self.cell_size, self.cell_spacing)
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        span(self.height, self.cell_size, self.cell_spacing)
    }

    /// Portion of the rectangle that lies on the grid.
    ///
    /// The result is empty when the rectangle misses the grid entirely.
    #[must_use]
    pub fn clip(&self, rect: CellRect) -> CellRect {
        let (x, width) = clip_span(rect.origin().x(), rect.size().width(), self.width);
        let (y, height) = clip_span(rect.origin().y(), rect.size().height(), self.height);
        CellRect::from_origin_and_size(CellCoord::new(x, y), CellRectSize::new(width, height))
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x < self.width && y < self.height {
            let width = usize::try_from(self.width).ok()?;
            Some(usize::try_from(y).ok()? * width + usize::try_from(x).ok()?)
        } else {
            None
        }
    }
}

fn clip_span(start: i32, length: u32, limit: u32) -> (i32, u32) {
    let limit = i64::from(limit);
    let low = i64::from(start).clamp(0, limit);
    let high = (i64::from(start) + i64::from(length)).clamp(low, limit);
    (
        i32::try_from(low).unwrap_or(i32::MAX),
        u32::try_from(high - low).unwrap_or(0),
    )
}

fn span(count: u32, cell_size: f32, cell_spacing: f32) -> f32 {
    count as f32 * cell_size + count.saturating_sub(1) as f32 * cell_spacing
}
