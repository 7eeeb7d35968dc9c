//! Static prop placement onto the grid.

use glam::Vec3;
use gridwalk_core::{CellCoord, CellRect, CellRectSize, PropKind};

use crate::{Grid, GridError, PropSpawn};

/// Static object whose footprint has been stamped onto a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Prop {
    kind: PropKind,
    footprint: CellRect,
    anchor: Vec3,
}

impl Prop {
    /// Marks the spawn's footprint unwalkable and computes its visual anchor.
    ///
    /// Footprint cells outside the grid are skipped. Empty footprints are
    /// rejected before the grid is touched.
    pub fn place(grid: &mut Grid, spawn: &PropSpawn) -> Result<Self, GridError> {
        let footprint = CellRect::from_origin_and_size(spawn.origin, spawn.size);
        if footprint.is_empty() {
            return Err(GridError::EmptyFootprint {
                kind: spawn.kind,
                size: spawn.size,
            });
        }

        let marked = apply_footprint(grid, footprint);
        let anchor = footprint_anchor(grid, footprint);
        tracing::debug!(
            kind = ?spawn.kind,
            origin = ?spawn.origin,
            marked,
            "prop placed"
        );

        Ok(Self {
            kind: spawn.kind,
            footprint,
            anchor,
        })
    }

    /// Kind of prop that was placed.
    #[must_use]
    pub const fn kind(&self) -> PropKind {
        self.kind
    }

    /// Bottom-left cell of the footprint.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.footprint.origin()
    }

    /// Footprint dimensions in cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.footprint.size()
    }

    /// World-space point at which the prop's visual is centred.
    #[must_use]
    pub const fn anchor(&self) -> Vec3 {
        self.anchor
    }
}

/// Marks every in-bounds cell of the rectangle unwalkable.
///
/// Returns the number of grid cells that the rectangle covered. Only the
/// on-grid part of the rectangle is visited.
pub fn apply_footprint(grid: &mut Grid, footprint: CellRect) -> usize {
    let mut marked = 0;
    for coord in grid.clip(footprint).cells() {
        if let Some(cell) = grid.cell_mut(coord) {
            cell.set_walkable(false);
            marked += 1;
        }
    }
    marked
}

/// Midpoint between the world centres of the footprint's bottom-left and
/// top-right cells.
///
/// An empty footprint anchors on its origin cell.
#[must_use]
pub fn footprint_anchor(grid: &Grid, footprint: CellRect) -> Vec3 {
    let bottom_left = grid.cell_center_world(footprint.origin());
    let top_right = footprint
        .far_corner()
        .map_or(bottom_left, |corner| grid.cell_center_world(corner));
    (bottom_left + top_right) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridParameters;

    fn grid(width: u32, height: u32) -> Grid {
        Grid::new(GridParameters {
            width,
            height,
            cell_size: 1.0,
            cell_spacing: 0.0,
            origin: Vec3::ZERO,
        })
        .expect("grid")
    }

    fn spawn(kind: PropKind, x: i32, y: i32, width: u32, height: u32) -> PropSpawn {
        PropSpawn {
            kind,
            origin: CellCoord::new(x, y),
            size: CellRectSize::new(width, height),
        }
    }

    fn blocked(grid: &Grid) -> Vec<CellCoord> {
        grid.cells()
            .filter(|cell| !cell.is_walkable())
            .map(|cell| cell.coord())
            .collect()
    }

    #[test]
    fn two_by_two_prop_blocks_exactly_its_footprint() {
        let mut grid = grid(10, 10);
        let prop = Prop::place(&mut grid, &spawn(PropKind::Rock, 3, 3, 2, 2)).expect("placed");

        assert_eq!(
            blocked(&grid),
            vec![
                CellCoord::new(3, 3),
                CellCoord::new(4, 3),
                CellCoord::new(3, 4),
                CellCoord::new(4, 4),
            ]
        );
        assert!(grid.cells().all(|cell| !cell.is_occupied()));
        assert_eq!(prop.kind(), PropKind::Rock);
        assert_eq!(prop.origin(), CellCoord::new(3, 3));
        assert_eq!(prop.size(), CellRectSize::new(2, 2));
    }

    #[test]
    fn partially_off_grid_footprint_marks_in_bounds_subset() {
        let mut grid = grid(5, 5);
        let footprint =
            CellRect::from_origin_and_size(CellCoord::new(3, 4), CellRectSize::new(3, 2));

        assert_eq!(apply_footprint(&mut grid, footprint), 2);
        assert_eq!(
            blocked(&grid),
            vec![CellCoord::new(3, 4), CellCoord::new(4, 4)]
        );
    }

    #[test]
    fn fully_off_grid_footprint_is_ignored() {
        let mut grid = grid(5, 5);
        let prop = Prop::place(&mut grid, &spawn(PropKind::Tree, -4, -4, 2, 2)).expect("placed");
        assert!(blocked(&grid).is_empty());
        assert_eq!(prop.anchor(), Vec3::new(-3.0, -3.0, 0.0));
    }

    #[test]
    fn huge_footprint_only_visits_on_grid_cells() {
        let mut covered = grid(4, 4);
        let everything = CellRect::from_origin_and_size(
            CellCoord::new(-2, -2),
            CellRectSize::new(u32::MAX, u32::MAX),
        );
        assert_eq!(apply_footprint(&mut covered, everything), 16);

        let mut corner = grid(4, 4);
        let prop = Prop::place(&mut corner, &spawn(PropKind::Wall, 1, 1, u32::MAX, u32::MAX))
            .expect("placed");
        assert_eq!(blocked(&corner).len(), 9);
        assert_eq!(prop.size(), CellRectSize::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn empty_footprint_is_rejected_without_mutation() {
        let mut grid = grid(5, 5);
        let result = Prop::place(&mut grid, &spawn(PropKind::Crate, 1, 1, 0, 2));
        assert_eq!(
            result,
            Err(GridError::EmptyFootprint {
                kind: PropKind::Crate,
                size: CellRectSize::new(0, 2),
            })
        );
        assert!(blocked(&grid).is_empty());
    }

    #[test]
    fn anchor_centres_odd_and_even_footprints() {
        let mut grid = grid(10, 10);
        let single = Prop::place(&mut grid, &spawn(PropKind::Rock, 1, 1, 1, 1)).expect("placed");
        assert_eq!(single.anchor(), Vec3::new(1.5, 1.5, 0.0));

        let even = Prop::place(&mut grid, &spawn(PropKind::Wall, 3, 3, 2, 2)).expect("placed");
        assert_eq!(even.anchor(), Vec3::new(4.0, 4.0, 0.0));

        let wide = Prop::place(&mut grid, &spawn(PropKind::Wall, 6, 0, 3, 1)).expect("placed");
        assert_eq!(wide.anchor(), Vec3::new(7.5, 0.5, 0.0));
    }

    #[test]
    fn overlapping_props_keep_cells_blocked() {
        let mut grid = grid(6, 6);
        let _ = Prop::place(&mut grid, &spawn(PropKind::Rock, 1, 1, 2, 2)).expect("first");
        let _ = Prop::place(&mut grid, &spawn(PropKind::Tree, 2, 2, 2, 2)).expect("second");
        assert_eq!(blocked(&grid).len(), 7);
    }
}
