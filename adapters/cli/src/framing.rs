//! Orthographic camera framing around a grid.

use glam::Vec2;
use gridwalk_world::Grid;

/// Camera placement that fits the whole grid on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraFraming {
    /// World-space point the camera looks at.
    pub(crate) center: Vec2,
    /// Half of the visible height in world units.
    pub(crate) orthographic_size: f32,
}

impl CameraFraming {
    /// Centres on the grid and sizes the view so both axes fit `aspect`
    /// (width over height), plus `padding` world units.
    pub(crate) fn fit(grid: &Grid, aspect: f32, padding: f32) -> Self {
        let width = grid.total_width();
        let height = grid.total_height();
        let origin = grid.origin();
        let center = Vec2::new(origin.x + width * 0.5, origin.y + height * 0.5);

        let grid_aspect = width / height;
        let half_height = if grid_aspect > aspect {
            width / aspect * 0.5
        } else {
            height * 0.5
        };

        Self {
            center,
            orthographic_size: half_height + padding,
        }
    }
}
