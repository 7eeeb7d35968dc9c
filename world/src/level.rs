//! Level configuration and the grid/prop state it produces.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use gridwalk_core::{CellCoord, CellRectSize, PropKind};
use serde::Deserialize;

use crate::{Grid, GridError, GridParameters, Prop};

/// Static prop instance requested by a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PropSpawn {
    /// Kind of prop to place.
    pub kind: PropKind,
    /// Bottom-left cell of the footprint.
    pub origin: CellCoord,
    /// Footprint dimensions, one cell by default.
    #[serde(default)]
    pub size: CellRectSize,
}

/// Declarative description of a level, usually read from TOML.
///
/// ```toml
/// player_start = { x = 2, y = 2 }
///
/// [grid]
/// width = 8
/// height = 6
///
/// [[props]]
/// kind = "Rock"
/// origin = { x = 3, y = 3 }
/// size = { width = 2, height = 2 }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelConfig {
    /// Grid construction parameters.
    #[serde(default)]
    pub grid: GridParameters,
    /// Cell the player occupant spawns on.
    #[serde(default = "default_player_start")]
    pub player_start: CellCoord,
    /// Props placed in order once the grid exists.
    #[serde(default)]
    pub props: Vec<PropSpawn>,
}

impl LevelConfig {
    /// Parses a level description from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse level toml contents")
    }

    /// Reads and parses the level description at the provided path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load level at {}", path.display()))
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            grid: GridParameters::default(),
            player_start: default_player_start(),
            props: Vec::new(),
        }
    }
}

fn default_player_start() -> CellCoord {
    CellCoord::new(0, 0)
}

/// Grid and props built from a [`LevelConfig`].
///
/// Reloading a level means building a new `Level` and dropping the old one.
#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    props: Vec<Prop>,
    player_start: CellCoord,
}

impl Level {
    /// Constructs the grid and places every configured prop in order.
    pub fn build(config: &LevelConfig) -> Result<Self, GridError> {
        let mut grid = Grid::new(config.grid)?;
        let props = config
            .props
            .iter()
            .map(|spawn| Prop::place(&mut grid, spawn))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            props = props.len(),
            "level built"
        );

        Ok(Self {
            grid,
            props,
            player_start: config.player_start,
        })
    }

    /// Grid owned by the level.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for the movement system.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Props placed while building the level, in configuration order.
    #[must_use]
    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Cell the player occupant should spawn on.
    #[must_use]
    pub const fn player_start(&self) -> CellCoord {
        self.player_start
    }
}
