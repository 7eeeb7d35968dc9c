//! On-disk level description consumed by the command-line driver.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use gridwalk_core::PropKind;
use gridwalk_system_movement::MovementSettings;
use gridwalk_world::LevelConfig;
use serde::Deserialize;

/// Level description plus the driver-side tables that sit beside it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct LevelFile {
    /// Grid, player start and props.
    #[serde(flatten)]
    pub(crate) level: LevelConfig,
    /// Step timing and occupancy rules.
    #[serde(default)]
    pub(crate) movement: MovementSettings,
    /// Asset name per prop kind, keyed by the kind's name.
    #[serde(default)]
    pub(crate) visuals: BTreeMap<String, String>,
}

impl LevelFile {
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse level file toml contents")
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load level file at {}", path.display()))
    }

    /// Asset configured for the prop kind, if any.
    pub(crate) fn visual_for(&self, kind: PropKind) -> Option<&str> {
        self.visuals
            .get(&format!("{kind:?}"))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_core::CellCoord;
    use gridwalk_system_movement::{Easing, OccupancyPolicy};
    use std::time::Duration;

    const SAMPLE: &str = r#"
        player_start = { x = 4, y = 1 }

        [grid]
        width = 12
        height = 9

        [movement]
        duration_ms = 150
        easing = "Linear"

        [visuals]
        Rock = "props/rock.png"
        Tree = ""

        [[props]]
        kind = "Rock"
        origin = { x = 2, y = 2 }
    "#;

    #[test]
    fn parses_level_and_driver_tables_together() {
        let file = LevelFile::from_toml_str(SAMPLE).expect("level file parses");

        assert_eq!(file.level.player_start, CellCoord::new(4, 1));
        assert_eq!(file.level.grid.width, 12);
        assert_eq!(file.level.props.len(), 1);
        assert_eq!(file.movement.duration, Duration::from_millis(150));
        assert_eq!(file.movement.easing, Easing::Linear);
        assert_eq!(file.movement.occupancy, OccupancyPolicy::Enforced);
    }

    #[test]
    fn blank_or_missing_visuals_resolve_to_none() {
        let file = LevelFile::from_toml_str(SAMPLE).expect("level file parses");

        assert_eq!(file.visual_for(PropKind::Rock), Some("props/rock.png"));
        assert_eq!(file.visual_for(PropKind::Tree), None);
        assert_eq!(file.visual_for(PropKind::Crate), None);
    }

    #[test]
    fn bundled_demo_level_builds() {
        let file = LevelFile::from_toml_str(include_str!("../../../levels/demo.toml"))
            .expect("demo level parses");
        let level = gridwalk_world::Level::build(&file.level).expect("demo level builds");

        assert_eq!(level.props().len(), 4);
        let start = level.grid().cell(level.player_start()).expect("start cell");
        assert!(start.can_enter());
        assert_eq!(file.visual_for(PropKind::Crate), None);
    }
}
