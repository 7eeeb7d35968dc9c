#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that steps occupants between grid cells.
//!
//! Each [`Occupant`] is a two-state machine: idle, or transitioning toward a
//! neighbouring cell it has already committed to. The [`Movement`] roster owns
//! every live occupant, applies [`Command`] values against a borrowed grid, and
//! reports outcomes as [`Event`] values in a deterministic order.

mod occupant;

use std::{collections::BTreeMap, time::Duration};

use gridwalk_core::{Command, Event, MoveRejection, OccupantId, SpawnRejection};
use gridwalk_world::Grid;
use serde::{Deserialize, Deserializer};

pub use occupant::{Occupant, Transition};

const DEFAULT_MOVE_DURATION: Duration = Duration::from_millis(100);

/// Curve applied to a transition's linear progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Decelerates into the destination.
    #[default]
    OutQuad,
}

impl Easing {
    /// Maps linear progress `t` in `0.0..=1.0` onto the eased curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => t * (2.0 - t),
        }
    }
}

/// Decides who maintains the grid's `occupied` flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum OccupancyPolicy {
    /// Occupants claim their cell on spawn, hand it over on every committed
    /// move, and release it on despawn.
    #[default]
    Enforced,
    /// Occupants never touch `occupied`; callers keep cells exclusive.
    CallerManaged,
}

/// Tunables shared by every occupant of a roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Time a single step takes to interpolate.
    #[serde(rename = "duration_ms", deserialize_with = "duration_from_millis")]
    pub duration: Duration,
    /// Curve applied to the interpolation.
    pub easing: Easing,
    /// Who maintains the `occupied` flags.
    pub occupancy: OccupancyPolicy,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_MOVE_DURATION,
            easing: Easing::default(),
            occupancy: OccupancyPolicy::default(),
        }
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Roster that owns occupants and applies movement commands.
#[derive(Debug)]
pub struct Movement {
    occupants: BTreeMap<OccupantId, Occupant>,
    next_occupant_id: Option<OccupantId>,
    settings: MovementSettings,
}

impl Movement {
    /// Creates an empty roster whose occupants use the provided settings.
    #[must_use]
    pub fn new(settings: MovementSettings) -> Self {
        Self {
            occupants: BTreeMap::new(),
            next_occupant_id: Some(OccupantId::new(0)),
            settings,
        }
    }

    /// Applies the command to the roster and grid, appending resulting events.
    pub fn apply(&mut self, grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
        match command {
            Command::SpawnOccupant { cell } => {
                let spawned = self
                    .next_occupant_id
                    .ok_or(SpawnRejection::IdentifiersExhausted)
                    .and_then(|id| Occupant::spawn(id, grid, cell, self.settings));
                match spawned {
                    Ok(occupant) => {
                        let id = occupant.id();
                        self.next_occupant_id = id.get().checked_add(1).map(OccupantId::new);
                        let _ = self.occupants.insert(id, occupant);
                        out_events.push(Event::OccupantSpawned { occupant: id, cell });
                    }
                    Err(reason) => out_events.push(Event::SpawnRejected { cell, reason }),
                }
            }
            Command::RequestMove {
                occupant,
                direction,
            } => {
                let outcome = match self.occupants.get_mut(&occupant) {
                    Some(entry) => {
                        let from = entry.cell();
                        entry
                            .attempt_move(grid, direction)
                            .map(|to| Event::MoveStarted { occupant, from, to })
                    }
                    None => Err(MoveRejection::UnknownOccupant),
                };
                out_events.push(outcome.unwrap_or_else(|reason| Event::MoveRejected {
                    occupant,
                    direction,
                    reason,
                }));
            }
            Command::Teleport { occupant, cell } => {
                let outcome = match self.occupants.get_mut(&occupant) {
                    Some(entry) => entry.initialize(grid, cell),
                    None => Err(SpawnRejection::UnknownOccupant),
                };
                out_events.push(match outcome {
                    Ok(()) => Event::OccupantTeleported { occupant, cell },
                    Err(reason) => Event::TeleportRejected {
                        occupant,
                        cell,
                        reason,
                    },
                });
            }
            Command::DespawnOccupant { occupant } => {
                out_events.push(match self.occupants.remove(&occupant) {
                    Some(entry) => Event::OccupantDespawned {
                        occupant,
                        cell: entry.despawn(grid),
                    },
                    None => Event::DespawnRejected { occupant },
                });
            }
            Command::Tick { dt } => {
                for (id, entry) in &mut self.occupants {
                    if let Some(cell) = entry.advance(dt) {
                        out_events.push(Event::MoveCompleted {
                            occupant: *id,
                            cell,
                        });
                    }
                }
                out_events.push(Event::TimeAdvanced { dt });
            }
        }
    }

    /// Returns the occupant with the provided identifier, if it is alive.
    #[must_use]
    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> {
        self.occupants.get(&id)
    }

    /// Iterates live occupants in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Occupant> {
        self.occupants.values()
    }

    /// Number of live occupants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Returns `true` when no occupants are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(MovementSettings::default())
    }
}
