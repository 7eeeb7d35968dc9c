#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a level and walks the player across it.

mod driver;
mod framing;
mod level_file;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use gridwalk_core::{Command, Event, OccupantId};
use gridwalk_system_movement::Movement;
use gridwalk_world::{Level, Prop};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    driver::{parse_moves, step, RandomWalker},
    framing::CameraFraming,
    level_file::LevelFile,
};

/// Command-line arguments for the grid walker.
#[derive(Debug, Parser)]
#[command(name = "gridwalk", about = "Walks an occupant across a tile grid level.")]
struct CliArgs {
    /// Level file to load; the default 10x10 level is used when omitted.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Scripted moves such as `UURRDL`.
    #[arg(long, value_name = "UDLR", default_value = "")]
    moves: String,
    /// Random steps taken after the scripted moves.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    random_steps: u32,
    /// Seed for the random walk.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated frame length in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Screen aspect ratio (width over height) used to frame the camera.
    #[arg(long, default_value_t = 16.0 / 9.0)]
    aspect: f32,
    /// Extra world units kept around the grid when framing.
    #[arg(long, default_value_t = 1.0)]
    camera_padding: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = CliArgs::parse();
    if !(args.aspect.is_finite() && args.aspect > 0.0) {
        bail!("--aspect must be a positive number, got {}", args.aspect);
    }

    let file = match &args.level {
        Some(path) => LevelFile::load(path)?,
        None => LevelFile::default(),
    };
    let mut level = Level::build(&file.level).context("failed to build level")?;

    let missing = props_missing_visuals(&file, &level);
    if !missing.is_empty() {
        info!(count = missing.len(), "props placed without visuals");
    }

    let framing = CameraFraming::fit(level.grid(), args.aspect, args.camera_padding);
    info!(
        center = ?framing.center,
        orthographic_size = framing.orthographic_size,
        "camera framed"
    );

    let mut movement = Movement::new(file.movement);
    let player = spawn_player(&mut level, &mut movement)?;
    let dt = Duration::from_millis(args.tick_ms);

    let mut completed = 0_usize;
    let mut rejected = 0_usize;
    let mut tally = |events: &[Event]| {
        for event in events {
            match event {
                Event::MoveCompleted { cell, .. } => {
                    completed += 1;
                    info!(cell = ?cell, "player settled");
                }
                Event::MoveRejected {
                    direction, reason, ..
                } => {
                    rejected += 1;
                    info!(?direction, ?reason, "move rejected");
                }
                _ => {}
            }
        }
    };

    for direction in parse_moves(&args.moves)? {
        tally(&step(level.grid_mut(), &mut movement, player, direction, dt));
    }

    let mut walker = RandomWalker::seeded(args.seed);
    for _ in 0..args.random_steps {
        let Some(cell) = movement.occupant(player).map(|occupant| occupant.cell()) else {
            break;
        };
        let Some(direction) = walker.next_direction(level.grid(), cell) else {
            warn!(cell = ?cell, "player is boxed in; random walk stopped");
            break;
        };
        tally(&step(level.grid_mut(), &mut movement, player, direction, dt));
    }

    let occupant = movement
        .occupant(player)
        .context("player occupant disappeared")?;
    let cell = occupant.cell();
    let position = occupant.position();
    println!(
        "player at cell ({}, {}) world ({:.3}, {:.3}, {:.3}) after {completed} moves, {rejected} rejected",
        cell.x(),
        cell.y(),
        position.x,
        position.y,
        position.z,
    );
    Ok(())
}

/// Props whose kind has no configured visual, logging where each visual sits.
fn props_missing_visuals<'a>(file: &LevelFile, level: &'a Level) -> Vec<&'a Prop> {
    level
        .props()
        .iter()
        .filter(|prop| match file.visual_for(prop.kind()) {
            Some(visual) => {
                debug!(kind = ?prop.kind(), visual, anchor = ?prop.anchor(), "prop visual placed");
                false
            }
            None => {
                warn!(
                    kind = ?prop.kind(),
                    origin = ?prop.origin(),
                    anchor = ?prop.anchor(),
                    "no visual configured for prop"
                );
                true
            }
        })
        .collect()
}

fn spawn_player(level: &mut Level, movement: &mut Movement) -> Result<OccupantId> {
    let start = level.player_start();
    let mut events = Vec::new();
    movement.apply(
        level.grid_mut(),
        Command::SpawnOccupant { cell: start },
        &mut events,
    );
    match events.as_slice() {
        [Event::OccupantSpawned { occupant, .. }] => Ok(*occupant),
        [Event::SpawnRejected { reason, .. }] => {
            bail!("player cannot start at ({}, {}): {reason:?}", start.x(), start.y())
        }
        other => bail!("unexpected spawn outcome: {other:?}"),
    }
}
