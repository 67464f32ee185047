//! Cave Flight generator entry point
//!
//! Generates a cave for a seed and prints a summary, or the flattened
//! corridor as JSON for external renderers.

use clap::Parser;
use glam::DVec2;
use serde::Serialize;

use cave_flight::consts::{DEFAULT_SCALE, TARGET_LENGTH};
use cave_flight::sim::{Cave, PointPair};
use cave_flight::{CaveError, GameConfig};

#[derive(Parser, Debug)]
#[command(name = "cave-gen")]
#[command(about = "Generate a procedural flight cave", long_about = None)]
struct Args {
    /// Generator seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Corridor length before scaling
    #[arg(long, default_value_t = TARGET_LENGTH)]
    length: f64,
    /// World scale applied to all lengths
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f64,
    /// Game configuration as JSON; replaces seed, length and scale
    #[arg(long)]
    config: Option<String>,
    /// Print the flattened cave as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct CaveDump<'a> {
    seed: u64,
    point_pairs: &'a [PointPair],
    spawn_segment_index: usize,
    goal_segment_index: usize,
    spawn_location: DVec2,
}

fn main() -> Result<(), CaveError> {
    env_logger::init();
    let args = Args::parse();

    let game = match &args.config {
        Some(json) => GameConfig::from_json(json)?,
        None => GameConfig {
            scale: args.scale,
            length: args.length,
            seed: args.seed,
        },
    };
    log::debug!("Game config: {:?}", game);

    let cave = Cave::from_game_config(&game)?;

    if args.json {
        let dump = CaveDump {
            seed: game.seed,
            point_pairs: cave.point_pairs(),
            spawn_segment_index: cave.spawn_segment_index(),
            goal_segment_index: cave.goal_segment_index(),
            spawn_location: cave.spawn_location(),
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
    } else {
        let length = cave.arc_lengths().last().copied().unwrap_or(0.0);
        println!(
            "seed {}: {} quads, centerline {:.1}, spawn {} at ({:.2}, {:.2}), goal {}",
            game.seed,
            cave.num_quads(),
            length,
            cave.spawn_segment_index(),
            cave.spawn_location().x,
            cave.spawn_location().y,
            cave.goal_segment_index()
        );
    }
    Ok(())
}
