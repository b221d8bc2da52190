//! Headless replay of a recorded event log
//!
//! Loads config.toml (or defaults), the configured map and a JSON event log,
//! runs every recorded frame and prints the player pose and center ray per frame.

use anyhow::Result;
use gridcaster::{Config, EventLog, Simulation};
use std::env;
use std::path::Path;

const COLUMNS: usize = 320;
const SCREEN_HEIGHT: f32 = 200.0;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <events.json> [config.toml]", args[0]);
        eprintln!("Replays a recorded event log and prints per-frame pose and center ray");
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => Config::load_from(Path::new(path)),
        None => Config::load(),
    };
    let log = EventLog::load_from_file(Path::new(&args[1]))?;
    let mut sim = Simulation::from_config(&config)?;

    log.print();

    log.replay(&mut sim, COLUMNS, SCREEN_HEIGHT, |sim, frame| {
        let player = sim.player();
        let center = frame.rays.center();
        let hit = match center {
            Some(ray) if !ray.is_out_of_bounds() => format!(
                "{:?} hit ({}, {}) code {} at {:.2}",
                ray.orientation,
                ray.cell_x,
                ray.cell_y,
                ray.code.unwrap_or(0),
                ray.distance
            ),
            Some(ray) => format!("escaped at {:.2}", ray.distance),
            None => "no rays".to_string(),
        };
        println!(
            "[frame {:6}] pos ({:8.2}, {:8.2}) angle {:6.3} {}{}",
            frame.index,
            player.x,
            player.y,
            player.angle,
            hit,
            match frame.cleared {
                Some((x, y)) => format!(" cleared ({}, {})", x, y),
                None => String::new(),
            }
        );
    });

    println!("\n=== Summary ===");
    println!("{}", log.summary());
    println!("Grid revision: {}", sim.grid().revision);

    Ok(())
}
