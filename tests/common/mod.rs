#![allow(dead_code)]

use gridcaster::{Config, GridMap, Player, Pose, Simulation};
use std::path::{Path, PathBuf};

pub const CELL: f32 = 64.0;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new("./test_data").join(name)
}

/// Load a map from test_data/maps
pub fn load_fixture_map(name: &str) -> GridMap {
    let path = fixture_path("maps").join(name);
    match GridMap::load(&path, CELL) {
        Ok(grid) => grid,
        Err(e) => panic!("fixture {} failed to load: {:#}", path.display(), e),
    }
}

/// Player at a position given in cells
pub fn player_at(x_cells: f32, y_cells: f32, angle: f32) -> Player {
    Player::new(
        Pose {
            x: x_cells * CELL,
            y: y_cells * CELL,
            angle,
        },
        10.0,
    )
}

/// Simulation on the built-in map with default configuration
pub fn sample_simulation() -> Simulation {
    let config = Config::default();
    Simulation::with_grid(&config, GridMap::sample(CELL))
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32, what: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{}: expected {} got {} (tolerance {})",
        what,
        expected,
        actual,
        tolerance
    );
}
