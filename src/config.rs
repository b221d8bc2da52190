use crate::grid::DEFAULT_CELL_SIZE;
use crate::player::Pose;
use crate::projection::{DEFAULT_PROJECTION_FACTOR, DEFAULT_WALL_SCALE};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct WorldConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Map file; the built-in sample map is used when unset
    #[serde(default)]
    pub map_path: Option<String>,
}

/// Poses are given in cells and converted with the world cell size
#[derive(Debug, Deserialize, PartialEq)]
pub struct PlayerConfig {
    #[serde(default = "default_spawn_x")]
    pub spawn_x: f32,
    #[serde(default = "default_spawn_y")]
    pub spawn_y: f32,
    #[serde(default)]
    pub spawn_angle: f32,
    #[serde(default = "default_reset_x")]
    pub reset_x: f32,
    #[serde(default = "default_reset_y")]
    pub reset_y: f32,
    #[serde(default = "default_reset_angle")]
    pub reset_angle: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default = "default_sprint_multiplier")]
    pub sprint_multiplier: f32,
    /// Degrees of rotation per pixel of horizontal mouse motion
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default = "default_player_size")]
    pub size: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "default_projection_factor")]
    pub projection_factor: f32,
    #[serde(default = "default_wall_scale")]
    pub wall_scale: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_minimap_scale")]
    pub minimap_scale: f32,
    #[serde(default = "default_crosshair_scale")]
    pub crosshair_scale: f32,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub record_events: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
    /// Print a status line per second in the viewer
    #[serde(default)]
    pub verbose: bool,
}

// Default values
fn default_cell_size() -> f32 { DEFAULT_CELL_SIZE }
fn default_spawn_x() -> f32 { 1.5 }
fn default_spawn_y() -> f32 { 2.0 }
fn default_reset_x() -> f32 { 2.5 }
fn default_reset_y() -> f32 { 3.25 }
fn default_reset_angle() -> f32 { 1.55 }
fn default_walk_speed() -> f32 { 2.0 }
fn default_sprint_multiplier() -> f32 { 1.75 }
fn default_mouse_sensitivity() -> f32 { 0.5 }
fn default_player_size() -> f32 { 10.0 }
fn default_fov_degrees() -> f32 { 90.0 }
fn default_projection_factor() -> f32 { DEFAULT_PROJECTION_FACTOR }
fn default_wall_scale() -> f32 { DEFAULT_WALL_SCALE }
fn default_tick_ms() -> u64 { 30 }
fn default_minimap_scale() -> f32 { 0.5 }
fn default_crosshair_scale() -> f32 { 7.5 }
fn default_event_log_path() -> String { "events.json".to_string() }

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            map_path: None,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn_x: default_spawn_x(),
            spawn_y: default_spawn_y(),
            spawn_angle: 0.0,
            reset_x: default_reset_x(),
            reset_y: default_reset_y(),
            reset_angle: default_reset_angle(),
            walk_speed: default_walk_speed(),
            sprint_multiplier: default_sprint_multiplier(),
            mouse_sensitivity: default_mouse_sensitivity(),
            size: default_player_size(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov_degrees(),
            projection_factor: default_projection_factor(),
            wall_scale: default_wall_scale(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            minimap_scale: default_minimap_scale(),
            crosshair_scale: default_crosshair_scale(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            record_events: false,
            event_log_path: default_event_log_path(),
            verbose: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            view: ViewConfig::default(),
            render: RenderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn spawn_pose(&self, cell_size: f32) -> Pose {
        Pose {
            x: self.spawn_x * cell_size,
            y: self.spawn_y * cell_size,
            angle: self.spawn_angle,
        }
    }

    pub fn reset_pose(&self, cell_size: f32) -> Pose {
        Pose {
            x: self.reset_x * cell_size,
            y: self.reset_y * cell_size,
            angle: self.reset_angle,
        }
    }
}

impl ViewConfig {
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from config.toml, or use defaults if it is missing or broken
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    println!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    eprintln!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                println!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.world.cell_size, 64.0);
        assert_eq!(config.render.tick_ms, 30);
    }

    #[test]
    fn test_partial_tables() {
        let config = Config::from_toml_str(
            r#"
            [world]
            map_path = "maps/arena.txt"

            [view]
            fov_degrees = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.world.map_path.as_deref(), Some("maps/arena.txt"));
        assert_eq!(config.world.cell_size, 64.0);
        assert!((config.view.fov() - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(config.view.wall_scale, 277.0);
    }

    #[test]
    fn test_poses_scale_with_cell_size() {
        let player = PlayerConfig::default();
        let spawn = player.spawn_pose(64.0);
        assert_eq!((spawn.x, spawn.y, spawn.angle), (96.0, 128.0, 0.0));

        let reset = player.reset_pose(64.0);
        assert_eq!((reset.x, reset.y, reset.angle), (160.0, 208.0, 1.55));
    }

    #[test]
    fn test_bad_document_is_an_error() {
        assert!(Config::from_toml_str("[view]\nfov_degrees = \"wide\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_from(Path::new("does/not/exist.toml"));
        assert_eq!(config, Config::default());
    }
}
