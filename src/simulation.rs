use crate::config::Config;
use crate::grid::GridMap;
use crate::player::{Movement, Player, Pose};
use crate::projection::{Projection, WallColumn};
use crate::ray::{RayField, RayHit};
use crate::raycast::{cast_field, cast_ray};
use anyhow::Result;
use std::path::Path;

/// Everything one tick produces for the renderer
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero-based tick number
    pub index: u64,
    pub rays: RayField,
    /// Projected column per ray, same order as `rays`
    pub columns: Vec<WallColumn>,
    /// Whether the movement step was accepted
    pub moved: bool,
    /// Cell emptied by a clear request applied at the start of this frame
    pub cleared: Option<(i32, i32)>,
}

/// Map and player state driven one frame at a time by the scheduler
pub struct Simulation {
    grid: GridMap,
    player: Player,
    reset_pose: Pose,
    fov: f32,
    projection: Projection,
    clear_requested: bool,
    frames_run: u64,
}

impl Simulation {
    pub fn new(grid: GridMap, player: Player, reset_pose: Pose, fov: f32, projection: Projection) -> Self {
        Simulation {
            grid,
            player,
            reset_pose,
            fov,
            projection,
            clear_requested: false,
            frames_run: 0,
        }
    }

    /// Build from configuration around an already loaded grid
    pub fn with_grid(config: &Config, grid: GridMap) -> Self {
        let cell_size = grid.cell_size;
        let player = Player::new(config.player.spawn_pose(cell_size), config.player.size);
        let projection = Projection::new(
            cell_size,
            config.view.projection_factor,
            config.view.wall_scale,
        );

        Self::new(
            grid,
            player,
            config.player.reset_pose(cell_size),
            config.view.fov(),
            projection,
        )
    }

    /// Build from configuration, loading the configured map or the built-in sample
    pub fn from_config(config: &Config) -> Result<Self> {
        let grid = match &config.world.map_path {
            Some(path) => GridMap::load(Path::new(path), config.world.cell_size)?,
            None => GridMap::sample(config.world.cell_size),
        };
        Ok(Self::with_grid(config, grid))
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn apply_movement(&mut self, movement: Movement, speed: f32) {
        self.player.apply_movement(movement, speed);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.player.set_speed(speed);
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn rotate(&mut self, delta: f32) {
        self.player.rotate(delta);
    }

    pub fn reset_pose(&mut self) {
        self.player.reset_to(self.reset_pose);
    }

    /// Queue clearing the wall the player faces; applied before the next frame's sweep
    pub fn request_clear_facing_cell(&mut self) {
        self.clear_requested = true;
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_requested
    }

    /// Ray straight down the player's facing angle
    pub fn facing_ray(&self) -> RayHit {
        cast_ray(&self.grid, (self.player.x, self.player.y), self.player.angle)
    }

    /// Grid coordinates of the wall the player faces, None if the ray leaves the map
    pub fn facing_cell(&self) -> Option<(i32, i32)> {
        let ray = self.facing_ray();
        ray.code.map(|_| (ray.cell_x, ray.cell_y))
    }

    /// Run one tick: pending clear, movement step, ray sweep, projection
    pub fn frame(&mut self, column_count: usize, screen_height: f32) -> Frame {
        let cleared = if self.clear_requested {
            self.clear_requested = false;
            let cell = self.facing_cell();
            if let Some((x, y)) = cell {
                self.grid.clear_cell(x, y);
            }
            cell
        } else {
            None
        };

        let moved = self.player.step(&self.grid);

        let rays = cast_field(&self.grid, &self.player, self.fov, column_count);
        let columns = rays
            .iter()
            .map(|ray| self.projection.column(ray, self.player.angle, screen_height))
            .collect();

        let frame = Frame {
            index: self.frames_run,
            rays,
            columns,
            moved,
            cleared,
        };
        self.frames_run += 1;
        frame
    }
}
