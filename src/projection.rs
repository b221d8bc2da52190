use crate::ray::RayHit;

/// Default projection factor applied to the cell size
pub const DEFAULT_PROJECTION_FACTOR: f32 = 5.0;
/// Default wall scale in screen units
pub const DEFAULT_WALL_SCALE: f32 = 277.0;
/// Distances are clamped to this before dividing
pub const MIN_DISTANCE: f32 = 1e-3;

/// Remove the fisheye bulge: project the radial distance onto the view direction
pub fn correct(distance: f32, ray_angle: f32, player_angle: f32) -> f32 {
    distance * (ray_angle - player_angle).cos()
}

/// Vertical extent of one screen column: ceiling, wall and floor spans.
/// `wall_top..wall_bottom` is the wall, anything above is ceiling and anything below is floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallColumn {
    /// Fisheye-corrected distance to the wall
    pub distance: f32,
    /// Unclamped slice height; may exceed the screen
    pub height: f32,
    pub wall_top: f32,
    pub wall_bottom: f32,
    pub screen_height: f32,
}

impl WallColumn {
    pub fn ceiling_height(&self) -> f32 {
        self.wall_top
    }

    pub fn wall_height(&self) -> f32 {
        self.wall_bottom - self.wall_top
    }

    pub fn floor_height(&self) -> f32 {
        self.screen_height - self.wall_bottom
    }
}

/// Converts corrected distances into wall slice heights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub cell_size: f32,
    pub factor: f32,
    pub wall_scale: f32,
}

impl Projection {
    pub fn new(cell_size: f32, factor: f32, wall_scale: f32) -> Self {
        Projection {
            cell_size,
            factor,
            wall_scale,
        }
    }

    /// Screen height of a wall slice. Nearer walls are taller; zero or negative
    /// distances are clamped to `MIN_DISTANCE` so the result stays finite.
    pub fn wall_slice_height(&self, corrected_distance: f32) -> f32 {
        let distance = if corrected_distance.is_nan() {
            MIN_DISTANCE
        } else {
            corrected_distance.max(MIN_DISTANCE)
        };
        self.cell_size * self.factor / distance * self.wall_scale
    }

    /// Project one ray into a screen column centered on the horizon
    pub fn column(&self, ray: &RayHit, player_angle: f32, screen_height: f32) -> WallColumn {
        let distance = correct(ray.distance, ray.angle, player_angle);
        let height = self.wall_slice_height(distance);
        let mid = screen_height / 2.0;

        WallColumn {
            distance,
            height,
            wall_top: (mid - height / 2.0).max(0.0),
            wall_bottom: (mid + height / 2.0).min(screen_height),
            screen_height,
        }
    }
}
