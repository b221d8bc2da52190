use crate::GridMap;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Which way the player is being pushed by the input layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Idle,
}

impl Movement {
    /// Angle added to the facing angle to get the movement heading
    pub fn heading_offset(self) -> f32 {
        match self {
            Movement::StrafeLeft => -FRAC_PI_2,
            Movement::StrafeRight => FRAC_PI_2,
            Movement::Forward | Movement::Backward | Movement::Idle => 0.0,
        }
    }
}

/// Wrap an angle into [0, 2π)
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // tiny negative inputs round up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Position and facing angle, used for spawn and reset
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// The viewer, positioned in world units
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,

    /// Facing angle in radians, kept in [0, 2π) so ray angles keep their precision
    pub angle: f32,

    /// Signed distance travelled per step. Negative speed moves against the heading.
    pub speed: f32,

    pub movement: Movement,

    /// Side of the minimap marker
    pub size: f32,
}

impl Player {
    /// Create an idle player at the given pose
    pub fn new(pose: Pose, size: f32) -> Self {
        Player {
            x: pose.x,
            y: pose.y,
            angle: wrap_angle(pose.angle),
            speed: 0.0,
            movement: Movement::Idle,
            size,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            angle: self.angle,
        }
    }

    /// Move the player back to `pose` and drop any pending movement
    pub fn reset_to(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.angle = wrap_angle(pose.angle);
        self.speed = 0.0;
        self.movement = Movement::Idle;
    }

    pub fn apply_movement(&mut self, movement: Movement, speed: f32) {
        self.movement = movement;
        self.speed = speed;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Zero the speed; the movement tag is kept
    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    pub fn rotate(&mut self, delta: f32) {
        self.angle = wrap_angle(self.angle + delta);
    }

    /// Position the player would reach this step if nothing blocked it
    pub fn candidate_position(&self) -> (f32, f32) {
        let heading = self.angle + self.movement.heading_offset();
        (
            self.x + heading.cos() * self.speed,
            self.y + heading.sin() * self.speed,
        )
    }

    /// Advance one step (call once per frame).
    /// The whole move is rejected when the destination is blocked; there is no sliding along walls.
    /// Returns true if the player moved.
    pub fn step(&mut self, grid: &GridMap) -> bool {
        if self.speed == 0.0 {
            return false;
        }

        let (new_x, new_y) = self.candidate_position();
        if grid.is_blocked(new_x, new_y) {
            return false;
        }

        self.x = new_x;
        self.y = new_y;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DEFAULT_CELL_SIZE;
    use std::f32::consts::PI;

    const CELL: f32 = DEFAULT_CELL_SIZE;

    fn player_at(x: f32, y: f32, angle: f32) -> Player {
        Player::new(Pose { x, y, angle }, 10.0)
    }

    #[test]
    fn test_forward_step() {
        let grid = GridMap::sample(CELL);
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, 0.0);
        player.apply_movement(Movement::Forward, 2.0);

        assert!(player.step(&grid));
        assert!((player.x - (1.5 * CELL + 2.0)).abs() < 1e-4);
        assert!((player.y - 1.5 * CELL).abs() < 1e-4);
    }

    #[test]
    fn test_backward_uses_negative_speed() {
        let grid = GridMap::sample(CELL);
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, 0.0);
        player.apply_movement(Movement::Backward, -2.0);

        assert!(player.step(&grid));
        assert!((player.x - (1.5 * CELL - 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_strafe_right_moves_perpendicular() {
        let grid = GridMap::sample(CELL);
        // facing +x, strafing right heads toward +y on screen
        let mut player = player_at(1.5 * CELL, 3.5 * CELL, 0.0);
        player.apply_movement(Movement::StrafeRight, 2.0);

        assert!(player.step(&grid));
        assert!((player.x - 1.5 * CELL).abs() < 1e-3);
        assert!((player.y - (3.5 * CELL + 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_strafe_left_moves_perpendicular() {
        let grid = GridMap::sample(CELL);
        let mut player = player_at(1.5 * CELL, 3.5 * CELL, 0.0);
        player.apply_movement(Movement::StrafeLeft, 2.0);

        assert!(player.step(&grid));
        assert!((player.y - (3.5 * CELL - 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_blocked_step_is_rejected_entirely() {
        let grid = GridMap::sample(CELL);
        // one unit short of wall cell (2, 2)
        let mut player = player_at(2.0 * CELL - 1.0, 2.5 * CELL, 0.0);
        player.apply_movement(Movement::Forward, 2.0);

        assert!(!player.step(&grid));
        assert_eq!(player.x, 2.0 * CELL - 1.0);
        assert_eq!(player.y, 2.5 * CELL);
    }

    #[test]
    fn test_stop_keeps_tag() {
        let grid = GridMap::sample(CELL);
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, PI / 2.0);
        player.apply_movement(Movement::StrafeLeft, 2.0);
        player.stop();

        assert_eq!(player.movement, Movement::StrafeLeft);
        assert!(!player.step(&grid));
        assert_eq!(player.pose(), Pose { x: 1.5 * CELL, y: 1.5 * CELL, angle: PI / 2.0 });
    }

    #[test]
    fn test_reset_to() {
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, 0.0);
        player.apply_movement(Movement::Forward, 3.5);
        player.rotate(1.0);

        let pose = Pose { x: 2.5 * CELL, y: 3.25 * CELL, angle: 1.55 };
        player.reset_to(pose);

        assert_eq!(player.pose(), pose);
        assert_eq!(player.speed, 0.0);
        assert_eq!(player.movement, Movement::Idle);
    }

    #[test]
    fn test_rotate_wraps_angle() {
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, 0.0);

        player.rotate(-FRAC_PI_2);
        assert!((player.angle - 3.0 * FRAC_PI_2).abs() < 1e-5);

        player.rotate(PI);
        assert!((player.angle - FRAC_PI_2).abs() < 1e-5);

        for _ in 0..100_000 {
            player.rotate(0.37);
            assert!(player.angle >= 0.0 && player.angle < TAU);
        }
    }

    #[test]
    fn test_reset_wraps_angle() {
        let mut player = player_at(1.5 * CELL, 1.5 * CELL, 0.0);
        player.reset_to(Pose { x: 2.5 * CELL, y: 3.25 * CELL, angle: 1.55 + 4.0 * TAU });

        assert!((player.angle - 1.55).abs() < 1e-5);
        assert_eq!(wrap_angle(-1e-9), 0.0);
    }
}
