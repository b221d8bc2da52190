use crate::grid::GridMap;
use crate::player::Player;
use crate::ray::{Orientation, RayField, RayHit};
use std::f32::consts::{FRAC_PI_2, PI};

/// Rules that specialize the grid-line stepper for one family of lines.
/// The stepper works in (primary, cross) coordinates: primary is x for
/// vertical lines and y for horizontal lines.
struct AxisRules {
    orientation: Orientation,
    /// True when the ray travels toward increasing primary coordinates
    heads_positive: fn(f32) -> bool,
    /// Cross-axis displacement per unit of primary displacement
    slope: fn(f32) -> f32,
}

const VERTICAL_LINES: AxisRules = AxisRules {
    orientation: Orientation::Vertical,
    heads_positive: heads_right,
    slope: f32::tan,
};

const HORIZONTAL_LINES: AxisRules = AxisRules {
    orientation: Orientation::Horizontal,
    heads_positive: heads_down,
    slope: inverse_tan,
};

/// Odd number of half turns below `angle`
fn odd_half_turn(angle: f32) -> bool {
    (angle / PI).floor() % 2.0 != 0.0
}

fn heads_right(angle: f32) -> bool {
    odd_half_turn(angle - FRAC_PI_2)
}

/// Screen coordinates: y grows downward
fn heads_down(angle: f32) -> bool {
    !odd_half_turn(angle)
}

fn inverse_tan(angle: f32) -> f32 {
    1.0 / angle.tan()
}

impl Orientation {
    /// Map (primary, cross) back to (x, y)
    fn to_xy<T>(self, primary: T, cross: T) -> (T, T) {
        match self {
            Orientation::Vertical => (primary, cross),
            Orientation::Horizontal => (cross, primary),
        }
    }
}

/// March along one family of grid lines until a wall cell or the map edge.
///
/// Probes whose coordinates are not finite (slopes of 0 or inf) are out of
/// bounds, and the primary coordinate advances a full cell every iteration,
/// so the loop always leaves the map.
fn cast_axis(grid: &GridMap, origin: (f32, f32), angle: f32, rules: &AxisRules) -> RayHit {
    let cell = grid.cell_size;
    let (origin_primary, origin_cross) = rules.orientation.to_xy(origin.0, origin.1);

    let positive = (rules.heads_positive)(angle);
    let slope = (rules.slope)(angle);

    let mut primary = (origin_primary / cell).floor() * cell;
    if positive {
        primary += cell;
    }
    let mut cross = origin_cross + (primary - origin_primary) * slope;

    let step_primary = if positive { cell } else { -cell };
    let step_cross = step_primary * slope;

    let (code, cell_x, cell_y) = loop {
        let mut cell_primary = grid.grid_index(primary);
        if !positive {
            // the line is the right/bottom edge of the cell being entered
            cell_primary = cell_primary.saturating_sub(1);
        }
        let (cell_x, cell_y) = rules.orientation.to_xy(cell_primary, grid.grid_index(cross));

        match grid.code_at(cell_x, cell_y) {
            Some(0) => {
                primary += step_primary;
                cross += step_cross;
            }
            found => break (found, cell_x, cell_y),
        }
    };

    let (hit_x, hit_y) = rules.orientation.to_xy(primary, cross);
    let distance = (hit_x - origin.0).hypot(hit_y - origin.1);

    RayHit {
        angle,
        distance: if distance.is_nan() { f32::INFINITY } else { distance },
        orientation: rules.orientation,
        cell_x,
        cell_y,
        code,
    }
}

/// First wall crossed on a vertical grid line
pub fn cast_vertical(grid: &GridMap, origin: (f32, f32), angle: f32) -> RayHit {
    cast_axis(grid, origin, angle, &VERTICAL_LINES)
}

/// First wall crossed on a horizontal grid line
pub fn cast_horizontal(grid: &GridMap, origin: (f32, f32), angle: f32) -> RayHit {
    cast_axis(grid, origin, angle, &HORIZONTAL_LINES)
}

/// Keep the nearer hit. Equal distances (exact grid corners) go to the vertical hit.
fn nearer(vertical: RayHit, horizontal: RayHit) -> RayHit {
    if horizontal.distance >= vertical.distance {
        vertical
    } else {
        horizontal
    }
}

/// Cast a single ray from `origin`
pub fn cast_ray(grid: &GridMap, origin: (f32, f32), angle: f32) -> RayHit {
    nearer(
        cast_vertical(grid, origin, angle),
        cast_horizontal(grid, origin, angle),
    )
}

/// Sweep `fov` radians centered on the player's facing angle, one ray per column
pub fn cast_field(grid: &GridMap, player: &Player, fov: f32, column_count: usize) -> RayField {
    if column_count == 0 {
        return RayField::default();
    }

    let origin = (player.x, player.y);
    let initial_angle = player.angle - fov / 2.0;
    let angle_step = fov / column_count as f32;

    let rays = (0..column_count)
        .map(|i| cast_ray(grid, origin, initial_angle + i as f32 * angle_step))
        .collect();

    RayField::new(rays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCode;

    const CELL: f32 = 64.0;

    fn open_grid(rows: usize, cols: usize) -> GridMap {
        let cells: Vec<Vec<CellCode>> = vec![vec![0; cols]; rows];
        GridMap::from_rows(&cells, CELL).unwrap()
    }

    #[test]
    fn test_direction_rules() {
        assert!(heads_right(0.0));
        assert!(heads_right(-1.0));
        assert!(!heads_right(PI));
        assert!(!heads_right(2.0));
        assert!(heads_right(2.0 * PI + 0.1));

        assert!(heads_down(0.1));
        assert!(heads_down(FRAC_PI_2));
        assert!(!heads_down(-FRAC_PI_2));
        assert!(!heads_down(3.0 * FRAC_PI_2));
    }

    #[test]
    fn test_vertical_hit_down_corridor() {
        let grid = GridMap::sample(CELL);
        let hit = cast_vertical(&grid, (1.5 * CELL, 1.5 * CELL), 0.0);

        assert_eq!(hit.orientation, Orientation::Vertical);
        assert_eq!((hit.cell_x, hit.cell_y), (5, 1));
        assert_eq!(hit.code, Some(2));
        assert!((hit.distance - 3.5 * CELL).abs() < 1e-3);
    }

    #[test]
    fn test_horizontal_hit_heading_down() {
        let grid = GridMap::sample(CELL);
        let hit = cast_horizontal(&grid, (1.5 * CELL, 1.5 * CELL), FRAC_PI_2);

        assert_eq!(hit.orientation, Orientation::Horizontal);
        assert_eq!((hit.cell_x, hit.cell_y), (1, 6));
        assert_eq!(hit.code, Some(1));
        assert!((hit.distance - 4.5 * CELL).abs() < 1e-2);
    }

    #[test]
    fn test_horizontal_hit_heading_up() {
        let grid = GridMap::sample(CELL);
        let hit = cast_horizontal(&grid, (1.5 * CELL, 3.5 * CELL), -FRAC_PI_2);

        assert_eq!((hit.cell_x, hit.cell_y), (1, 0));
        assert!((hit.distance - 2.5 * CELL).abs() < 1e-2);
    }

    #[test]
    fn test_vertical_hit_heading_left() {
        let grid = GridMap::sample(CELL);
        let hit = cast_vertical(&grid, (1.5 * CELL, 1.5 * CELL), PI);

        assert_eq!((hit.cell_x, hit.cell_y), (0, 1));
        assert!((hit.distance - 0.5 * CELL).abs() < 1e-3);
    }

    #[test]
    fn test_parallel_caster_reports_infinite_distance() {
        let grid = GridMap::sample(CELL);
        // angle 0 never crosses a horizontal line
        let hit = cast_horizontal(&grid, (1.5 * CELL, 1.5 * CELL), 0.0);

        assert!(hit.is_out_of_bounds());
        assert_eq!(hit.distance, f32::INFINITY);
    }

    #[test]
    fn test_escaping_ray_reports_last_probe() {
        let grid = open_grid(3, 3);
        let hit = cast_vertical(&grid, (1.5 * CELL, 1.5 * CELL), 0.3);

        assert!(hit.is_out_of_bounds());
        assert_eq!(hit.cell_x, 3);
        assert!(hit.distance.is_finite());
        assert!((hit.distance - 1.5 * CELL / 0.3f32.cos()).abs() < 1e-2);
    }

    #[test]
    fn test_degenerate_angles_terminate() {
        let grid = GridMap::sample(CELL);
        let angles = [
            0.0,
            FRAC_PI_2,
            PI,
            3.0 * FRAC_PI_2,
            2.0 * PI,
            -FRAC_PI_2,
            -PI,
            1e-7,
            FRAC_PI_2 - 1e-6,
            FRAC_PI_2 + 1e-6,
            100.0 * PI,
        ];
        let origins = [
            (1.5 * CELL, 1.5 * CELL),
            (1.5 * CELL, 2.0 * CELL), // on a horizontal grid line
            (2.0 * CELL, 3.5 * CELL), // on a vertical grid line
            (3.0 * CELL, 3.0 * CELL), // on a grid corner
        ];

        for &origin in &origins {
            for &angle in &angles {
                let v = cast_vertical(&grid, origin, angle);
                let h = cast_horizontal(&grid, origin, angle);
                assert!(v.distance >= 0.0, "vertical {:?} at {}", origin, angle);
                assert!(h.distance >= 0.0, "horizontal {:?} at {}", origin, angle);
            }
        }
    }

    #[test]
    fn test_degenerate_angles_on_open_grid_terminate() {
        let grid = open_grid(4, 5);
        for &angle in &[0.0, FRAC_PI_2, PI, -FRAC_PI_2, 1e-7] {
            let hit = cast_ray(&grid, (2.5 * CELL, 2.0 * CELL), angle);
            assert!(hit.is_out_of_bounds());
            assert!(hit.distance >= 0.0);
        }
    }

    #[test]
    fn test_tie_goes_to_vertical() {
        let vertical = RayHit {
            angle: 0.5,
            distance: 10.0,
            orientation: Orientation::Vertical,
            cell_x: 2,
            cell_y: 2,
            code: Some(1),
        };
        let horizontal = RayHit {
            orientation: Orientation::Horizontal,
            ..vertical
        };

        assert_eq!(nearer(vertical, horizontal).orientation, Orientation::Vertical);

        let closer = RayHit { distance: 9.5, ..horizontal };
        assert_eq!(nearer(vertical, closer).orientation, Orientation::Horizontal);
    }

    #[test]
    fn test_empty_field() {
        let grid = GridMap::sample(CELL);
        let player = Player::new(crate::Pose { x: 96.0, y: 96.0, angle: 0.0 }, 10.0);
        assert!(cast_field(&grid, &player, FRAC_PI_2, 0).is_empty());
    }
}
