pub mod config;
pub mod grid;
pub mod input;
pub mod player;
pub mod projection;
pub mod ray;
pub mod raycast;
pub mod simulation;

pub use config::Config;
pub use grid::{CellCode, GridMap};
pub use input::{EventLog, InputEvent};
pub use player::{Movement, Player, Pose};
pub use projection::{correct, Projection, WallColumn};
pub use ray::{Orientation, RayField, RayHit};
pub use raycast::{cast_field, cast_horizontal, cast_ray, cast_vertical};
pub use simulation::{Frame, Simulation};
