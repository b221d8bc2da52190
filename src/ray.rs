use crate::grid::CellCode;
use serde::Serialize;

/// Which family of grid lines stopped the ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    /// Lines of constant x
    Vertical,
    /// Lines of constant y
    Horizontal,
}

/// Result of casting one ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RayHit {
    /// Angle the ray was cast at, in radians
    pub angle: f32,
    /// Straight-line distance from the origin to the last probed point (not fisheye corrected).
    /// Never negative or NaN; +inf when the ray runs parallel to the probed line family.
    pub distance: f32,
    pub orientation: Orientation,
    /// Grid coordinates of the wall cell, or of the cell where the ray left the map
    pub cell_x: i32,
    pub cell_y: i32,
    /// Code of the wall that was hit; None when the ray left the map
    pub code: Option<CellCode>,
}

impl RayHit {
    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.code.is_none()
    }

    /// World position where the ray stopped, seen from `origin`
    pub fn end_point(&self, origin: (f32, f32)) -> (f32, f32) {
        (
            origin.0 + self.angle.cos() * self.distance,
            origin.1 + self.angle.sin() * self.distance,
        )
    }
}

/// One ray per screen column, left edge of the view first.
/// Angles are strictly increasing across the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RayField {
    rays: Vec<RayHit>,
}

impl RayField {
    pub(crate) fn new(rays: Vec<RayHit>) -> Self {
        RayField { rays }
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&RayHit> {
        self.rays.get(column)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RayHit> {
        self.rays.iter()
    }

    pub fn as_slice(&self) -> &[RayHit] {
        &self.rays
    }

    /// Ray in the middle column, None for an empty field
    pub fn center(&self) -> Option<&RayHit> {
        self.rays.get(self.rays.len() / 2)
    }
}

impl<'a> IntoIterator for &'a RayField {
    type Item = &'a RayHit;
    type IntoIter = std::slice::Iter<'a, RayHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.rays.iter()
    }
}
