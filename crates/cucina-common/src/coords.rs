//! Arena coordinate helpers.
//!
//! Positions use `glam::Vec3` with x as the lateral axis, y as the vertical
//! (bob) axis and z as depth. Combat reach is measured on the x/z plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance between two points on the x/z plane, ignoring height.
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Rectangular floor of the arena on the x/z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Minimum lateral coordinate
    pub min_x: f32,
    /// Maximum lateral coordinate
    pub max_x: f32,
    /// Minimum depth coordinate
    pub min_z: f32,
    /// Maximum depth coordinate
    pub max_z: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::new(-9.0, 9.0, -5.0, 5.0)
    }
}

impl ArenaBounds {
    /// Creates new bounds.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Clamps a position onto the arena floor. Height is left untouched.
    #[must_use]
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y,
            position.z.clamp(self.min_z, self.max_z),
        )
    }

    /// Checks whether a position lies on the arena floor (inclusive).
    #[must_use]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.z >= self.min_z
            && position.z <= self.max_z
    }

    /// Arena width along x.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Arena depth along z.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }
}
