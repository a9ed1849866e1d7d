//! Lightweight physics for fighters on the arena floor.
//!
//! This module provides vector helpers, 3D axis-aligned bounding boxes,
//! Euler integration with gravity and ground friction, and overlap resolution
//! between two bodies.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gravity acceleration along y (units per second squared).
pub const GRAVITY: f32 = -9.81;

/// Velocity retained on x/z per integration step while grounded.
pub const GROUND_FRICTION: f32 = 0.8;

// ============================================================================
// Vector helpers
// ============================================================================

/// Returns a unit vector, or zero for a zero-length input.
#[must_use]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.length();
    if len == 0.0 {
        Vec3::ZERO
    } else {
        v / len
    }
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(start: Vec3, end: Vec3, factor: f32) -> Vec3 {
    start + (end - start) * factor
}

/// Checks whether a point lies inside an inclusive box.
#[must_use]
pub fn is_within_bounds(position: Vec3, min: Vec3, max: Vec3) -> bool {
    position.cmpge(min).all() && position.cmple(max).all()
}

// ============================================================================
// Bounding boxes
// ============================================================================

/// Axis-aligned bounding box in arena space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an AABB centered on a point with the given full size.
    #[must_use]
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Checks if this AABB touches or overlaps another.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Overlap depth on each axis. Only meaningful when the boxes overlap.
    #[must_use]
    pub fn overlap(&self, other: &Aabb) -> Vec3 {
        (self.max - other.min).min(other.max - self.min)
    }
}

// ============================================================================
// Bodies
// ============================================================================

/// A simulated body with velocity and ground contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Center position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Full extents of the body's box
    pub size: Vec3,
    /// Mass
    pub mass: f32,
    /// Static bodies never move
    pub is_static: bool,
    /// Whether the body rests on the floor
    pub on_ground: bool,
}

impl PhysicsBody {
    /// Creates a resting body.
    #[must_use]
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            size,
            mass: 1.0,
            is_static: false,
            on_ground: false,
        }
    }

    /// Sets the mass.
    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Marks the body as static.
    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Returns the body's bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    /// Advances the body by one Euler step.
    ///
    /// Gravity applies while airborne, the floor sits at y = 0, and grounded
    /// bodies lose horizontal speed to friction.
    pub fn integrate(&mut self, dt: f32) {
        if self.is_static {
            return;
        }

        if !self.on_ground {
            self.velocity.y += GRAVITY * dt;
        }

        self.position += self.velocity * dt;

        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        if self.on_ground {
            self.velocity.x *= GROUND_FRICTION;
            self.velocity.z *= GROUND_FRICTION;
        }
    }
}

/// Pushes two overlapping bodies apart along the axis of least overlap.
///
/// Each movable body takes half of the overlap. Separation happens on x or z
/// only; a vertical minimum leaves both bodies in place. Returns whether the
/// bodies overlapped.
pub fn resolve_collision(a: &mut PhysicsBody, b: &mut PhysicsBody) -> bool {
    if a.is_static && b.is_static {
        return false;
    }

    let (box_a, box_b) = (a.aabb(), b.aabb());
    if !box_a.overlaps(&box_b) {
        return false;
    }

    let overlap = box_a.overlap(&box_b);
    let separation = overlap.min_element() / 2.0;

    if overlap.x <= overlap.y && overlap.x <= overlap.z {
        let sign = if a.position.x < b.position.x { -1.0 } else { 1.0 };
        if !a.is_static {
            a.position.x += sign * separation;
        }
        if !b.is_static {
            b.position.x -= sign * separation;
        }
    } else if overlap.z < overlap.y {
        let sign = if a.position.z < b.position.z { -1.0 } else { 1.0 };
        if !a.is_static {
            a.position.z += sign * separation;
        }
        if !b.is_static {
            b.position.z -= sign * separation;
        }
    }

    true
}
