/*!
Core data types and math aliases shared by the sensing and locomotion modules.

This module intentionally contains no algorithms. It defines the data exchanged
between:
- the shape-cast oracle (hits produced by scene queries)
- the ground sensor (ground contact)
- the step/obstruction detector
- the locomotion state machine and the body it drives

Conventions
- +Y is up. Character forward is `rotation * -Z`, right is `rotation * +X`.
- Units are meters and seconds.
*/

use nalgebra as na;

use crate::ids::ColliderId;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec2 = na::Vector2<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World up axis.
#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

/// Forward axis of a character with the given rotation.
#[inline]
pub fn forward(rotation: &Quat) -> Vec3 {
    rotation * -Vec3::z()
}

/// Right axis of a character with the given rotation.
#[inline]
pub fn right(rotation: &Quat) -> Vec3 {
    rotation * Vec3::x()
}

/// A single result returned by a ray or shape cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Collider that was hit.
    pub collider: ColliderId,
    /// World-space contact point.
    pub point: Vec3,
    /// World-space unit surface normal, pointing out of the hit surface.
    pub normal: Vec3,
    /// Distance travelled along the cast direction before the hit (meters).
    pub distance: f32,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            collider: 0,
            point: Vec3::zeros(),
            normal: up(),
            distance: 0.0,
        }
    }
}

/// Snapshot of the character's capsule collider, refreshed on every query.
///
/// Owned by the physics collaborator; the core only reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderDescriptor {
    /// Capsule radius (meters).
    pub radius: f32,
    /// Full capsule height including both caps (meters).
    pub height: f32,
    /// World-space bounds center.
    pub center: Vec3,
    /// World-space bounds minimum corner.
    pub min: Vec3,
    /// World-space bounds maximum corner.
    pub max: Vec3,
    /// Per-axis world scale of the body.
    pub scale: Vec3,
}

impl ColliderDescriptor {
    /// Build a descriptor for a Y-aligned capsule centered at `center`.
    pub fn capsule(center: Vec3, radius: f32, half_height: f32) -> Self {
        let half = Vec3::new(radius, half_height + radius, radius);
        Self {
            radius,
            height: 2.0 * (half_height + radius),
            center,
            min: center - half,
            max: center + half,
            scale: Vec3::repeat(1.0),
        }
    }

    /// Lowest point of the bounds directly below the center.
    #[inline]
    pub fn base(&self) -> Vec3 {
        Vec3::new(self.center.x, self.min.y, self.center.z)
    }

    /// A collider with zero or non-finite extents has not been set up yet.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0 && self.height > 0.0)
            || !self.center.iter().all(|c| c.is_finite())
            || !self.min.iter().all(|c| c.is_finite())
    }
}

/// Capsule specification for the character.
///
/// half_height is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl Default for CapsuleSpec {
    fn default() -> Self {
        Self {
            radius: 0.5,
            half_height: 0.5,
        }
    }
}

/// Result of one ground evaluation. Recomputed from scratch every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    pub is_grounded: bool,
    /// Supporting surface normal. Only meaningful when `is_grounded`.
    pub normal: Vec3,
    /// World-space contact point of the best-aligned (or first, when ascending) hit.
    pub point: Vec3,
    /// Whether the forward probe saw a rising surface ahead.
    pub is_ascending: bool,
}

impl GroundContact {
    /// The "no ground" result.
    pub fn airborne(is_ascending: bool) -> Self {
        Self {
            is_grounded: false,
            normal: up(),
            point: Vec3::zeros(),
            is_ascending,
        }
    }

    /// The ground normal when grounded.
    #[inline]
    pub fn ground_normal(&self) -> Option<Vec3> {
        self.is_grounded.then_some(self.normal)
    }

    /// The ground normal, or world up when not grounded.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.ground_normal().unwrap_or_else(up)
    }
}

impl Default for GroundContact {
    fn default() -> Self {
        Self::airborne(false)
    }
}

/// Result of the step and lateral obstruction probes for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObstructionReport {
    /// New body position if a step-up was applied this tick.
    pub step_up: Option<Vec3>,
    /// A near-vertical surface touches the left side.
    pub left_blocked: bool,
    /// A near-vertical surface touches the right side.
    pub right_blocked: bool,
}

impl ObstructionReport {
    #[inline]
    pub fn lateral_blocked(&self) -> bool {
        self.left_blocked || self.right_blocked
    }
}
