//! Camera-relative remapping of move input.

use crate::{
    types::{Quat, Vec2, Vec3, forward, right, up},
    utils::{move_to_world, planar},
};

/// Forward/right axes of the view that move input is expressed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            forward: -Vec3::z(),
            right: Vec3::x(),
        }
    }
}

impl CameraBasis {
    pub fn new(forward: Vec3, right: Vec3) -> Self {
        Self { forward, right }
    }

    pub fn from_rotation(rotation: &Quat) -> Self {
        Self::new(forward(rotation), right(rotation))
    }

    /// Basis of a camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let fwd = (target - eye).try_normalize(f32::EPSILON).unwrap_or(-Vec3::z());
        let side = fwd.cross(&up()).try_normalize(f32::EPSILON).unwrap_or(Vec3::x());
        Self::new(fwd, side)
    }

    /// World direction of `move_vector` in this view, flattened onto the ground plane.
    ///
    /// Falls back to the world mapping when either axis is vertical or zero.
    pub fn relative_direction(&self, move_vector: Vec2) -> Vec3 {
        let f = planar(self.forward).try_normalize(f32::EPSILON);
        let r = planar(self.right).try_normalize(f32::EPSILON);
        let dir = match (f, r) {
            (Some(f), Some(r)) => f * move_vector.y + r * move_vector.x,
            _ => move_to_world(move_vector),
        };
        dir.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
    }
}
