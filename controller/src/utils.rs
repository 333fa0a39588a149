use nalgebra as na;

use crate::{
    constants::DIST_EPS,
    types::{Quat, Vec2, Vec3},
};

/// Horizontal (XZ) part of `v`.
#[inline]
pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Remove the component of `v` along the unit `normal`.
#[inline]
pub fn project_on_plane(v: Vec3, normal: &Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// World-space direction of a 2D move vector: `(x, y)` maps to `(x, 0, -y)`.
#[inline]
pub fn move_to_world(move_vector: Vec2) -> Vec3 {
    Vec3::new(move_vector.x, 0.0, -move_vector.y)
}

/// Yaw-only rotation (about +Y) whose forward (`-Z`) faces the planar `dir`.
///
/// Returns `None` if the planar direction is too small.
pub fn yaw_from_xz(dir: Vec3) -> Option<Quat> {
    let flat = planar(dir);
    if flat.norm_squared() <= DIST_EPS {
        return None;
    }
    let yaw = (-flat.x).atan2(-flat.z);
    Some(na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), yaw))
}

/// Exponential smoothing factor for a per-second `sharpness` over `dt`.
#[inline]
pub fn smoothing(sharpness: f32, dt: f32) -> f32 {
    (sharpness * dt).clamp(0.0, 1.0)
}

/// Sine pulse over `[0, 1]`: rises from 0 to 1 at the midpoint and back to 0.
#[inline]
pub fn sine_pulse(progress: f32) -> f32 {
    (progress.clamp(0.0, 1.0) * std::f32::consts::PI).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::forward;

    #[test]
    fn yaw_faces_requested_direction() {
        for dir in [Vec3::x(), -Vec3::x(), Vec3::z(), -Vec3::z(), Vec3::new(1.0, 3.0, 1.0)] {
            let rot = yaw_from_xz(dir).unwrap();
            let expected = planar(dir).normalize();
            assert!((forward(&rot) - expected).norm() < 1.0e-5, "{dir:?}");
        }
    }

    #[test]
    fn yaw_of_vertical_direction_is_none() {
        assert!(yaw_from_xz(Vec3::y()).is_none());
    }

    #[test]
    fn project_on_plane_removes_normal_component() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let v = project_on_plane(Vec3::new(1.0, -2.0, 3.0), &n);
        assert!(v.dot(&n).abs() < 1.0e-6);
    }

    #[test]
    fn move_vector_forward_is_negative_z() {
        assert_eq!(move_to_world(Vec2::new(0.0, 1.0)), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn sine_pulse_rises_then_decays() {
        assert!(sine_pulse(0.0).abs() < 1.0e-6);
        assert!((sine_pulse(0.5) - 1.0).abs() < 1.0e-6);
        assert!(sine_pulse(1.0).abs() < 1.0e-6);
        assert_eq!(sine_pulse(2.0), sine_pulse(1.0));
    }
}
