//! Horizontal movement: acceleration, braking, turn correction and facing.

use crate::{
    body::{CharacterBody, ForceMode},
    material::TractionProfile,
    settings::MovementSettings,
    types::{GroundContact, Vec3},
    utils::{planar, project_on_plane, smoothing, yaw_from_xz},
};

/// Speed cap for this tick. Traction only scales it on the ground.
#[inline]
pub fn target_speed(
    sprinting: bool,
    is_grounded: bool,
    profile: &TractionProfile,
    settings: &MovementSettings,
) -> f32 {
    let cap = if sprinting {
        settings.sprint_max_speed
    } else {
        settings.base_speed
    };
    if is_grounded { cap * profile.speed_factor } else { cap }
}

/// Apply this tick's horizontal forces.
///
/// `direction` is the unit world direction of the input, or zero for no input.
pub fn apply_movement<B: CharacterBody + ?Sized>(
    body: &mut B,
    direction: Vec3,
    sprinting: bool,
    ground: &GroundContact,
    profile: &TractionProfile,
    settings: &MovementSettings,
) {
    let has_input = direction != Vec3::zeros();
    let velocity = body.velocity();
    let speed = planar(velocity).norm();
    let target = target_speed(sprinting, ground.is_grounded, profile, settings);

    match ground.ground_normal() {
        Some(normal) => {
            let along_ground = project_on_plane(velocity, &normal);
            if has_input {
                let slope_dir = project_on_plane(direction, &normal)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or(direction);
                if speed < target {
                    let push = (target - speed) * settings.acceleration;
                    body.add_force(slope_dir * push, ForceMode::Acceleration);
                }
                let desired = slope_dir * along_ground.norm();
                let sharpness = settings.turn_sharpness * profile.turn_factor;
                body.add_force((desired - along_ground) * sharpness, ForceMode::Acceleration);
            } else {
                brake(body, velocity, along_ground, &normal, profile, settings);
            }
        }
        None if has_input => {
            if speed < target {
                body.add_force(direction * settings.air_acceleration, ForceMode::Acceleration);
            }
            let horizontal = planar(velocity);
            let desired = direction * horizontal.norm();
            body.add_force(
                (desired - horizontal) * settings.air_turn_sharpness,
                ForceMode::Acceleration,
            );
        }
        None => {}
    }
}

/// Decelerate along the ground; near rest, keep only the velocity along the normal.
fn brake<B: CharacterBody + ?Sized>(
    body: &mut B,
    velocity: Vec3,
    along_ground: Vec3,
    normal: &Vec3,
    profile: &TractionProfile,
    settings: &MovementSettings,
) {
    if along_ground.norm() > settings.brake_speed_threshold {
        let opposing = -along_ground.normalize();
        let force = settings.braking_force * profile.braking_factor;
        body.add_force(opposing * force, ForceMode::Acceleration);
    } else {
        body.set_velocity(normal * velocity.dot(normal));
    }
}

/// Slerp the facing toward `direction`, independent of velocity.
pub fn turn_toward<B: CharacterBody + ?Sized>(
    body: &mut B,
    direction: Vec3,
    settings: &MovementSettings,
    dt: f32,
) {
    let Some(target) = yaw_from_xz(direction) else {
        return;
    };
    let current = body.rotation();
    let t = smoothing(settings.rotation_sharpness, dt);
    let next = current.try_slerp(&target, t, 1.0e-6).unwrap_or(target);
    body.set_rotation(next);
}
