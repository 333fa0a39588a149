//! Gravity shaping and ground sticking.

use crate::{
    body::{CharacterBody, ForceMode},
    settings::GravitySettings,
    types::{GroundContact, up},
};

/// Fall-speed multiplier: grows with downward speed, capped at `max_multiplier`.
#[inline]
pub fn fall_multiplier(vertical_velocity: f32, max_multiplier: f32) -> f32 {
    if vertical_velocity < 0.0 {
        (1.0 + vertical_velocity.abs()).clamp(1.0, max_multiplier.max(1.0))
    } else {
        1.0
    }
}

/// What [`apply_gravity`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GravityEffect {
    None,
    /// Extra downward acceleration (m/s²).
    Pulled(f32),
    /// Velocity into the ground was cancelled.
    Stuck,
}

/// Airborne or against a wall: pull down. Grounded: cancel velocity into the ground.
///
/// A gravity-free dash (`dash_suspended`) is the only time the pull is skipped; the
/// step-up grace suspends body gravity but still gets the pull.
pub fn apply_gravity<B: CharacterBody + ?Sized>(
    body: &mut B,
    ground: &GroundContact,
    on_wall: bool,
    dash_suspended: bool,
    settings: &GravitySettings,
) -> GravityEffect {
    if !ground.is_grounded || on_wall {
        if dash_suspended {
            return GravityEffect::None;
        }
        let pull = settings.custom_gravity * fall_multiplier(body.velocity().y, settings.max_multiplier);
        body.add_force(-up() * pull, ForceMode::Acceleration);
        return GravityEffect::Pulled(pull);
    }

    let Some(normal) = ground.ground_normal() else {
        return GravityEffect::None;
    };
    let velocity = body.velocity();
    let into_ground = velocity.dot(&normal);
    if into_ground < settings.ground_stick_threshold {
        body.set_velocity(velocity - normal * into_ground);
        return GravityEffect::Stuck;
    }
    GravityEffect::None
}
