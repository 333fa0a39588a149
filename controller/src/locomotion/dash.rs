//! Dash sub-machine.

use crate::{
    body::{CharacterBody, ForceMode},
    settings::DashSettings,
    types::Vec3,
    utils::planar,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct DashState {
    used: u32,
    /// Start position of a dash that suspended body gravity.
    suspended_from: Option<Vec3>,
}

impl DashState {
    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_from.is_some()
    }

    /// Landing refills the allotment.
    pub fn track_ground(&mut self, is_grounded: bool) {
        if is_grounded && self.used != 0 {
            log::trace!("dash allotment refilled");
            self.used = 0;
        }
    }

    /// End a gravity-free dash once it has travelled far enough or hit something.
    pub fn update<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        is_grounded: bool,
        on_wall: bool,
        settings: &DashSettings,
    ) {
        let Some(start) = self.suspended_from else {
            return;
        };
        let travelled = (body.position() - start).norm();
        if travelled > settings.dash_distance || is_grounded || on_wall {
            log::debug!("dash ended after {travelled:.2} m");
            body.set_gravity_enabled(true);
            self.suspended_from = None;
        }
    }

    /// Attempt a dash along `direction`. Returns whether an impulse was applied.
    ///
    /// Airborne dashes consume the allotment even when the speed cap blocks the impulse.
    pub fn try_dash<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        direction: Vec3,
        is_grounded: bool,
        speed_cap: f32,
        settings: &DashSettings,
    ) -> bool {
        if self.used >= settings.dash_amount {
            log::trace!("dash rejected: allotment exhausted");
            return false;
        }
        if !is_grounded {
            self.used += 1;
        }

        if planar(body.velocity()).norm() >= speed_cap {
            return false;
        }
        let Some(direction) = planar(direction).try_normalize(f32::EPSILON) else {
            return false;
        };

        if !settings.dash_has_gravity {
            body.set_gravity_enabled(false);
            self.suspended_from = Some(body.position());
            let v = body.velocity();
            body.set_velocity(Vec3::new(v.x, 0.0, v.z));
        }
        body.add_force(direction * settings.dash_force, ForceMode::VelocityChange);
        log::debug!("dash ({}/{} airborne used)", self.used, settings.dash_amount);
        true
    }

    /// Give gravity back if a dash still holds it.
    pub fn release<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if self.suspended_from.take().is_some() {
            body.set_gravity_enabled(true);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeBody;

    const CAP: f32 = 10.0;

    #[test]
    fn grounded_dash_applies_velocity_change_without_consuming() {
        let settings = DashSettings::default();
        let mut dash = DashState::default();
        let mut body = FakeBody::default();

        assert!(dash.try_dash(&mut body, -Vec3::z(), true, CAP, &settings));
        assert_eq!(dash.used(), 0);
        assert!((body.velocity - Vec3::new(0.0, 0.0, -settings.dash_force)).norm() < 1.0e-6);
    }

    #[test]
    fn airborne_dashes_are_limited_until_landing() {
        let settings = DashSettings::default();
        let mut dash = DashState::default();
        let mut body = FakeBody::default();

        assert!(dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings));
        body.velocity = Vec3::zeros();
        assert!(!dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings));
        assert_eq!(dash.used(), 1);

        dash.track_ground(true);
        assert_eq!(dash.used(), 0);
        assert!(dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings));
    }

    #[test]
    fn speed_cap_blocks_impulse_but_consumes_airborne_dash() {
        let settings = DashSettings::default();
        let mut dash = DashState::default();
        let mut body = FakeBody::default().moving(Vec3::new(CAP, 0.0, 0.0));

        assert!(!dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings));
        assert!(body.forces.is_empty());
        assert_eq!(dash.used(), 1);
    }

    #[test]
    fn gravity_free_dash_restores_gravity_after_distance() {
        let settings = DashSettings {
            dash_has_gravity: false,
            ..Default::default()
        };
        let mut dash = DashState::default();
        let mut body = FakeBody::default().moving(Vec3::new(0.0, -4.0, 0.0));

        assert!(dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings));
        assert!(!body.gravity_enabled);
        assert_eq!(body.velocity.y, 0.0);

        body.position.x += settings.dash_distance * 0.5;
        dash.update(&mut body, false, false, &settings);
        assert!(dash.is_suspended());

        body.position.x += settings.dash_distance;
        dash.update(&mut body, false, false, &settings);
        assert!(!dash.is_suspended());
        assert!(body.gravity_enabled);
    }

    #[test]
    fn wall_contact_ends_gravity_free_dash() {
        let settings = DashSettings {
            dash_has_gravity: false,
            ..Default::default()
        };
        let mut dash = DashState::default();
        let mut body = FakeBody::default();

        dash.try_dash(&mut body, Vec3::x(), false, CAP, &settings);
        dash.update(&mut body, false, true, &settings);
        assert!(body.gravity_enabled);
    }
}
