//! Wall contact tracking from the solver's contact callbacks.

use crate::{ground::is_wall, types::Vec3};

/// Tracks whether the body is pressed against a wall-like surface.
///
/// Set from a contact-stay batch, cleared on contact end. The flag reflects the latest
/// batch only and never outlives the contacts that produced it.
#[derive(Clone, Copy, Debug)]
pub struct WallContactTracker {
    wall_angle_threshold_deg: f32,
    on_wall: bool,
}

impl WallContactTracker {
    pub fn new(wall_angle_threshold_deg: f32) -> Self {
        Self {
            wall_angle_threshold_deg,
            on_wall: false,
        }
    }

    pub fn on_wall(&self) -> bool {
        self.on_wall
    }

    /// Every active contact normal of the tick.
    pub fn on_contact_stay(&mut self, normals: &[Vec3]) {
        let on_wall = normals
            .iter()
            .filter_map(|n| n.try_normalize(f32::EPSILON))
            .any(|n| is_wall(&n, self.wall_angle_threshold_deg));
        if on_wall != self.on_wall {
            log::debug!("wall contact: {on_wall}");
        }
        self.on_wall = on_wall;
    }

    pub fn on_contact_end(&mut self) {
        if self.on_wall {
            log::debug!("wall contact: false");
        }
        self.on_wall = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_contacts_are_not_walls() {
        let mut t = WallContactTracker::new(70.0);
        t.on_contact_stay(&[Vec3::y(), Vec3::new(0.2, 1.0, 0.0)]);
        assert!(!t.on_wall());
    }

    #[test]
    fn any_steep_contact_sets_the_flag() {
        let mut t = WallContactTracker::new(70.0);
        t.on_contact_stay(&[Vec3::y(), Vec3::new(-1.0, 0.0, 0.0)]);
        assert!(t.on_wall());
    }

    #[test]
    fn unnormalized_normals_are_classified_by_direction() {
        let mut t = WallContactTracker::new(70.0);
        t.on_contact_stay(&[Vec3::new(0.0, 0.0, 5.0)]);
        assert!(t.on_wall());
    }

    #[test]
    fn flag_clears_on_contact_end() {
        let mut t = WallContactTracker::new(70.0);
        t.on_contact_stay(&[Vec3::x()]);
        t.on_contact_end();
        assert!(!t.on_wall());
    }

    #[test]
    fn flag_follows_latest_batch() {
        let mut t = WallContactTracker::new(70.0);
        t.on_contact_stay(&[Vec3::x()]);
        t.on_contact_stay(&[Vec3::y()]);
        assert!(!t.on_wall());
    }
}
