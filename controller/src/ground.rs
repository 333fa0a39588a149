//! Ground sensing: grounded state, supporting normal and slope admissibility.
//!
//! Every evaluation starts from scratch. Two casts are issued:
//! - a short forward ray near the feet that answers "am I walking into a rising slope?"
//! - a downward probe sweep (sphere, or flat box) below the collider base.
//!
//! Qualifying probe hits are combined with one of two policies:
//! - ascending: the first qualifying hit is taken verbatim. An averaged normal would
//!   push the character back down the slope it is climbing.
//! - otherwise: the normalized sum of all qualifying normals, which smooths seams and
//!   small bumps on near-flat ground. The contact point comes from the best-aligned hit.

use crate::{
    body::CharacterBody,
    constants::{ASCEND_VELOCITY_MIN, DIST_EPS},
    query::{HitBuffer, ProbeShape, SceneQuery, ShapeCastOracle},
    settings::GroundSettings,
    types::{ColliderDescriptor, GroundContact, Hit, Vec3, forward, up},
};

/// Half height of the flat box probe.
const BOX_PROBE_HALF_HEIGHT: f32 = 0.05;

/// Angle between `normal` and world up, in degrees.
#[inline]
pub fn angle_from_vertical_deg(normal: &Vec3) -> f32 {
    normal.angle(&up()).to_degrees()
}

/// Whether a surface with `normal` is walkable under `max_slope_angle_deg`.
///
/// Inclusive at the boundary: `dot(normal, up) >= cos(max_slope_angle)`.
#[inline]
pub fn is_ground_admissible(normal: &Vec3, max_slope_angle_deg: f32) -> bool {
    normal.dot(&up()) >= max_slope_angle_deg.to_radians().cos()
}

/// Whether a surface with `normal` is steep enough to count as a wall.
#[inline]
pub fn is_wall(normal: &Vec3, wall_angle_threshold_deg: f32) -> bool {
    angle_from_vertical_deg(normal) >= wall_angle_threshold_deg
}

/// Evaluate ground contact for `body` against `scene`.
///
/// An unbound or degenerate collider yields "not grounded".
pub fn evaluate_ground<Q, B>(scene: &Q, body: &B, settings: &GroundSettings) -> GroundContact
where
    Q: SceneQuery + ?Sized,
    B: CharacterBody + ?Sized,
{
    let Some(collider) = body.collider().filter(|c| !c.is_degenerate()) else {
        return GroundContact::airborne(false);
    };
    let oracle = ShapeCastOracle::new(scene, body.collider_id());
    let mut hits: HitBuffer = HitBuffer::new();

    let ascend_dir = ascend_direction(body.velocity(), &forward(&body.rotation()));
    let is_ascending = probe_ascending(&oracle, &collider, ascend_dir, settings, &mut hits);

    let (shape, half_height) = probe_shape(settings);
    let origin = collider.base() + up() * (half_height + settings.probe_offset);
    let found = oracle.cast_shape(origin, shape, -up(), settings.cast_distance, &mut hits);

    let contact = select_ground(&oracle, found, is_ascending, settings.min_ground_dot());
    log::trace!(
        "ground probe: {} hit(s), grounded={} ascending={}",
        found.len(),
        contact.is_grounded,
        contact.is_ascending
    );
    contact
}

/// Combine probe hits into a contact. See the module docs for the two policies.
pub fn select_ground<Q: SceneQuery + ?Sized>(
    oracle: &ShapeCastOracle<'_, Q>,
    hits: &[Hit],
    is_ascending: bool,
    min_ground_dot: f32,
) -> GroundContact {
    let mut qualifying = oracle
        .non_self_hits(hits)
        .filter(|h| h.normal.dot(&up()) >= min_ground_dot);

    if is_ascending {
        return match qualifying.next() {
            Some(first) => GroundContact {
                is_grounded: true,
                normal: first.normal,
                point: first.point,
                is_ascending,
            },
            None => GroundContact::airborne(is_ascending),
        };
    }

    let mut sum = Vec3::zeros();
    let mut best: Option<(f32, &Hit)> = None;
    for h in qualifying {
        sum += h.normal;
        let alignment = h.normal.dot(&up());
        if best.is_none_or(|(a, _)| alignment > a) {
            best = Some((alignment, h));
        }
    }

    match best {
        Some((_, best)) => GroundContact {
            is_grounded: true,
            // Opposing normals can cancel out; fall back to the best single hit.
            normal: sum.try_normalize(DIST_EPS).unwrap_or(best.normal),
            point: best.point,
            is_ascending,
        },
        None => GroundContact::airborne(is_ascending),
    }
}

/// Forward ray near the feet: does anything rise in front of the character?
fn probe_ascending<Q: SceneQuery + ?Sized>(
    oracle: &ShapeCastOracle<'_, Q>,
    collider: &ColliderDescriptor,
    direction: Vec3,
    settings: &GroundSettings,
    hits: &mut HitBuffer,
) -> bool {
    let origin = collider.base() + up() * settings.ascend_probe_height;
    let reach = collider.radius + settings.ascend_probe_distance;
    let found = oracle.cast_ray(origin, direction, reach, hits);
    oracle.first_non_self_hit(found).is_some()
}

/// Horizontal travel direction when moving, else the facing direction.
fn ascend_direction(velocity: Vec3, facing: &Vec3) -> Vec3 {
    let planar = Vec3::new(velocity.x, 0.0, velocity.z);
    if planar.norm() > ASCEND_VELOCITY_MIN {
        return planar.normalize();
    }
    Vec3::new(facing.x, 0.0, facing.z)
}

fn probe_shape(settings: &GroundSettings) -> (ProbeShape, f32) {
    if settings.use_box_probe {
        let half_extents = Vec3::new(
            settings.sensor_radius,
            BOX_PROBE_HALF_HEIGHT,
            settings.sensor_radius,
        );
        (ProbeShape::Box { half_extents }, BOX_PROBE_HALF_HEIGHT)
    } else {
        (
            ProbeShape::Sphere {
                radius: settings.sensor_radius,
            },
            settings.sensor_radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBody, FakeScene, GROUND_ID, SELF_ID, WALL_ID, hit, hit_at};

    fn normal_at_angle(deg: f32) -> Vec3 {
        let a = deg.to_radians();
        Vec3::new(a.sin(), a.cos(), 0.0)
    }

    #[test]
    fn admissibility_matches_angle_from_vertical() {
        for max in [0.0_f32, 30.0, 45.0, 60.0, 89.0] {
            for angle in [0.0_f32, 10.0, 29.0, 44.0, 46.0, 59.0, 61.0, 80.0, 89.5] {
                let n = normal_at_angle(angle);
                assert_eq!(
                    is_ground_admissible(&n, max),
                    angle <= max,
                    "angle {angle} max {max}"
                );
            }
        }
    }

    #[test]
    fn admissibility_is_inclusive_at_the_limit() {
        for max in [20.0_f32, 45.0, 70.0] {
            let a = max.to_radians();
            let n = Vec3::new(a.sin(), a.cos(), 0.0);
            assert!(is_ground_admissible(&n, max), "boundary {max}");
        }
    }

    #[test]
    fn wall_classification_uses_threshold() {
        assert!(is_wall(&Vec3::x(), 70.0));
        assert!(!is_wall(&normal_at_angle(30.0), 70.0));
    }

    #[test]
    fn ascending_takes_first_qualifying_hit_verbatim() {
        let a = normal_at_angle(20.0);
        let b = normal_at_angle(5.0);
        let scene = FakeScene::default();
        let oracle = ShapeCastOracle::new(&scene, Some(SELF_ID));
        let hits = [hit(GROUND_ID, 0.05, a), hit(GROUND_ID + 1, 0.1, b)];

        let contact = select_ground(&oracle, &hits, true, 45_f32.to_radians().cos());
        assert!(contact.is_grounded);
        assert_eq!(contact.normal, hits[0].normal);
    }

    #[test]
    fn not_ascending_averages_qualifying_normals() {
        let n1 = normal_at_angle(20.0);
        let n2 = Vec3::new(0.0, 0.9, 0.3).normalize();
        let scene = FakeScene::default();
        let oracle = ShapeCastOracle::new(&scene, Some(SELF_ID));
        let hits = [hit(GROUND_ID, 0.05, n1), hit(GROUND_ID + 1, 0.1, n2)];

        let contact = select_ground(&oracle, &hits, false, 45_f32.to_radians().cos());
        let expected = (hits[0].normal + hits[1].normal).normalize();
        assert!(contact.is_grounded);
        assert!((contact.normal - expected).norm() < 1.0e-6);
    }

    #[test]
    fn composite_point_comes_from_best_aligned_hit() {
        let scene = FakeScene::default();
        let oracle = ShapeCastOracle::new(&scene, Some(SELF_ID));
        let tilted = hit_at(GROUND_ID, 0.02, normal_at_angle(30.0), Vec3::new(1.0, 0.0, 0.0));
        let flat = hit_at(GROUND_ID + 1, 0.08, Vec3::y(), Vec3::new(0.0, -0.1, 0.0));

        let contact = select_ground(&oracle, &[tilted, flat], false, 0.5);
        assert_eq!(contact.point, flat.point);
    }

    #[test]
    fn steep_and_self_hits_never_qualify() {
        let scene = FakeScene::default();
        let oracle = ShapeCastOracle::new(&scene, Some(SELF_ID));
        let hits = [hit(SELF_ID, 0.0, Vec3::y()), hit(WALL_ID, 0.05, normal_at_angle(80.0))];

        assert!(!select_ground(&oracle, &hits, false, 0.7).is_grounded);
        assert!(!select_ground(&oracle, &hits, true, 0.7).is_grounded);
    }

    #[test]
    fn steep_hits_are_skipped_before_first_qualifying_when_ascending() {
        let scene = FakeScene::default();
        let oracle = ShapeCastOracle::new(&scene, Some(SELF_ID));
        let ramp = normal_at_angle(30.0);
        let hits = [hit(WALL_ID, 0.01, Vec3::x()), hit(GROUND_ID, 0.05, ramp)];

        let contact = select_ground(&oracle, &hits, true, 0.7);
        assert_eq!(contact.normal, hits[1].normal);
    }

    #[test]
    fn no_hits_means_not_grounded() {
        let body = FakeBody::default();
        let contact = evaluate_ground(&FakeScene::default(), &body, &GroundSettings::default());
        assert!(!contact.is_grounded);
        assert_eq!(contact.ground_normal(), None);
        assert_eq!(contact.normal_or_up(), Vec3::y());
    }

    #[test]
    fn no_hits_means_not_grounded_even_when_ascending() {
        let scene = FakeScene::default().with_rays(vec![hit(WALL_ID, 0.3, normal_at_angle(30.0))]);
        let contact = evaluate_ground(&scene, &FakeBody::default(), &GroundSettings::default());
        assert!(contact.is_ascending);
        assert!(!contact.is_grounded);
    }

    #[test]
    fn unbound_collider_is_not_grounded() {
        let contact = evaluate_ground(
            &FakeScene::flat_ground(),
            &FakeBody::unbound(),
            &GroundSettings::default(),
        );
        assert!(!contact.is_grounded);
    }

    #[test]
    fn flat_ground_is_grounded_with_up_normal() {
        let contact = evaluate_ground(
            &FakeScene::flat_ground(),
            &FakeBody::default(),
            &GroundSettings::default(),
        );
        assert!(contact.is_grounded);
        assert!(!contact.is_ascending);
        assert_eq!(contact.ground_normal(), Some(Vec3::y()));
    }

    #[test]
    fn ascending_probe_follows_velocity_when_moving() {
        // Only rays heading +X report the slope; the body faces -Z but moves +X.
        let scene = FakeScene::default()
            .with_ray_rule(|_, dir| dir.x > 0.9, vec![hit(GROUND_ID, 0.4, normal_at_angle(30.0))]);
        let body = FakeBody::default().moving(Vec3::new(3.0, 0.0, 0.0));

        let contact = evaluate_ground(&scene, &body, &GroundSettings::default());
        assert!(contact.is_ascending);
    }

    #[test]
    fn ascending_probe_uses_facing_when_still() {
        let scene = FakeScene::default()
            .with_ray_rule(|_, dir| dir.z < -0.9, vec![hit(GROUND_ID, 0.4, normal_at_angle(30.0))]);
        let contact = evaluate_ground(&scene, &FakeBody::default(), &GroundSettings::default());
        assert!(contact.is_ascending);
    }
}
