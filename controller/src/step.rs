//! Step-up and lateral obstruction detection.
//!
//! Both checks only run while grounded. A forward ray near the feet looks for a wall;
//! when it finds one, a second ray starts just past the wall face, raised above it,
//! and angles down onto the ledge top. A ledge low enough to climb (and movement
//! intent) yields a step-up target: the body is repositioned directly rather than
//! pushed, so the solver never fights the climb.
//!
//! Lateral rays along the body's right and left axes flag wall contact for traction
//! selection.

use crate::{
    body::CharacterBody,
    ground::is_wall,
    query::{HitBuffer, SceneQuery, ShapeCastOracle},
    schedule::{DeferredAction, Scheduler},
    settings::StepSettings,
    types::{ColliderDescriptor, ObstructionReport, Vec3, forward, right, up},
    utils::planar,
};

/// Sensed state the obstruction probes are gated on.
#[derive(Clone, Copy, Debug)]
pub struct ObstructionQuery {
    pub is_grounded: bool,
    pub has_move_input: bool,
    pub wall_angle_threshold_deg: f32,
}

/// Run the forward step probe and the lateral probes.
///
/// The returned report carries the step-up target; nothing is applied to the body.
pub fn probe_obstructions<Q, B>(
    scene: &Q,
    body: &B,
    query: ObstructionQuery,
    settings: &StepSettings,
) -> ObstructionReport
where
    Q: SceneQuery + ?Sized,
    B: CharacterBody + ?Sized,
{
    if !query.is_grounded {
        return ObstructionReport::default();
    }
    let Some(collider) = body.collider().filter(|c| !c.is_degenerate()) else {
        return ObstructionReport::default();
    };
    let Some(facing) = planar(forward(&body.rotation())).try_normalize(f32::EPSILON) else {
        return ObstructionReport::default();
    };

    let oracle = ShapeCastOracle::new(scene, body.collider_id());
    let mut hits: HitBuffer = HitBuffer::new();

    let step_up = if query.has_move_input {
        probe_step(&oracle, &collider, body.position(), facing, query, settings, &mut hits)
    } else {
        None
    };

    let side = planar(right(&body.rotation()));
    let reach = collider.radius + settings.lateral_probe_offset;
    let mut blocked = |dir: Vec3| {
        let found = oracle.cast_ray(collider.center, dir, reach, &mut hits);
        oracle
            .first_non_self_hit(found)
            .is_some_and(|h| is_wall(&h.normal, query.wall_angle_threshold_deg))
    };
    let right_blocked = blocked(side);
    let left_blocked = blocked(-side);

    ObstructionReport {
        step_up,
        left_blocked,
        right_blocked,
    }
}

/// New body position for climbing a ledge ahead, if one is climbable.
fn probe_step<Q: SceneQuery + ?Sized>(
    oracle: &ShapeCastOracle<'_, Q>,
    collider: &ColliderDescriptor,
    position: Vec3,
    facing: Vec3,
    query: ObstructionQuery,
    settings: &StepSettings,
    hits: &mut HitBuffer,
) -> Option<Vec3> {
    let base = collider.base();
    let origin = base + up() * settings.first_step_offset;
    let found = oracle.cast_ray(
        origin,
        facing,
        collider.radius + settings.step_ray_offset,
        hits,
    );
    let wall = oracle
        .first_non_self_hit(found)
        .filter(|h| is_wall(&h.normal, query.wall_angle_threshold_deg))?;

    let diagonal_origin = origin
        + facing * (wall.distance + settings.diagonal_forward_offset)
        + up() * settings.step_height_offset;
    let diagonal_dir = -up() * settings.check_angle + facing;
    let found = oracle.cast_ray(
        diagonal_origin,
        diagonal_dir,
        settings.step_check_distance + settings.step_ray_offset,
        hits,
    );
    let ledge = oracle.first_non_self_hit(found)?;

    let height = ledge.point.y - base.y;
    if height <= settings.min_step_height || height > settings.max_step_height {
        log::trace!("ledge at {height:.3} m is not climbable");
        return None;
    }

    // Base lands on the ledge top.
    let center_y = ledge.point.y + collider.height * 0.5 * collider.scale.y;
    Some(Vec3::new(position.x, center_y, position.z) + facing * settings.step_forward_nudge)
}

/// Reposition the body onto a ledge and suspend gravity for the grace period.
///
/// Any pending gravity re-enable is replaced.
pub fn apply_step_up<B: CharacterBody + ?Sized>(
    body: &mut B,
    target: Vec3,
    now: f32,
    settings: &StepSettings,
    scheduler: &mut Scheduler,
) {
    log::debug!(
        "step-up: {:.3} -> {:.3}",
        body.position().y,
        target.y
    );
    body.move_position(target);
    let v = body.velocity();
    if v.y < 0.0 {
        body.set_velocity(Vec3::new(v.x, 0.0, v.z));
    }
    body.set_gravity_enabled(false);
    scheduler.schedule_unique(now + settings.step_gravity_grace, DeferredAction::EnableGravity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBody, FakeScene, GROUND_ID, WALL_ID, hit, hit_at};

    const THRESHOLD: f32 = 70.0;

    fn query(has_move_input: bool) -> ObstructionQuery {
        ObstructionQuery {
            is_grounded: true,
            has_move_input,
            wall_angle_threshold_deg: THRESHOLD,
        }
    }

    /// A wall straight ahead (-Z) and a ledge top at `ledge_y`.
    fn ledge_scene(ledge_y: f32) -> FakeScene {
        FakeScene::default()
            .with_ray_rule(
                |_, dir| dir.y == 0.0 && dir.z < -0.9,
                vec![hit(WALL_ID, 0.1, Vec3::z())],
            )
            .with_ray_rule(
                |_, dir| dir.y < 0.0,
                vec![hit_at(GROUND_ID, 0.5, Vec3::y(), Vec3::new(0.0, ledge_y, -0.7))],
            )
    }

    #[test]
    fn climbable_ledge_yields_target_at_ledge_height() {
        // Body base at y = 0.
        let body = FakeBody::default();
        let settings = StepSettings::default();
        for h in [0.05_f32, 0.2, 0.35, settings.max_step_height] {
            let report = probe_obstructions(&ledge_scene(h), &body, query(true), &settings);
            let target = report.step_up.expect("climbable");
            let expected_y = h + 1.0;
            assert!((target.y - expected_y).abs() < 1.0e-5, "ledge {h}");
            assert!((target.z - (-settings.step_forward_nudge)).abs() < 1.0e-6);
        }
    }

    #[test]
    fn ledge_above_limit_is_ignored() {
        let settings = StepSettings::default();
        let report = probe_obstructions(
            &ledge_scene(settings.max_step_height + 0.05),
            &FakeBody::default(),
            query(true),
            &settings,
        );
        assert_eq!(report.step_up, None);
    }

    #[test]
    fn floor_noise_is_ignored() {
        let report = probe_obstructions(
            &ledge_scene(0.005),
            &FakeBody::default(),
            query(true),
            &StepSettings::default(),
        );
        assert_eq!(report.step_up, None);
    }

    #[test]
    fn no_step_without_move_input() {
        let report = probe_obstructions(
            &ledge_scene(0.2),
            &FakeBody::default(),
            query(false),
            &StepSettings::default(),
        );
        assert_eq!(report.step_up, None);
    }

    #[test]
    fn no_step_when_obstruction_is_a_slope() {
        let scene = FakeScene::default()
            .with_ray_rule(
                |_, dir| dir.y == 0.0,
                vec![hit(GROUND_ID, 0.1, Vec3::new(0.0, 1.0, 1.0))],
            )
            .with_ray_rule(
                |_, dir| dir.y < 0.0,
                vec![hit_at(GROUND_ID, 0.5, Vec3::y(), Vec3::new(0.0, 0.2, -0.7))],
            );
        let report = probe_obstructions(&scene, &FakeBody::default(), query(true), &StepSettings::default());
        assert_eq!(report.step_up, None);
    }

    #[test]
    fn airborne_skips_every_probe() {
        let scene = ledge_scene(0.2).with_rays(vec![hit(WALL_ID, 0.1, Vec3::x())]);
        let q = ObstructionQuery {
            is_grounded: false,
            ..query(true)
        };
        let report = probe_obstructions(&scene, &FakeBody::default(), q, &StepSettings::default());
        assert_eq!(report, ObstructionReport::default());
    }

    #[test]
    fn lateral_wall_marks_matching_side() {
        // Right of an identity rotation is +X; a wall there faces -X.
        let scene = FakeScene::default()
            .with_ray_rule(|_, dir| dir.x > 0.9, vec![hit(WALL_ID, 0.1, -Vec3::x())]);
        let report = probe_obstructions(&scene, &FakeBody::default(), query(false), &StepSettings::default());
        assert!(report.right_blocked);
        assert!(!report.left_blocked);
        assert!(report.lateral_blocked());
    }

    #[test]
    fn lateral_slope_is_not_a_wall() {
        let scene = FakeScene::default()
            .with_ray_rule(|_, dir| dir.x < -0.9, vec![hit(GROUND_ID, 0.1, Vec3::new(1.0, 2.0, 0.0))]);
        let report = probe_obstructions(&scene, &FakeBody::default(), query(false), &StepSettings::default());
        assert!(!report.lateral_blocked());
    }

    #[test]
    fn unbound_body_reports_nothing() {
        let report = probe_obstructions(
            &ledge_scene(0.2),
            &FakeBody::unbound(),
            query(true),
            &StepSettings::default(),
        );
        assert_eq!(report, ObstructionReport::default());
    }

    #[test]
    fn apply_step_up_moves_body_and_defers_gravity() {
        let mut body = FakeBody::default().moving(Vec3::new(0.0, -1.0, -2.0));
        let mut scheduler = Scheduler::new();
        let settings = StepSettings::default();
        let target = Vec3::new(0.0, 1.3, -0.02);

        apply_step_up(&mut body, target, 1.0, &settings, &mut scheduler);

        assert_eq!(body.moves, vec![target]);
        assert!(!body.gravity_enabled);
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(
            scheduler.due_time(DeferredAction::EnableGravity),
            Some(1.0 + settings.step_gravity_grace)
        );
    }
}
