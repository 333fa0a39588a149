/*!
Locomotion state machine.

[`LocomotionController::fixed_update`] runs once per fixed physics step, before the
solver integrates that step, in this order:

1. deferred actions due at this tick's timestamp
2. ground contact
3. step-up and lateral obstruction, then traction material
4. gravity shaping
5. jump, dash and horizontal movement
6. jump-hold lift

The grounded/airborne, jump, dash and traction machines are independent and share only
the tick boundary. Nothing here fails: a missing ground normal or obstruction simply
disables the branch that needs it for that tick.
*/

mod dash;
mod gravity;
mod jump;
mod movement;

pub use dash::DashState;
pub use gravity::{GravityEffect, apply_gravity, fall_multiplier};
pub use jump::{JumpKind, JumpState};
pub use movement::{apply_movement, target_speed, turn_toward};

use crate::{
    body::CharacterBody,
    camera::CameraBasis,
    contacts::WallContactTracker,
    ground::evaluate_ground,
    input::InputSnapshot,
    material::{MaterialSelector, TractionInputs, TractionMaterial},
    query::SceneQuery,
    schedule::{DeferredAction, Scheduler},
    settings::ControllerSettings,
    step::{ObstructionQuery, apply_step_up, probe_obstructions},
    types::{GroundContact, ObstructionReport, Vec3, forward},
    utils::{move_to_world, planar},
};

/// Summary of one fixed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub ground: GroundContact,
    pub obstruction: ObstructionReport,
    pub on_wall: bool,
    /// Material in effect after this tick.
    pub material: Option<TractionMaterial>,
    /// A material swap was applied to the body this tick.
    pub material_changed: bool,
    pub landed: bool,
    pub gravity: GravityEffect,
    pub jump: Option<JumpKind>,
    pub dashed: bool,
    pub hold_lift: bool,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            ground: GroundContact::default(),
            obstruction: ObstructionReport::default(),
            on_wall: false,
            material: None,
            material_changed: false,
            landed: false,
            gravity: GravityEffect::None,
            jump: None,
            dashed: false,
            hold_lift: false,
        }
    }
}

impl TickReport {
    pub fn jumped(&self) -> bool {
        self.jump.is_some()
    }

    pub fn double_jumped(&self) -> bool {
        self.jump == Some(JumpKind::Double)
    }

    pub fn coyote_jumped(&self) -> bool {
        self.jump == Some(JumpKind::Coyote)
    }

    pub fn buffered_jump(&self) -> bool {
        self.jump == Some(JumpKind::Buffered)
    }

    pub fn stepped_up(&self) -> bool {
        self.obstruction.step_up.is_some()
    }
}

pub struct LocomotionController {
    settings: ControllerSettings,
    scheduler: Scheduler,
    contacts: WallContactTracker,
    material: MaterialSelector,
    jump: JumpState,
    dash: DashState,
    was_grounded: bool,
    time: f32,
    enabled: bool,
}

impl LocomotionController {
    pub fn new(settings: ControllerSettings) -> Self {
        let contacts = WallContactTracker::new(settings.ground.wall_angle_threshold_deg);
        Self {
            settings,
            scheduler: Scheduler::new(),
            contacts,
            material: MaterialSelector::new(),
            jump: JumpState::default(),
            dash: DashState::default(),
            was_grounded: false,
            time: 0.0,
            enabled: true,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Simulation time of the last tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_grounded(&self) -> bool {
        self.was_grounded
    }

    pub fn jump_state(&self) -> &JumpState {
        &self.jump
    }

    pub fn dash_state(&self) -> &DashState {
        &self.dash
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn on_wall(&self) -> bool {
        self.contacts.on_wall()
    }

    /// Every active contact normal of the last physics step.
    pub fn on_contact_stay(&mut self, normals: &[Vec3]) {
        self.contacts.on_contact_stay(normals);
    }

    pub fn on_contact_end(&mut self) {
        self.contacts.on_contact_end();
    }

    /// Stop ticking and drop pending deferred actions.
    ///
    /// Gravity held off by a step-up grace or a gravity-free dash is handed back to the
    /// body, since nothing would restore it while disabled.
    pub fn disable<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        if !self.enabled {
            return;
        }
        log::debug!("controller disabled");
        let grace_pending = self
            .scheduler
            .due_time(DeferredAction::EnableGravity)
            .is_some();
        self.scheduler.cancel_all();
        if grace_pending {
            body.set_gravity_enabled(true);
        }
        self.dash.release(body);
        self.dash.reset();
        self.enabled = false;
    }

    /// Resume ticking with fresh counters.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        log::debug!("controller enabled");
        self.jump.reset();
        self.dash.reset();
        self.material.reset();
        self.contacts.on_contact_end();
        self.was_grounded = false;
        self.enabled = true;
    }

    /// Run one fixed tick of `dt` seconds.
    pub fn fixed_update<B, Q>(
        &mut self,
        body: &mut B,
        scene: &Q,
        input: &InputSnapshot,
        camera: &CameraBasis,
        dt: f32,
    ) -> TickReport
    where
        B: CharacterBody + ?Sized,
        Q: SceneQuery + ?Sized,
    {
        if !self.enabled {
            return TickReport::default();
        }
        if !(dt > 0.0) || !dt.is_finite() {
            log::warn!("ignoring tick with invalid delta time {dt}");
            return TickReport::default();
        }

        self.time += dt;
        self.run_deferred(body);

        let ground = evaluate_ground(scene, body, &self.settings.ground);
        let landed = ground.is_grounded && !self.was_grounded;
        if ground.is_grounded != self.was_grounded {
            log::debug!(
                "{} at t={:.3}",
                if ground.is_grounded { "landed" } else { "left ground" },
                self.time
            );
        }
        self.was_grounded = ground.is_grounded;
        self.jump.track_ground(ground.is_grounded, dt);
        self.dash.track_ground(ground.is_grounded);

        let obstruction = probe_obstructions(
            scene,
            body,
            ObstructionQuery {
                is_grounded: ground.is_grounded,
                has_move_input: input.has_move_input(),
                wall_angle_threshold_deg: self.settings.ground.wall_angle_threshold_deg,
            },
            &self.settings.step,
        );
        if let Some(target) = obstruction.step_up {
            apply_step_up(body, target, self.time, &self.settings.step, &mut self.scheduler);
        }

        let on_wall = self.contacts.on_wall();
        let swap = self.material.update(TractionInputs {
            is_grounded: ground.is_grounded,
            wall_touching: on_wall || obstruction.lateral_blocked(),
            is_moving: input.is_moving(),
        });
        if let Some(material) = swap {
            log::debug!("traction material -> {material:?}");
            body.set_material(material);
        }
        let profile = *self
            .settings
            .material
            .profile(self.material.current().unwrap_or(TractionMaterial::Default));

        let gravity = apply_gravity(
            body,
            &ground,
            on_wall,
            self.dash.is_suspended(),
            &self.settings.gravity,
        );

        self.dash.update(body, ground.is_grounded, on_wall, &self.settings.dash);
        let jump = self
            .jump
            .handle(body, ground.is_grounded, input, &self.settings.jump);

        let direction = self.input_direction(input, camera);
        let dashed = input.sprint_pressed && {
            let dash_dir = if direction != Vec3::zeros() {
                direction
            } else {
                planar(forward(&body.rotation()))
            };
            self.dash.try_dash(
                body,
                dash_dir,
                ground.is_grounded,
                self.settings.movement.sprint_max_speed,
                &self.settings.dash,
            )
        };

        apply_movement(
            body,
            direction,
            input.sprint_held,
            &ground,
            &profile,
            &self.settings.movement,
        );
        turn_toward(body, direction, &self.settings.movement, dt);

        let hold_lift = self.jump.apply_hold(body, input, &self.settings.jump, dt);

        TickReport {
            ground,
            obstruction,
            on_wall,
            material: self.material.current(),
            material_changed: swap.is_some(),
            landed,
            gravity,
            jump,
            dashed,
            hold_lift,
        }
    }

    fn run_deferred<B: CharacterBody + ?Sized>(&mut self, body: &mut B) {
        for action in self.scheduler.drain_due(self.time) {
            match action {
                DeferredAction::EnableGravity => {
                    // A gravity-free dash still owns the flag.
                    if !self.dash.is_suspended() {
                        log::debug!("gravity restored at t={:.3}", self.time);
                        body.set_gravity_enabled(true);
                    }
                }
            }
        }
    }

    /// Unit world direction of the move input, or zero.
    fn input_direction(&self, input: &InputSnapshot, camera: &CameraBasis) -> Vec3 {
        if !input.is_moving() {
            return Vec3::zeros();
        }
        let raw = if self.settings.movement.follow_camera {
            camera.relative_direction(input.move_vector)
        } else {
            move_to_world(input.move_vector)
        };
        planar(raw)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }
}
