//! Jump sub-machine: grounded, buffered, coyote and double jumps plus the hold boost.

use crate::{
    body::{CharacterBody, ForceMode},
    constants::TIME_EPS,
    input::InputSnapshot,
    settings::JumpSettings,
    types::{Vec3, up},
    utils::sine_pulse,
};

/// Which jump fired on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpKind {
    Grounded,
    /// A press remembered from before landing.
    Buffered,
    Coyote,
    Double,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JumpState {
    /// Remaining buffer time of a press made while airborne.
    buffer: Option<f32>,
    time_since_grounded: f32,
    jumps_used: u32,
    coyote_used: bool,
    /// Elapsed time of the open hold window.
    hold: Option<f32>,
}

impl JumpState {
    pub fn jumps_used(&self) -> u32 {
        self.jumps_used
    }

    pub fn time_since_grounded(&self) -> f32 {
        self.time_since_grounded
    }

    pub fn is_buffered(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    /// Advance timers; grounded ticks reset the counters.
    pub fn track_ground(&mut self, is_grounded: bool, dt: f32) {
        if is_grounded {
            self.time_since_grounded = 0.0;
            self.jumps_used = 0;
            self.coyote_used = false;
        } else {
            self.time_since_grounded += dt;
        }

        if let Some(remaining) = self.buffer.as_mut() {
            *remaining -= dt;
            if *remaining + TIME_EPS < 0.0 {
                self.buffer = None;
            }
        }
    }

    /// Resolve this tick's jump, if any.
    pub fn handle<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        is_grounded: bool,
        input: &InputSnapshot,
        settings: &JumpSettings,
    ) -> Option<JumpKind> {
        if input.jump_pressed {
            return self.on_press(body, is_grounded, input, settings);
        }

        if is_grounded && self.buffer.take().is_some() {
            self.launch(body, settings);
            log::debug!("buffered jump on landing");
            return Some(JumpKind::Buffered);
        }
        None
    }

    fn on_press<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        is_grounded: bool,
        input: &InputSnapshot,
        settings: &JumpSettings,
    ) -> Option<JumpKind> {
        if is_grounded {
            self.buffer = None;
            self.launch(body, settings);
            log::debug!("jump");
            return Some(JumpKind::Grounded);
        }

        let in_coyote = self.time_since_grounded <= settings.coyote_time + TIME_EPS;
        if in_coyote && !self.coyote_used && body.velocity().y < 0.0 && input.jump_held {
            self.coyote_used = true;
            self.launch(body, settings);
            log::debug!("coyote jump {:.3}s after leaving ground", self.time_since_grounded);
            return Some(JumpKind::Coyote);
        }

        if settings.can_double_jump && self.jumps_used < settings.extra_jumps {
            self.jumps_used += 1;
            if settings.zero_velocity_on_double_jump {
                let v = body.velocity();
                body.set_velocity(Vec3::new(v.x, 0.0, v.z));
            }
            body.add_force(
                up() * settings.jump_force * settings.double_jump_multiplier,
                ForceMode::VelocityChange,
            );
            log::debug!("double jump {}/{}", self.jumps_used, settings.extra_jumps);
            return Some(JumpKind::Double);
        }

        self.buffer = Some(settings.jump_buffer_time);
        log::trace!("jump buffered");
        None
    }

    /// Zero vertical velocity, apply the jump impulse and open the hold window.
    fn launch<B: CharacterBody + ?Sized>(&mut self, body: &mut B, settings: &JumpSettings) {
        let v = body.velocity();
        body.set_velocity(Vec3::new(v.x, 0.0, v.z));
        body.add_force(up() * settings.jump_force, ForceMode::VelocityChange);
        self.hold = settings.can_hold_jump.then_some(0.0);
    }

    /// Extra lift while the jump stays held inside the hold window.
    ///
    /// Returns whether lift was applied this tick.
    pub fn apply_hold<B: CharacterBody + ?Sized>(
        &mut self,
        body: &mut B,
        input: &InputSnapshot,
        settings: &JumpSettings,
        dt: f32,
    ) -> bool {
        let Some(elapsed) = self.hold else {
            return false;
        };
        if !settings.can_hold_jump || !input.jump_held || elapsed >= settings.jump_hold_duration {
            self.hold = None;
            return false;
        }

        let elapsed = elapsed + dt;
        self.hold = Some(elapsed);
        let progress = elapsed / settings.jump_hold_duration;
        let lift = settings.jump_hold_force * sine_pulse(progress);
        body.add_force(up() * lift, ForceMode::Acceleration);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
