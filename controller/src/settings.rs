/*!
Controller settings.

One settings value configures every subsystem of a character. All groups deserialize
with `#[serde(default)]`, so a settings file only needs the values it changes:

```toml
[ground]
max_slope_angle_deg = 40.0

[jump]
can_double_jump = true
```

Values are validated once, when loaded ([`ControllerSettings::validate`]); nothing is
re-checked per tick.

Notes
- Values are expressed in meters, seconds, and degrees (converted to radians at use).
*/

use std::path::Path;

use serde::Deserialize;

use crate::{
    constants::*,
    error::SettingsError,
    material::{TractionMaterial, TractionProfile},
};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub ground: GroundSettings,
    pub step: StepSettings,
    pub movement: MovementSettings,
    pub jump: JumpSettings,
    pub dash: DashSettings,
    pub gravity: GravitySettings,
    pub material: MaterialSettings,
    pub input: InputSettings,
}

/// Ground probe geometry and surface classification.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundSettings {
    /// Steepest walkable surface, measured from vertical (degrees, 0..=89).
    pub max_slope_angle_deg: f32,
    /// Surfaces at least this steep are walls (degrees, 0..=89).
    pub wall_angle_threshold_deg: f32,
    pub sensor_radius: f32,
    pub probe_offset: f32,
    pub cast_distance: f32,
    pub ascend_probe_height: f32,
    pub ascend_probe_distance: f32,
    /// Sweep a flat box instead of a sphere.
    pub use_box_probe: bool,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            max_slope_angle_deg: MAX_SLOPE_ANGLE_DEG,
            wall_angle_threshold_deg: WALL_ANGLE_THRESHOLD_DEG,
            sensor_radius: GROUND_SENSOR_RADIUS,
            probe_offset: GROUND_PROBE_OFFSET,
            cast_distance: GROUND_CAST_DISTANCE,
            ascend_probe_height: ASCEND_PROBE_HEIGHT,
            ascend_probe_distance: ASCEND_PROBE_DISTANCE,
            use_box_probe: false,
        }
    }
}

impl GroundSettings {
    /// Minimum `dot(normal, up)` of a walkable surface.
    #[inline]
    pub fn min_ground_dot(&self) -> f32 {
        self.max_slope_angle_deg.to_radians().cos()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StepSettings {
    pub first_step_offset: f32,
    pub step_ray_offset: f32,
    pub step_height_offset: f32,
    pub step_check_distance: f32,
    pub check_angle: f32,
    pub diagonal_forward_offset: f32,
    pub min_step_height: f32,
    pub max_step_height: f32,
    pub step_forward_nudge: f32,
    pub step_gravity_grace: f32,
    pub lateral_probe_offset: f32,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            first_step_offset: FIRST_STEP_OFFSET,
            step_ray_offset: STEP_RAY_OFFSET,
            step_height_offset: STEP_HEIGHT_OFFSET,
            step_check_distance: STEP_CHECK_DISTANCE,
            check_angle: STEP_CHECK_ANGLE,
            diagonal_forward_offset: DIAGONAL_FORWARD_OFFSET,
            min_step_height: MIN_STEP_HEIGHT,
            max_step_height: MAX_STEP_HEIGHT,
            step_forward_nudge: STEP_FORWARD_NUDGE,
            step_gravity_grace: STEP_GRAVITY_GRACE,
            lateral_probe_offset: LATERAL_PROBE_OFFSET,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub acceleration: f32,
    pub air_acceleration: f32,
    pub base_speed: f32,
    pub sprint_max_speed: f32,
    pub braking_force: f32,
    pub brake_speed_threshold: f32,
    pub turn_sharpness: f32,
    pub air_turn_sharpness: f32,
    pub rotation_sharpness: f32,
    /// Reframe move input relative to the camera.
    pub follow_camera: bool,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            air_acceleration: AIR_ACCELERATION,
            base_speed: BASE_SPEED,
            sprint_max_speed: SPRINT_MAX_SPEED,
            braking_force: BRAKING_FORCE,
            brake_speed_threshold: BRAKE_SPEED_THRESHOLD,
            turn_sharpness: TURN_SHARPNESS,
            air_turn_sharpness: AIR_TURN_SHARPNESS,
            rotation_sharpness: ROTATION_SHARPNESS,
            follow_camera: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    pub jump_force: f32,
    pub can_hold_jump: bool,
    pub jump_hold_force: f32,
    pub jump_hold_duration: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    pub can_double_jump: bool,
    pub extra_jumps: u32,
    pub double_jump_multiplier: f32,
    pub zero_velocity_on_double_jump: bool,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            jump_force: JUMP_FORCE,
            can_hold_jump: false,
            jump_hold_force: JUMP_HOLD_FORCE,
            jump_hold_duration: JUMP_HOLD_DURATION,
            jump_buffer_time: JUMP_BUFFER_TIME,
            coyote_time: COYOTE_TIME,
            can_double_jump: false,
            extra_jumps: EXTRA_JUMPS,
            double_jump_multiplier: DOUBLE_JUMP_MULTIPLIER,
            zero_velocity_on_double_jump: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashSettings {
    pub dash_force: f32,
    pub dash_distance: f32,
    pub dash_amount: u32,
    /// When false, body gravity is suspended for the dash.
    pub dash_has_gravity: bool,
}

impl Default for DashSettings {
    fn default() -> Self {
        Self {
            dash_force: DASH_FORCE,
            dash_distance: DASH_DISTANCE,
            dash_amount: DASH_AMOUNT,
            dash_has_gravity: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    pub custom_gravity: f32,
    pub max_multiplier: f32,
    pub ground_stick_threshold: f32,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            custom_gravity: CUSTOM_GRAVITY,
            max_multiplier: MAX_GRAVITY_MULTIPLIER,
            ground_stick_threshold: GROUND_STICK_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "MaterialSettingsFile")]
pub struct MaterialSettings {
    pub default: TractionProfile,
    pub slide: TractionProfile,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            default: TractionProfile::default(),
            slide: TractionProfile {
                friction: SLIDE_FRICTION,
                speed_factor: 0.75,
                braking_factor: 0.4,
                turn_factor: 0.5,
            },
        }
    }
}

/// `[material]` as written in a settings file. Each profile only overrides the fields
/// it names, on top of that material's own defaults.
#[derive(Default, Deserialize)]
#[serde(default)]
struct MaterialSettingsFile {
    default: ProfileOverrides,
    slide: ProfileOverrides,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    friction: Option<f32>,
    speed_factor: Option<f32>,
    braking_factor: Option<f32>,
    turn_factor: Option<f32>,
}

impl ProfileOverrides {
    fn apply(self, base: TractionProfile) -> TractionProfile {
        TractionProfile {
            friction: self.friction.unwrap_or(base.friction),
            speed_factor: self.speed_factor.unwrap_or(base.speed_factor),
            braking_factor: self.braking_factor.unwrap_or(base.braking_factor),
            turn_factor: self.turn_factor.unwrap_or(base.turn_factor),
        }
    }
}

impl From<MaterialSettingsFile> for MaterialSettings {
    fn from(file: MaterialSettingsFile) -> Self {
        let base = Self::default();
        Self {
            default: file.default.apply(base.default),
            slide: file.slide.apply(base.slide),
        }
    }
}

impl MaterialSettings {
    pub fn profile(&self, material: TractionMaterial) -> &TractionProfile {
        match material {
            TractionMaterial::Default => &self.default,
            TractionMaterial::Slide => &self.slide,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub sprint_hold_threshold: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            sprint_hold_threshold: SPRINT_HOLD_THRESHOLD,
        }
    }
}

impl ControllerSettings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()
    }

    /// Read, parse and validate a TOML settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Clamp angles into `[0, 89]` degrees and reject negative or non-finite magnitudes.
    pub fn validate(mut self) -> Result<Self, SettingsError> {
        clamp_angle(
            "ground.max_slope_angle_deg",
            &mut self.ground.max_slope_angle_deg,
        )?;
        clamp_angle(
            "ground.wall_angle_threshold_deg",
            &mut self.ground.wall_angle_threshold_deg,
        )?;

        let g = &self.ground;
        let s = &self.step;
        let m = &self.movement;
        let j = &self.jump;
        let d = &self.dash;
        let gr = &self.gravity;
        let checks: [(&'static str, f32); 44] = [
            ("ground.sensor_radius", g.sensor_radius),
            ("ground.probe_offset", g.probe_offset),
            ("ground.cast_distance", g.cast_distance),
            ("ground.ascend_probe_height", g.ascend_probe_height),
            ("ground.ascend_probe_distance", g.ascend_probe_distance),
            ("step.first_step_offset", s.first_step_offset),
            ("step.step_ray_offset", s.step_ray_offset),
            ("step.step_height_offset", s.step_height_offset),
            ("step.step_check_distance", s.step_check_distance),
            ("step.check_angle", s.check_angle),
            ("step.diagonal_forward_offset", s.diagonal_forward_offset),
            ("step.min_step_height", s.min_step_height),
            ("step.max_step_height", s.max_step_height),
            ("step.step_forward_nudge", s.step_forward_nudge),
            ("step.step_gravity_grace", s.step_gravity_grace),
            ("step.lateral_probe_offset", s.lateral_probe_offset),
            ("movement.acceleration", m.acceleration),
            ("movement.air_acceleration", m.air_acceleration),
            ("movement.base_speed", m.base_speed),
            ("movement.sprint_max_speed", m.sprint_max_speed),
            ("movement.braking_force", m.braking_force),
            ("movement.brake_speed_threshold", m.brake_speed_threshold),
            ("movement.turn_sharpness", m.turn_sharpness),
            ("movement.air_turn_sharpness", m.air_turn_sharpness),
            ("movement.rotation_sharpness", m.rotation_sharpness),
            ("jump.jump_force", j.jump_force),
            ("jump.jump_hold_force", j.jump_hold_force),
            ("jump.jump_hold_duration", j.jump_hold_duration),
            ("jump.jump_buffer_time", j.jump_buffer_time),
            ("jump.coyote_time", j.coyote_time),
            ("jump.double_jump_multiplier", j.double_jump_multiplier),
            ("dash.dash_force", d.dash_force),
            ("dash.dash_distance", d.dash_distance),
            ("gravity.custom_gravity", gr.custom_gravity),
            ("gravity.max_multiplier", gr.max_multiplier),
            ("gravity.ground_stick_threshold", gr.ground_stick_threshold),
            ("material.default.friction", self.material.default.friction),
            ("material.default.speed_factor", self.material.default.speed_factor),
            ("material.default.braking_factor", self.material.default.braking_factor),
            ("material.default.turn_factor", self.material.default.turn_factor),
            ("material.slide.friction", self.material.slide.friction),
            ("material.slide.speed_factor", self.material.slide.speed_factor),
            ("material.slide.braking_factor", self.material.slide.braking_factor),
            ("material.slide.turn_factor", self.material.slide.turn_factor),
        ];
        for (field, value) in checks {
            non_negative(field, value)?;
        }
        non_negative(
            "input.sprint_hold_threshold",
            self.input.sprint_hold_threshold,
        )?;

        Ok(self)
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(SettingsError::Negative { field, value });
    }
    Ok(())
}

fn clamp_angle(field: &'static str, value: &mut f32) -> Result<(), SettingsError> {
    if !value.is_finite() {
        return Err(SettingsError::NotFinite { field });
    }
    let clamped = value.clamp(0.0, MAX_CONFIG_ANGLE_DEG);
    if clamped != *value {
        log::warn!("{field} = {value} is outside [0, {MAX_CONFIG_ANGLE_DEG}], clamped to {clamped}");
        *value = clamped;
    }
    Ok(())
}
