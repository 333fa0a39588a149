/*!
Default tunables for sensing and locomotion.

These constants centralize the parameters used by the ground sensor, step detector and
locomotion state machine. They are the defaults of [`crate::settings::ControllerSettings`];
override them from a settings file rather than editing them here.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Steepest walkable surface, measured from vertical.
pub const MAX_SLOPE_ANGLE_DEG: f32 = 45.0;

/// Upper bound for any configured angle. 90° would make every wall walkable.
pub const MAX_CONFIG_ANGLE_DEG: f32 = 89.0;

/// Surfaces at least this steep count as walls for step and slide classification.
pub const WALL_ANGLE_THRESHOLD_DEG: f32 = 70.0;

/// Radius of the downward ground probe.
pub const GROUND_SENSOR_RADIUS: f32 = 0.4;

/// Height of the ground probe's lowest point above the collider base when the cast starts.
/// Keeps the probe out of the floor the character is standing on.
pub const GROUND_PROBE_OFFSET: f32 = 0.05;

/// How far the ground probe is swept downward.
pub const GROUND_CAST_DISTANCE: f32 = 0.2;

/// Height above the collider base of the forward "ascending" ray.
pub const ASCEND_PROBE_HEIGHT: f32 = 0.1;

/// Reach of the ascending ray beyond the collider radius.
pub const ASCEND_PROBE_DISTANCE: f32 = 0.2;

/// Horizontal speed above which the ascending ray follows velocity instead of facing.
pub const ASCEND_VELOCITY_MIN: f32 = 0.1;

/// Height above the collider base of the forward step ray.
pub const FIRST_STEP_OFFSET: f32 = 0.1;

/// Reach of the forward step ray beyond the collider radius.
pub const STEP_RAY_OFFSET: f32 = 0.1;

/// Height above the forward step ray of the diagonal ledge ray.
pub const STEP_HEIGHT_OFFSET: f32 = 0.6;

/// Length of the diagonal ledge ray (plus `STEP_RAY_OFFSET`).
pub const STEP_CHECK_DISTANCE: f32 = 1.0;

/// Downward weight of the diagonal ledge ray direction (`down * k + forward`).
pub const STEP_CHECK_ANGLE: f32 = 1.5;

/// Forward offset of the diagonal ledge ray origin.
pub const DIAGONAL_FORWARD_OFFSET: f32 = 0.2;

/// Ledges lower than this are ignored (floor noise).
pub const MIN_STEP_HEIGHT: f32 = 0.01;

/// Highest ledge the character climbs automatically.
pub const MAX_STEP_HEIGHT: f32 = 0.5;

/// Forward nudge applied after a step-up so the body lands on the ledge.
pub const STEP_FORWARD_NUDGE: f32 = 0.02;

/// Body gravity stays suspended this long after a step-up.
pub const STEP_GRAVITY_GRACE: f32 = 0.2;

/// Reach of the lateral wall rays beyond the collider radius.
pub const LATERAL_PROBE_OFFSET: f32 = 0.1;

/// Ground acceleration gain (m/s² per m/s of missing speed).
pub const ACCELERATION: f32 = 9.0;

/// Airborne acceleration (m/s²).
pub const AIR_ACCELERATION: f32 = 3.0;

/// Default walking speed cap (m/s).
pub const BASE_SPEED: f32 = 7.0;

/// Speed cap while sprint is held (m/s).
pub const SPRINT_MAX_SPEED: f32 = 10.0;

/// Braking deceleration with no input (m/s²).
pub const BRAKING_FORCE: f32 = 10.0;

/// Below this horizontal speed, braking snaps horizontal velocity to zero.
pub const BRAKE_SPEED_THRESHOLD: f32 = 0.5;

/// Gain of the grounded turn correction.
pub const TURN_SHARPNESS: f32 = 10.0;

/// Gain of the airborne turn correction.
pub const AIR_TURN_SHARPNESS: f32 = 3.0;

/// Slerp rate of the facing rotation (1/s).
pub const ROTATION_SHARPNESS: f32 = 10.0;

/// Vertical velocity set by a jump (m/s).
pub const JUMP_FORCE: f32 = 8.0;

/// Upward acceleration peak while the jump is held (m/s²).
pub const JUMP_HOLD_FORCE: f32 = 20.0;

/// Window after a jump during which holding adds lift.
pub const JUMP_HOLD_DURATION: f32 = 0.25;

/// How long a jump press is remembered before landing.
pub const JUMP_BUFFER_TIME: f32 = 0.15;

/// How long after leaving the ground a jump is still granted.
pub const COYOTE_TIME: f32 = 0.15;

/// Double-jump impulse relative to `JUMP_FORCE`.
pub const DOUBLE_JUMP_MULTIPLIER: f32 = 0.5;

/// Airborne jumps allowed per airborne phase when double jump is enabled.
pub const EXTRA_JUMPS: u32 = 1;

/// Velocity change applied by a dash (m/s).
pub const DASH_FORCE: f32 = 10.0;

/// Travel after which a gravity-free dash restores gravity.
pub const DASH_DISTANCE: f32 = 5.0;

/// Airborne dashes allowed between landings.
pub const DASH_AMOUNT: u32 = 1;

/// Extra gravity applied while airborne (m/s²).
pub const CUSTOM_GRAVITY: f32 = 9.81;

/// Cap of the fall-speed gravity multiplier.
pub const MAX_GRAVITY_MULTIPLIER: f32 = 2.0;

/// Velocity along the ground normal below which it is cancelled while grounded (m/s).
pub const GROUND_STICK_THRESHOLD: f32 = 0.5;

/// Sprint counts as held after this long.
pub const SPRINT_HOLD_THRESHOLD: f32 = 0.2;

/// Squared move-vector length that counts as movement intent.
pub const MOVE_INPUT_DEADZONE_SQ: f32 = 0.01;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Slack on timer comparisons so windows are inclusive despite accumulated float error.
pub const TIME_EPS: f32 = 1.0e-4;

/// Friction of the default traction material.
pub const DEFAULT_FRICTION: f32 = 0.6;

/// Friction of the slide traction material.
pub const SLIDE_FRICTION: f32 = 0.0;
