//! Scripted levels and input timelines.

use clap::ValueEnum;
use controller::{InputButton, Quat, RawInput, Vec2, Vec3, WorldStaticDef};

/// Spawn height of the capsule center. The default capsule is 2 m tall, so it starts
/// slightly above the floor and settles during the idle lead-in.
pub const SPAWN_HEIGHT: f32 = 1.05;

const STAIR_COUNT: u32 = 5;
const STAIR_RISE: f32 = 0.3;
const STAIR_RUN: f32 = 0.6;
const SLOPE_ANGLE_DEG: f32 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Open floor: run, jump, dash, brake.
    Flat,
    /// A flight of climbable steps straight ahead.
    Stairs,
    /// A walkable ramp rising ahead.
    Slope,
    /// A wall approached at an angle, to slide along it.
    Wall,
}

impl Scenario {
    /// Static level geometry. Id 0 is always the floor at y = 0.
    pub fn statics(self) -> Vec<WorldStaticDef> {
        let mut defs = vec![WorldStaticDef::ground(0, 0.0)];
        match self {
            Scenario::Flat => {}
            Scenario::Stairs => {
                for i in 0..STAIR_COUNT {
                    let top = STAIR_RISE * (i + 1) as f32;
                    let z = -3.0 - STAIR_RUN * (i as f32 + 0.5);
                    defs.push(WorldStaticDef::cuboid(
                        i + 1,
                        Vec3::new(0.0, top * 0.5, z),
                        Vec3::new(2.0, top * 0.5, STAIR_RUN * 0.5),
                    ));
                }
            }
            Scenario::Slope => {
                let angle = SLOPE_ANGLE_DEG.to_radians();
                let half = Vec3::new(3.0, 0.25, 6.0);
                // Put the low edge of the ramp's top face on the floor at z = -1.
                let (sin, cos) = angle.sin_cos();
                let center = Vec3::new(
                    0.0,
                    half.z * sin - half.y * cos,
                    -1.0 - (half.y * sin + half.z * cos),
                );
                let rotation = Quat::from_axis_angle(&Vec3::x_axis(), angle);
                defs.push(WorldStaticDef::rotated_cuboid(1, center, rotation, half));
            }
            Scenario::Wall => {
                defs.push(WorldStaticDef::cuboid(
                    1,
                    Vec3::new(0.0, 1.5, -4.0),
                    Vec3::new(6.0, 1.5, 0.25),
                ));
            }
        }
        defs
    }

    /// Raw device state at `t` seconds into the run.
    pub fn input_at(self, t: f32) -> RawInput {
        let within = |from: f32, to: f32| (from..to).contains(&t);

        let move_vector = match self {
            _ if !within(0.5, 4.5) => Vec2::zeros(),
            Scenario::Wall => Vec2::new(0.5, 1.0),
            _ => Vec2::new(0.0, 1.0),
        };
        let mut raw = RawInput::new(move_vector);
        if within(0.2, 0.25) {
            raw = raw.with(InputButton::CursorLock);
        }
        if within(1.5, 1.8) || within(2.0, 2.2) {
            raw = raw.with(InputButton::Jump);
        }
        if within(3.0, 3.1) {
            raw = raw.with(InputButton::Sprint);
        }
        raw
    }
}
