pub mod bitmask_flags;
pub mod body;
pub mod camera;
pub mod constants;
pub mod contacts;
pub mod error;
pub mod ground;
pub mod ids;
pub mod input;
pub mod locomotion;
pub mod material;
pub mod query;
pub mod rapier_world;
pub mod schedule;
pub mod settings;
pub mod step;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use bitmask_flags::{BitmaskFlags, FlagBitmask};
pub use body::{CharacterBody, ForceMode};
pub use camera::CameraBasis;
pub use contacts::WallContactTracker;
pub use error::SettingsError;
pub use ground::{evaluate_ground, is_ground_admissible, is_wall};
pub use ids::{ColliderId, pack_collider_id, unpack_collider_id};
pub use input::{EdgeDetector, InputButton, InputLatch, InputSnapshot, RawInput};
pub use locomotion::{JumpKind, LocomotionController, TickReport};
pub use material::{MaterialSelector, TractionMaterial, TractionProfile};
pub use query::{HitBuffer, ProbeShape, SceneQuery, ShapeCastOracle};
pub use rapier_world::{
    CharacterRig, ColliderScene, ColliderShapeDef, PhysicsWorld, RapierBody, WorldStaticDef,
};
pub use schedule::{DeferredAction, Scheduler};
pub use settings::ControllerSettings;
pub use step::{apply_step_up, probe_obstructions};
pub use types::{
    CapsuleSpec, ColliderDescriptor, GroundContact, Hit, ObstructionReport, Quat, Vec2, Vec3,
};
