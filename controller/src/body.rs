//! The character's rigid body as seen by the core.
//!
//! The body is owned by the physics collaborator and injected into every tick; the core
//! never subclasses or stores it. All writes go through this trait.

use crate::{
    ids::ColliderId,
    material::TractionMaterial,
    types::{ColliderDescriptor, Quat, Vec3},
};

/// How a force passed to [`CharacterBody::add_force`] is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Mass-independent acceleration (m/s²), integrated over the next physics step.
    Acceleration,
    /// Instantaneous, mass-independent change of velocity (m/s).
    VelocityChange,
}

pub trait CharacterBody {
    /// Collider snapshot, or `None` while the collider is not bound yet.
    fn collider(&self) -> Option<ColliderDescriptor>;

    /// Identifier of the character's own collider, used to filter self hits.
    fn collider_id(&self) -> Option<ColliderId>;

    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    fn add_force(&mut self, force: Vec3, mode: ForceMode);

    /// Teleport the body. Not a force: no velocity is produced.
    fn move_position(&mut self, position: Vec3);

    fn gravity_enabled(&self) -> bool;
    fn set_gravity_enabled(&mut self, enabled: bool);

    /// Swap the friction material of the character's collider.
    fn set_material(&mut self, material: TractionMaterial);
}
