//! Rapier-backed physics collaborator.
//!
//! [`PhysicsWorld`] owns the Rapier sets and pipeline for a static level plus dynamic
//! capsule characters. For each tick it lends out a [`RapierBody`] (the character's
//! rigid body) and a [`ColliderScene`] (scene queries over every collider) at the same
//! time, so the controller can read and write the body while casting against the world.
//!
//! Design goals
//! - Deterministic: static colliders are inserted in `id` order.
//! - Forces requested with [`ForceMode::Acceleration`] are integrated over the next step;
//!   velocity changes apply immediately.
//! - Material swaps are deferred to [`PhysicsWorld::step`], because the scene borrows the
//!   collider set for the whole tick.

pub use rapier3d;

use rapier3d::{
    na::{Isometry3, Translation3, UnitQuaternion},
    parry::{
        query::{self, ShapeCastOptions, ShapeCastStatus},
        shape::{Ball, Cuboid, Shape},
    },
    prelude::*,
};

use crate::{
    body::{CharacterBody, ForceMode},
    ids::{ColliderId, pack_collider_id},
    material::TractionMaterial,
    query::{HitBuffer, ProbeShape, SceneQuery},
    settings::MaterialSettings,
    types::{CapsuleSpec, ColliderDescriptor, Hit, Quat, Vec3},
};

/// World gravity magnitude applied by the solver (m/s²).
pub const WORLD_GRAVITY: f32 = 9.81;

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is `rotation * +Y` and `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used for deterministic insertion order.
    pub id: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) offset along its normal.
    Plane { offset_along_normal: f32 },
    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: Vec3 },
}

impl WorldStaticDef {
    /// Horizontal ground plane at height `y`.
    pub fn ground(id: u32, y: f32) -> Self {
        Self {
            id,
            translation: Vec3::new(0.0, y, 0.0),
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        }
    }

    /// Axis-aligned box centered at `center`.
    pub fn cuboid(id: u32, center: Vec3, half_extents: Vec3) -> Self {
        Self {
            id,
            translation: center,
            rotation: Quat::identity(),
            shape: ColliderShapeDef::Cuboid { half_extents },
        }
    }

    /// Box centered at `center`, rotated by `rotation`.
    pub fn rotated_cuboid(id: u32, center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        Self {
            rotation,
            ..Self::cuboid(id, center, half_extents)
        }
    }
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid body, so the collider has an identity local transform
/// (except planes, which are offset along their normal).
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The parent pose carries the rotation, so the half-space is +Y in local space
            // and the world normal is `rotation * +Y`.
            ColliderBuilder::halfspace(Vector::y_axis())
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
    }
}

/// Handles and per-tick state of one character inside a [`PhysicsWorld`].
#[derive(Clone, Debug)]
pub struct CharacterRig {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    capsule: CapsuleSpec,
    materials: MaterialSettings,
    pending_acceleration: Vec3,
    pending_material: Option<TractionMaterial>,
}

impl CharacterRig {
    pub fn collider_id(&self) -> ColliderId {
        let (index, generation) = self.collider.into_raw_parts();
        pack_collider_id(index, generation)
    }
}

/// The character's rigid body, lent out for one tick.
pub struct RapierBody<'a> {
    rb: &'a mut RigidBody,
    rig: &'a mut CharacterRig,
}

impl CharacterBody for RapierBody<'_> {
    fn collider(&self) -> Option<ColliderDescriptor> {
        Some(ColliderDescriptor::capsule(
            *self.rb.translation(),
            self.rig.capsule.radius,
            self.rig.capsule.half_height,
        ))
    }

    fn collider_id(&self) -> Option<ColliderId> {
        Some(self.rig.collider_id())
    }

    fn position(&self) -> Vec3 {
        *self.rb.translation()
    }

    fn rotation(&self) -> Quat {
        *self.rb.rotation()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rb.set_rotation(rotation, true);
    }

    fn velocity(&self) -> Vec3 {
        *self.rb.linvel()
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.rb.set_linvel(velocity, true);
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Acceleration => self.rig.pending_acceleration += force,
            ForceMode::VelocityChange => {
                let v = *self.rb.linvel();
                self.rb.set_linvel(v + force, true);
            }
        }
    }

    fn move_position(&mut self, position: Vec3) {
        self.rb.set_translation(position, true);
    }

    fn gravity_enabled(&self) -> bool {
        self.rb.gravity_scale() != 0.0
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.rb
            .set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
    }

    fn set_material(&mut self, material: TractionMaterial) {
        self.rig.pending_material = Some(material);
    }
}

/// Scene queries over every collider of a [`PhysicsWorld`].
///
/// Each collider is tested individually so that all hits are reported, not just the
/// closest one. Hits are kept closest-first.
pub struct ColliderScene<'a> {
    colliders: &'a ColliderSet,
}

impl ColliderScene<'_> {
    fn id(handle: ColliderHandle) -> ColliderId {
        let (index, generation) = handle.into_raw_parts();
        pack_collider_id(index, generation)
    }
}

impl SceneQuery for ColliderScene<'_> {
    fn cast_shape_all<const N: usize>(
        &self,
        origin: Vec3,
        shape: ProbeShape,
        direction: Vec3,
        max_distance: f32,
        hits: &mut HitBuffer<N>,
    ) {
        let ball;
        let cuboid;
        let probe: &dyn Shape = match shape {
            ProbeShape::Sphere { radius } => {
                ball = Ball::new(radius);
                &ball
            }
            ProbeShape::Box { half_extents } => {
                cuboid = Cuboid::new(half_extents);
                &cuboid
            }
        };
        let probe_pos = Isometry3::from_parts(Translation3::from(origin), UnitQuaternion::identity());
        let mut options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        options.stop_at_penetration = true;

        for (handle, collider) in self.colliders.iter() {
            let Ok(Some(hit)) = query::cast_shapes(
                &probe_pos,
                &direction,
                probe,
                collider.position(),
                &Vector::zeros(),
                collider.shape(),
                options,
            ) else {
                continue;
            };
            // Already overlapping at the start: no usable surface for this collider.
            if hit.status == ShapeCastStatus::PenetratingOrWithinTargetDist {
                continue;
            }
            let normal = collider.position().rotation * hit.normal2.into_inner();
            hits.insert_by_distance(Hit {
                collider: Self::id(handle),
                point: origin + direction * hit.time_of_impact + hit.witness1.coords,
                normal,
                distance: hit.time_of_impact,
            });
        }
        log::trace!("shape cast from {origin:?}: {} hit(s)", hits.len());
    }

    fn cast_ray_all<const N: usize>(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        hits: &mut HitBuffer<N>,
    ) {
        let ray = Ray::new(Point::from(origin), direction);
        for (handle, collider) in self.colliders.iter() {
            let Some(hit) =
                collider
                    .shape()
                    .cast_ray_and_get_normal(collider.position(), &ray, max_distance, true)
            else {
                continue;
            };
            hits.insert_by_distance(Hit {
                collider: Self::id(handle),
                point: ray.point_at(hit.time_of_impact).coords,
                normal: hit.normal,
                distance: hit.time_of_impact,
            });
        }
    }
}

/// Rapier world with static level geometry and dynamic characters.
pub struct PhysicsWorld {
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub islands: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Build a world from static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - NaN/invalid values should be filtered by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);
            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }
        log::debug!("physics world built with {} static collider(s)", defs.len());

        Self {
            gravity: Vector::new(0.0, -WORLD_GRAVITY, 0.0),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Insert a dynamic, rotation-locked capsule character centered at `position`.
    pub fn spawn_character(
        &mut self,
        position: Vec3,
        capsule: CapsuleSpec,
        materials: MaterialSettings,
    ) -> CharacterRig {
        let rb = RigidBodyBuilder::dynamic()
            .translation(position)
            .lock_rotations()
            .can_sleep(false)
            .ccd_enabled(true)
            .build();
        let body = self.bodies.insert(rb);
        let collider = ColliderBuilder::capsule_y(capsule.half_height, capsule.radius)
            .friction(materials.default.friction)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        log::debug!("character spawned at {position:?}");

        CharacterRig {
            body,
            collider,
            capsule,
            materials,
            pending_acceleration: Vec3::zeros(),
            pending_material: None,
        }
    }

    /// Lend out the character's body and a scene over every collider.
    ///
    /// Returns `None` if the rig no longer belongs to this world.
    pub fn character<'a>(
        &'a mut self,
        rig: &'a mut CharacterRig,
    ) -> Option<(RapierBody<'a>, ColliderScene<'a>)> {
        let rb = self.bodies.get_mut(rig.body)?;
        Some((
            RapierBody { rb, rig },
            ColliderScene {
                colliders: &self.colliders,
            },
        ))
    }

    pub fn position(&self, rig: &CharacterRig) -> Option<Vec3> {
        self.bodies.get(rig.body).map(|rb| *rb.translation())
    }

    pub fn velocity(&self, rig: &CharacterRig) -> Option<Vec3> {
        self.bodies.get(rig.body).map(|rb| *rb.linvel())
    }

    pub fn friction(&self, rig: &CharacterRig) -> Option<f32> {
        self.colliders.get(rig.collider).map(|c| c.friction())
    }

    /// Advance the simulation by `dt`, applying the rig's pending commands first.
    pub fn step(&mut self, rig: &mut CharacterRig, dt: f32) {
        if let Some(rb) = self.bodies.get_mut(rig.body) {
            let v = *rb.linvel();
            rb.set_linvel(v + rig.pending_acceleration * dt, true);
        }
        rig.pending_acceleration = Vec3::zeros();

        if let Some(material) = rig.pending_material.take()
            && let Some(collider) = self.colliders.get_mut(rig.collider)
        {
            collider.set_friction(rig.materials.profile(material).friction);
        }

        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Surface normals (pointing toward the character) of every active contact.
    pub fn contact_normals(&self, rig: &CharacterRig) -> Vec<Vec3> {
        let mut normals = Vec::new();
        for pair in self.narrow_phase.contact_pairs_with(rig.collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            // Manifold normals point from collider1 to collider2.
            let sign = if pair.collider1 == rig.collider { -1.0 } else { 1.0 };
            for manifold in &pair.manifolds {
                if manifold.points.is_empty() {
                    continue;
                }
                normals.push(manifold.data.normal * sign);
            }
        }
        normals
    }
}
