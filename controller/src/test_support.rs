//! Scripted test doubles for the scene and the body.

use crate::{
    body::{CharacterBody, ForceMode},
    ids::ColliderId,
    material::TractionMaterial,
    query::{HitBuffer, ProbeShape, SceneQuery},
    types::{ColliderDescriptor, Hit, Quat, Vec3},
};

pub const SELF_ID: ColliderId = 1;
pub const GROUND_ID: ColliderId = 100;
pub const WALL_ID: ColliderId = 200;

pub fn hit(collider: ColliderId, distance: f32, normal: Vec3) -> Hit {
    Hit {
        collider,
        point: Vec3::zeros(),
        normal: normal.normalize(),
        distance,
    }
}

pub fn hit_at(collider: ColliderId, distance: f32, normal: Vec3, point: Vec3) -> Hit {
    Hit {
        point,
        ..hit(collider, distance, normal)
    }
}

type RayRule = Box<dyn Fn(Vec3, Vec3) -> bool>;

/// A scene that answers casts from scripted hit lists, in the order given.
///
/// Ray rules are matched against `(origin, direction)`; every matching rule contributes
/// its hits.
#[derive(Default)]
pub struct FakeScene {
    shapes: Vec<Hit>,
    rays: Vec<(RayRule, Vec<Hit>)>,
}

impl FakeScene {
    pub fn with_shapes(mut self, hits: Vec<Hit>) -> Self {
        self.shapes = hits;
        self
    }

    pub fn with_rays(self, hits: Vec<Hit>) -> Self {
        self.with_ray_rule(|_, _| true, hits)
    }

    pub fn with_ray_rule(
        mut self,
        rule: impl Fn(Vec3, Vec3) -> bool + 'static,
        hits: Vec<Hit>,
    ) -> Self {
        self.rays.push((Box::new(rule), hits));
        self
    }

    /// Flat ground under the character's feet.
    pub fn flat_ground() -> Self {
        Self::default().with_shapes(vec![hit(GROUND_ID, 0.05, Vec3::y())])
    }
}

impl SceneQuery for FakeScene {
    fn cast_shape_all<const N: usize>(
        &self,
        _origin: Vec3,
        _shape: ProbeShape,
        _direction: Vec3,
        _max_distance: f32,
        hits: &mut HitBuffer<N>,
    ) {
        for h in &self.shapes {
            hits.push(*h);
        }
    }

    fn cast_ray_all<const N: usize>(
        &self,
        origin: Vec3,
        direction: Vec3,
        _max_distance: f32,
        hits: &mut HitBuffer<N>,
    ) {
        for (rule, list) in &self.rays {
            if rule(origin, direction) {
                for h in list {
                    hits.push(*h);
                }
            }
        }
    }
}

/// A body that records every command and integrates with explicit Euler.
pub struct FakeBody {
    pub descriptor: Option<(f32, f32)>,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub gravity_enabled: bool,
    pub pending_acceleration: Vec3,
    pub forces: Vec<(Vec3, ForceMode)>,
    pub materials: Vec<TractionMaterial>,
    pub moves: Vec<Vec3>,
}

impl Default for FakeBody {
    fn default() -> Self {
        Self {
            descriptor: Some((0.5, 0.5)),
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            gravity_enabled: true,
            pending_acceleration: Vec3::zeros(),
            forces: Vec::new(),
            materials: Vec::new(),
            moves: Vec::new(),
        }
    }
}

impl FakeBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn moving(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn unbound() -> Self {
        Self {
            descriptor: None,
            ..Self::default()
        }
    }

    /// Apply pending accelerations over `dt` and advance the position.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.pending_acceleration * dt;
        self.pending_acceleration = Vec3::zeros();
        self.position += self.velocity * dt;
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).norm()
    }
}

impl CharacterBody for FakeBody {
    fn collider(&self) -> Option<ColliderDescriptor> {
        self.descriptor
            .map(|(radius, half_height)| ColliderDescriptor::capsule(self.position, radius, half_height))
    }

    fn collider_id(&self) -> Option<ColliderId> {
        self.descriptor.map(|_| SELF_ID)
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        self.forces.push((force, mode));
        match mode {
            ForceMode::Acceleration => self.pending_acceleration += force,
            ForceMode::VelocityChange => self.velocity += force,
        }
    }

    fn move_position(&mut self, position: Vec3) {
        self.moves.push(position);
        self.position = position;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    fn set_material(&mut self, material: TractionMaterial) {
        self.materials.push(material);
    }
}
