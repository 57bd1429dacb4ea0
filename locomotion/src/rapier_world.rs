//! Rapier-backed environment and body adapters.
//!
//! [`RapierQueryWorld`] builds an in-memory Rapier scene from a set of collider definitions and
//! answers the resolver's casts through a borrowed `QueryPipeline`.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics are stepped here; the host owns the simulation.

// Re-export Rapier so hosts can build bodies and filters without naming the dependency.
pub use rapier3d;

use std::collections::HashMap;

use rapier3d::{
    na::{Translation3, UnitQuaternion},
    parry::{
        query::{PointQuery, Ray, ShapeCastOptions},
        shape::{Ball, HalfSpace, SharedShape},
    },
    prelude::*,
};

use crate::{
    environment::{BodyKind, CharacterBody, EnvironmentQuery, QueryHit},
    utils::Vec3,
};

#[inline]
pub(crate) fn to_rapier(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn from_rapier(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn point_from_rapier(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Canonical, schema-agnostic definition of one world body and its collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - Planes use the pose-derived normal `rotation * +Y`, shifted by `offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldBodyDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    pub translation: Vector<Real>,
    pub rotation: UnitQuaternion<Real>,
    pub shape: ColliderShapeDef,
    pub kind: BodyKind,
}

impl WorldBodyDef {
    /// A fixed body at `translation` with no rotation.
    pub fn fixed(id: u32, translation: Vector<Real>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            kind: BodyKind::Static,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<Real>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Supported collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), offset along its normal.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<Real> },

    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },
}

/// Build a Rapier collider from a [`WorldBodyDef`].
///
/// The pose lives on the parent rigid body, so the collider keeps an identity local transform
/// (planes excepted, which shift along their local normal).
fn collider_from_def(def: &WorldBodyDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
            .translation(Vector::y() * *offset_along_normal)
            .build(),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),
    }
}

fn body_builder(kind: BodyKind) -> RigidBodyBuilder {
    match kind {
        BodyKind::Static => RigidBodyBuilder::fixed(),
        BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
    }
}

/// In-memory Rapier structures needed for scene queries.
///
/// This stores:
/// - `RigidBodySet`/`ColliderSet` containing the world bodies.
/// - `NarrowPhase` and `BroadPhaseBvh` used to create a borrowed `QueryPipeline`.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    handles: HashMap<u32, RigidBodyHandle>,
    collision_pipeline: CollisionPipeline,
}

impl RapierQueryWorld {
    /// Build a query world from a list of body definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Any NaN/invalid values should be filtered/validated by the caller.
    pub fn build(mut defs: Vec<WorldBodyDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut handles = HashMap::with_capacity(defs.len());

        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = body_builder(def.kind).pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(&def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);

            if handles.insert(def.id, rb_handle).is_some() {
                log::warn!("duplicate world body id {}; the later one wins lookups", def.id);
            }
        }

        let mut world = Self {
            bodies,
            colliders,
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            handles,
            collision_pipeline: CollisionPipeline::new(),
        };
        world.refresh();

        log::info!(
            "rapier query world built ({} bodies, {} colliders)",
            world.bodies.len(),
            world.colliders.len()
        );
        world
    }

    /// Insert an extra body after construction (e.g. a character), returning its handle.
    ///
    /// Call [`Self::refresh`] before querying.
    pub fn insert_body(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn handle(&self, id: u32) -> Option<RigidBodyHandle> {
        self.handles.get(&id).copied()
    }

    /// Move the body registered under `id`. Returns `false` for unknown ids.
    pub fn set_translation(&mut self, id: u32, translation: Vector<Real>) -> bool {
        let Some(body) = self.handle(id).and_then(|h| self.bodies.get_mut(h)) else {
            log::error!("set_translation: unknown world body id {}", id);
            return false;
        };
        body.set_translation(translation, true);
        true
    }

    /// Sync collider poses and the broad phase after bodies moved.
    pub fn refresh(&mut self) {
        // Collision detection only: no forces are integrated.
        self.collision_pipeline.step(
            0.0,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &(),
            &(),
        );
    }

    /// Create a borrowed `QueryPipeline` view suitable for scene queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Motion class of the body that owns `collider`.
    pub fn body_kind(&self, collider: ColliderHandle) -> BodyKind {
        let parent = self.colliders.get(collider).and_then(|c| c.parent());
        match parent.and_then(|h| self.bodies.get(h)) {
            Some(body) if body.is_dynamic() => BodyKind::Dynamic,
            Some(body) if body.is_kinematic() => BodyKind::Kinematic,
            _ => BodyKind::Static,
        }
    }
}

/// [`EnvironmentQuery`] over a [`RapierQueryWorld`], optionally ignoring the character's body.
pub struct RapierEnvironment<'a> {
    world: &'a RapierQueryWorld,
    exclude: Option<RigidBodyHandle>,
}

impl<'a> RapierEnvironment<'a> {
    pub fn new(world: &'a RapierQueryWorld) -> Self {
        Self {
            world,
            exclude: None,
        }
    }

    /// Skip every collider attached to `body`.
    pub fn excluding(mut self, body: RigidBodyHandle) -> Self {
        self.exclude = Some(body);
        self
    }

    fn pipeline(&self) -> QueryPipeline<'a> {
        let filter = match self.exclude {
            Some(body) => QueryFilter::default().exclude_rigid_body(body),
            None => QueryFilter::default(),
        };
        self.world.query_pipeline(filter)
    }
}

impl EnvironmentQuery for RapierEnvironment<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<QueryHit> {
        let dir = direction.try_normalize(f32::EPSILON)?;
        let ray = Ray::new(Point::from(to_rapier(origin)), to_rapier(dir));

        let (collider, hit) = self
            .pipeline()
            .cast_ray_and_get_normal(&ray, max_distance, true)?;

        Some(QueryHit {
            point: origin + dir * hit.time_of_impact,
            normal: from_rapier(&hit.normal),
            distance: hit.time_of_impact,
            body: self.world.body_kind(collider),
        })
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<QueryHit> {
        let dir = direction.try_normalize(f32::EPSILON)?;
        let ball = Ball::new(radius);
        let pose = Isometry::translation(origin.x, origin.y, origin.z);

        let mut options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        options.stop_at_penetration = true;

        let (collider, hit) = self
            .pipeline()
            .cast_shape(&pose, &to_rapier(dir), &ball, options)?;

        // Contact geometry: project the sphere center at impact onto the hit collider.
        let center = origin + dir * hit.time_of_impact;
        let (point, normal) = match self.world.colliders.get(collider) {
            Some(c) => {
                let projection =
                    c.shape()
                        .project_point(c.position(), &Point::from(to_rapier(center)), true);
                let point = point_from_rapier(&projection.point);
                let normal = (center - point).try_normalize(f32::EPSILON).unwrap_or(-dir);
                (point, normal)
            }
            None => (center + dir * radius, -dir),
        };

        Some(QueryHit {
            point,
            normal,
            distance: hit.time_of_impact,
            body: self.world.body_kind(collider),
        })
    }
}

/// [`CharacterBody`] over a Rapier rigid body whose origin is the capsule center.
pub struct RapierBody<'a> {
    body: &'a mut RigidBody,
    /// Distance from the body origin down to the feet.
    feet_offset: f32,
}

impl<'a> RapierBody<'a> {
    pub fn new(body: &'a mut RigidBody, feet_offset: f32) -> Self {
        Self { body, feet_offset }
    }
}

impl CharacterBody for RapierBody<'_> {
    fn position(&self) -> Vec3 {
        from_rapier(self.body.translation()) - Vec3::y() * self.feet_offset
    }

    fn velocity(&self) -> Vec3 {
        from_rapier(self.body.linvel())
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.body.set_linvel(to_rapier(velocity), true);
    }
}
