//! Seams between the motion resolver and the host's physics.
//!
//! The resolver never owns geometry or the rigid body. It asks an [`EnvironmentQuery`] for
//! single-shot casts and reads/writes a [`CharacterBody`] borrowed for the tick.

use crate::utils::Vec3;

/// Motion class of the body a hit collider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// Fixed geometry, or a collider without a parent body.
    #[default]
    Static,
    /// Moved by script; behaves like ground.
    Kinematic,
    /// Simulated; contacts with it are unreliable for slope decisions.
    Dynamic,
}

impl BodyKind {
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

/// Result of a successful cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryHit {
    /// Contact point on the hit surface (world space).
    pub point: Vec3,
    /// Unit surface normal at `point`, facing the caster.
    pub normal: Vec3,
    /// Distance travelled along the cast direction before contact.
    pub distance: f32,
    pub body: BodyKind,
}

/// Synchronous ray and sphere casts against world geometry, excluding the character itself.
///
/// `direction` need not be normalized; implementations normalize it and return `None` for a
/// zero direction.
pub trait EnvironmentQuery {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<QueryHit>;

    /// Sweep a sphere of `radius` from `origin`.
    ///
    /// Geometry already overlapping the sphere at `origin` is reported at distance `0`.
    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<QueryHit>;
}

/// The character's rigid body. `position` is the feet (bottom of the capsule).
///
/// The resolver only ever writes velocity; the host's physics owns the position.
pub trait CharacterBody {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
}

/// An environment with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnvironment;

impl EnvironmentQuery for EmptyEnvironment {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<QueryHit> {
        None
    }

    fn cast_sphere(
        &self,
        _origin: Vec3,
        _radius: f32,
        _direction: Vec3,
        _max_distance: f32,
    ) -> Option<QueryHit> {
        None
    }
}
