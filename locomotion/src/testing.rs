//! Test-only world, body and frame driver.
//!
//! `TestWorld` answers casts exactly against half-spaces and boxes. `TestBody` is a capsule that
//! sweeps and slides through the same shapes. `Sim` runs the host's per-frame callback order.

use rapier3d::{
    math::{Isometry, Point, Real, Vector},
    na::Unit,
    parry::{
        query::{self, PointQuery, Ray, RayCast, ShapeCastOptions},
        shape::{Ball, Capsule, HalfSpace, Shape, SharedShape},
    },
};

use crate::{
    component::{CharacterComponent, Frame},
    config::{CapsuleSpec, LocomotionConfig},
    environment::{BodyKind, CharacterBody, EnvironmentQuery, QueryHit},
    input::InputIntent,
    motion::MotionResolver,
    rapier_world::{from_rapier, point_from_rapier, to_rapier},
    utils::{Quat, Vec3},
};

/// Gap kept between a swept capsule and what it hits (meters).
const SKIN: f32 = 0.002;
/// Slide iterations per body step.
const MAX_SLIDES: u32 = 4;
const MIN_MOVE_SQ: f32 = 1.0e-10;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Solid {
    shape: SharedShape,
    pose: Isometry<Real>,
    body: BodyKind,
}

pub(crate) struct TestWorld {
    solids: Vec<Solid>,
}

impl TestWorld {
    pub fn empty() -> Self {
        Self { solids: Vec::new() }
    }

    /// Ground plane `y = 0`, solid below.
    pub fn flat_ground() -> Self {
        Self::empty().with_plane(Vec3::y())
    }

    /// Plane through the origin tilted `degrees` about +Z; it descends toward +X.
    pub fn slope(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::empty().with_plane(Vec3::new(sin, cos, 0.0))
    }

    fn with_plane(mut self, normal: Vec3) -> Self {
        let normal = Unit::new_normalize(to_rapier(normal));
        self.solids.push(Solid {
            shape: SharedShape::new(HalfSpace::new(normal)),
            pose: Isometry::identity(),
            body: BodyKind::Static,
        });
        self
    }

    pub fn with_box(self, min: Vec3, max: Vec3) -> Self {
        self.with_solid_box(min, max, BodyKind::Static)
    }

    pub fn with_dynamic_box(self, min: Vec3, max: Vec3) -> Self {
        self.with_solid_box(min, max, BodyKind::Dynamic)
    }

    fn with_solid_box(mut self, min: Vec3, max: Vec3, body: BodyKind) -> Self {
        let half = (max - min) * 0.5;
        let center = (max + min) * 0.5;
        self.solids.push(Solid {
            shape: SharedShape::cuboid(half.x, half.y, half.z),
            pose: Isometry::translation(center.x, center.y, center.z),
            body,
        });
        self
    }

    /// Earliest hit of `shape` moved by `motion` from `pose`, as `(fraction, normal)`.
    ///
    /// The normal faces against the motion.
    fn sweep(&self, pose: &Isometry<Real>, shape: &dyn Shape, motion: Vec3) -> Option<(f32, Vec3)> {
        let mut options = ShapeCastOptions::with_max_time_of_impact(1.0);
        options.stop_at_penetration = true;
        let vel = to_rapier(motion);

        self.solids
            .iter()
            .filter_map(|solid| {
                let hit = query::cast_shapes(
                    pose,
                    &vel,
                    shape,
                    &solid.pose,
                    &Vector::zeros(),
                    &*solid.shape,
                    options,
                )
                .ok()
                .flatten()?;
                let mut n = from_rapier(&hit.normal1.into_inner());
                if n.dot(&motion) > 0.0 {
                    n = -n;
                }
                Some((hit.time_of_impact, n))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl EnvironmentQuery for TestWorld {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<QueryHit> {
        let dir = direction.try_normalize(f32::EPSILON)?;
        let ray = Ray::new(Point::from(to_rapier(origin)), to_rapier(dir));

        self.solids
            .iter()
            .filter_map(|solid| {
                let hit = solid
                    .shape
                    .cast_ray_and_get_normal(&solid.pose, &ray, max_distance, true)?;
                Some(QueryHit {
                    point: origin + dir * hit.time_of_impact,
                    normal: from_rapier(&hit.normal),
                    distance: hit.time_of_impact,
                    body: solid.body,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
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

        self.solids
            .iter()
            .filter_map(|solid| {
                let hit = query::cast_shapes(
                    &pose,
                    &to_rapier(dir),
                    &ball,
                    &solid.pose,
                    &Vector::zeros(),
                    &*solid.shape,
                    options,
                )
                .ok()
                .flatten()?;

                let center = origin + dir * hit.time_of_impact;
                let projection =
                    solid
                        .shape
                        .project_point(&solid.pose, &Point::from(to_rapier(center)), true);
                let point = point_from_rapier(&projection.point);
                Some(QueryHit {
                    point,
                    normal: (center - point).try_normalize(f32::EPSILON).unwrap_or(-dir),
                    distance: hit.time_of_impact,
                    body: solid.body,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Y-aligned capsule body moved by sweep-and-slide. `position` is the feet.
pub(crate) struct TestBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl TestBody {
    pub fn new(feet: Vec3, capsule: CapsuleSpec) -> Self {
        Self {
            position: feet,
            velocity: Vec3::zeros(),
            radius: capsule.radius,
            height: capsule.height,
        }
    }

    /// Move by `velocity * dt`, stopping short of contacts and sliding along them. Velocity
    /// pointing into a contact is removed.
    pub fn step(&mut self, dt: f32, world: &TestWorld) {
        let half_segment = (self.height * 0.5 - self.radius).max(0.0);
        let capsule = Capsule::new_y(half_segment, self.radius);
        let mut remaining = self.velocity * dt;

        for _ in 0..MAX_SLIDES {
            if remaining.norm_squared() <= MIN_MOVE_SQ {
                break;
            }

            let center = self.position + Vec3::y() * self.height * 0.5;
            let pose = Isometry::translation(center.x, center.y, center.z);
            let Some((fraction, normal)) = world.sweep(&pose, &capsule, remaining) else {
                self.position += remaining;
                break;
            };

            let len = remaining.norm();
            let dir = remaining / len;
            let travel = len * fraction;
            self.position += dir * (travel - SKIN).max(0.0);

            let leftover = dir * (len - travel);
            remaining = leftover - normal * leftover.dot(&normal);

            let into = self.velocity.dot(&normal);
            if into < 0.0 {
                self.velocity -= normal * into;
            }
        }
    }
}

impl CharacterBody for TestBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

/// One character in a test world, driven in the host's callback order.
pub(crate) struct Sim {
    pub world: TestWorld,
    pub body: TestBody,
    pub resolver: MotionResolver,
    pub facing: Quat,
}

impl Sim {
    pub fn new(config: LocomotionConfig, world: TestWorld, feet: Vec3) -> Self {
        let resolver = MotionResolver::new(config).expect("valid config");
        let body = TestBody::new(feet, resolver.config().capsule);
        Self {
            world,
            body,
            resolver,
            facing: Quat::identity(),
        }
    }

    /// One frame with one fixed tick of the same length.
    pub fn frame(&mut self, input: &InputIntent, dt: f32) {
        self.advance(input, dt, true);
    }

    /// One frame in which no fixed tick is due.
    pub fn frame_without_fixed(&mut self, input: &InputIntent, dt: f32) {
        self.advance(input, dt, false);
    }

    pub fn run(&mut self, input: &InputIntent, frames: usize) {
        for _ in 0..frames {
            self.frame(input, 1.0 / 60.0);
        }
    }

    fn advance(&mut self, input: &InputIntent, dt: f32, fixed: bool) {
        self.body.height = self.resolver.state().collider_height();

        let mut frame = Frame::new(dt, input, self.facing, &self.world).with_body(&mut self.body);
        self.resolver.early_update(&mut frame);
        self.resolver.update(&mut frame);
        if fixed {
            self.resolver.fixed_update(&mut frame);
        }

        if fixed {
            self.body.step(dt, &self.world);
        }

        let mut frame = Frame::new(dt, input, self.facing, &self.world).with_body(&mut self.body);
        self.resolver.late_update(&mut frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_and_sphere_agree_on_flat_ground() {
        let world = TestWorld::flat_ground();
        let ray = world
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), -Vec3::y(), 5.0)
            .expect("ground");
        let sphere = world
            .cast_sphere(Vec3::new(0.0, 1.0, 0.0), 0.25, -Vec3::y(), 5.0)
            .expect("ground");

        assert!((ray.distance - 1.0).abs() < 1.0e-4);
        assert!((sphere.distance - 0.75).abs() < 1.0e-3);
        assert!(sphere.point.y.abs() < 1.0e-3);
        assert!(sphere.normal.y > 0.999);
    }

    #[test]
    fn body_comes_to_rest_on_the_ground() {
        let world = TestWorld::flat_ground();
        let mut body = TestBody::new(Vec3::new(0.0, 0.5, 0.0), CapsuleSpec::default());
        body.velocity = Vec3::new(1.0, -10.0, 0.0);

        for _ in 0..10 {
            body.step(1.0 / 60.0, &world);
        }

        assert!(body.position.y >= 0.0 && body.position.y < 0.01);
        assert!(body.velocity.y.abs() < 1.0e-4);
        assert!(body.position.x > 0.1);
    }
}
