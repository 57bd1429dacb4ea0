//! Downward and upward probes: grounding, ground snap, slope follow, ceiling bump and contact
//! reclassification.

use crate::{
    config::LocomotionConfig,
    constants::{CONTACT_PROBE_DISTANCE, FLAT_SURFACE_UP},
    environment::{BodyKind, EnvironmentQuery},
    events::MotionEvents,
    utils::{Vec3, angle_from_up},
};

use super::{
    landing::try_land,
    slide::{classify_surface, is_walkable},
    state::{LocomotionState, MotionFlag},
};

/// Where the probes start: the collider center.
#[inline]
pub(crate) fn collider_center(state: &LocomotionState, feet: Vec3) -> Vec3 {
    feet + Vec3::y() * state.collider_height * 0.5
}

/// Sphere-cast down from the collider center and classify what is underneath.
///
/// Returns the queued grounded result. It is applied by the caller only after the ground snap
/// has had its chance to run, so one tick can both snap and report grounded.
pub(crate) fn probe_ground(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
) -> bool {
    let radius = config.capsule.radius;
    let center = collider_center(state, feet);
    let reach = state.collider_height * 0.51 - radius * 0.8;

    let Some(hit) = environment.cast_sphere(center, radius * 0.99, -Vec3::y(), reach) else {
        state.set(MotionFlag::Grounded, false);
        return false;
    };

    let queued = is_walkable(config, &hit.normal);
    if !queued {
        state.set(MotionFlag::Grounded, false);
    }

    classify_surface(config, state, hit.normal, state.velocity.y);
    queued
}

/// Pull a slowly falling character onto walkable ground it has sunk into.
///
/// The ray reaches from the collider center toward the feet and shrinks by the fall speed (up to
/// a meter), so a fast fall is never collapsed into one tick. Returns whether the character was
/// snapped.
pub(crate) fn snap_to_ground(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    events: &mut MotionEvents,
    feet: Vec3,
    dt: f32,
) -> bool {
    if state.grounded() || state.velocity.y >= 0.0 {
        return false;
    }

    let reach = state.collider_height * 0.5 + state.velocity.y.clamp(-1.0, 0.0);
    if reach <= 0.0 {
        return false;
    }
    let center = collider_center(state, feet);
    let Some(hit) = environment.cast_ray(center, -Vec3::y(), reach) else {
        return false;
    };
    if !is_walkable(config, &hit.normal) {
        return false;
    }

    if dt > 0.0 {
        state.velocity.y = (hit.point.y - feet.y) / dt;
    }
    if state.sliding() {
        log::debug!("slide ended by ground snap");
        state.set(MotionFlag::Sliding, false);
        state.sliding_normal = Vec3::zeros();
    }

    try_land(config, state, events);
    state.set(MotionFlag::Grounded, true);
    true
}

/// Keep a grounded character glued to a walkable slope it is walking down.
pub(crate) fn follow_slope(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
    has_planar_input: bool,
    dt: f32,
) {
    if !state.grounded() || state.sliding() || !has_planar_input || dt <= 0.0 {
        return;
    }

    let center = collider_center(state, feet);
    let Some(hit) = environment.cast_ray(center, -Vec3::y(), config.capsule.height * 0.66) else {
        return;
    };

    let downhill = hit.normal.dot(&state.velocity) > 0.0;
    let gentle = angle_from_up(&hit.normal) < config.slope.slope_angle;
    let vy = state.velocity.y;
    if downhill && gentle && vy > -2.0 && vy < 0.0 && hit.normal.y < FLAT_SURFACE_UP {
        state.velocity.y = (hit.point.y - feet.y) / dt;
    }
}

/// Stop upward motion when the head meets static or kinematic geometry.
pub(crate) fn bump_ceiling(
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
) {
    if state.velocity.y <= 0.0 {
        return;
    }

    let center = collider_center(state, feet);
    let reach = state.collider_height * 0.55;
    if let Some(hit) = environment.cast_ray(center, Vec3::y(), reach) {
        if !hit.body.is_dynamic() {
            state.velocity.y = 0.0;
        }
    }
}

/// Re-run the slope decision for a contact reported by the host.
///
/// Contacts with dynamic bodies are ignored; their motion makes the surface normal unreliable.
pub(crate) fn reclassify_contact(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
    body: BodyKind,
) {
    if body.is_dynamic() {
        return;
    }

    let center = collider_center(state, feet);
    let normal = environment
        .cast_ray(center, -Vec3::y(), CONTACT_PROBE_DISTANCE)
        .map(|hit| hit.normal)
        .unwrap_or_else(Vec3::zeros);

    classify_surface(config, state, normal, state.velocity.y);
}
