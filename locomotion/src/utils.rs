use nalgebra as na;

use crate::constants::{BLEND_SNAP_DISTANCE, EPSILON, REFERENCE_RATE_HZ};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World up axis.
#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

/// Time-normalized blend factor for a per-reference-tick smoothing `rate`.
///
/// `1 - (1 - rate)^(dt * 60)`: applying this factor once over `dt` is equivalent to applying
/// `rate` once per 60 Hz tick for the same span of time.
#[inline]
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    let exponent = (dt * REFERENCE_RATE_HZ).max(0.0);
    1.0 - (1.0 - rate).powf(exponent)
}

/// Exponentially ease `current` toward `target`, snapping once within
/// [`BLEND_SNAP_DISTANCE`].
#[inline]
pub fn blend_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    if (current - target).norm() > BLEND_SNAP_DISTANCE {
        current + (target - current) * blend_factor(rate, dt)
    } else {
        target
    }
}

/// Scalar counterpart of [`blend_vec3`].
#[inline]
pub fn blend_f32(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if (current - target).abs() > BLEND_SNAP_DISTANCE {
        current + (target - current) * blend_factor(rate, dt)
    } else {
        target
    }
}

/// Fast-start, slow-finish easing used by the crouch height curve.
///
/// `log10((clamp01(t) + 0.1) * 10) * 0.96` for `t < 1`, exactly `1` otherwise.
#[inline]
pub fn smooth_up(t: f32) -> f32 {
    if t < 1.0 {
        ((t.clamp(0.0, 1.0) + 0.1) * 10.0).log10() * 0.96
    } else {
        1.0
    }
}

/// Angle in degrees between world-up and `normal`.
///
/// A degenerate (zero) normal is reported as a vertical wall.
#[inline]
pub fn angle_from_up(normal: &Vec3) -> f32 {
    if normal.norm_squared() <= EPSILON * EPSILON {
        return 90.0;
    }
    up().angle(normal).to_degrees()
}

/// Drop the vertical component.
#[inline]
pub fn planar(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Planar (XZ) length.
#[inline]
pub fn planar_len(v: &Vec3) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Planar direction, or zero when the planar part is negligible.
#[inline]
pub fn planar_dir(v: &Vec3) -> Vec3 {
    planar(v).try_normalize(EPSILON).unwrap_or_else(Vec3::zeros)
}

/// Yaw-only rotation (about +Y) whose local +Z faces `delta`.
///
/// Returns `None` if the planar part of `delta` is too small.
#[inline]
pub fn yaw_facing(delta: &Vec3) -> Option<Quat> {
    if planar_len(delta) <= EPSILON {
        return None;
    }
    let yaw = delta.x.atan2(delta.z);
    Some(Quat::from_axis_angle(&Vec3::y_axis(), yaw))
}

/// Yaw-only part of an arbitrary orientation.
#[inline]
pub fn yaw_only(orientation: &Quat) -> Quat {
    let forward = orientation * Vec3::z();
    yaw_facing(&forward).unwrap_or_else(Quat::identity)
}

/// Time-normalized slerp between two orientations.
#[inline]
pub fn ease_rotation(current: &Quat, target: &Quat, rate: f32, dt: f32) -> Quat {
    let t = blend_factor(rate, dt);
    current.try_slerp(target, t, EPSILON).unwrap_or(*target)
}
