//! Horizontal velocity integration and gravity.

use crate::{
    config::{Integrator, LocomotionConfig},
    constants::{EPSILON, INPUT_ACCELERATION_THRESHOLD},
    input::InputIntent,
    utils::{Quat, Vec3, blend_vec3, planar, planar_dir, planar_len},
};

use super::state::LocomotionState;

/// Planar velocity the input asks for, rotated into the facing frame.
#[inline]
fn target_velocity(input: &InputIntent, orientation: &Quat, top_speed: f32) -> Vec3 {
    if input.locked {
        return Vec3::zeros();
    }
    planar(&(orientation * Vec3::new(input.move_input.x * top_speed, 0.0, input.move_input.z * top_speed)))
}

/// Advance the horizontal part of the velocity with the configured integrator.
pub(crate) fn integrate_horizontal(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    input: &InputIntent,
    orientation: &Quat,
    dt: f32,
) {
    let target = target_velocity(input, orientation, state.top_speed);
    let air_scale = if state.grounded() {
        1.0
    } else {
        config.integrator.air_control()
    };

    match config.integrator {
        Integrator::SmoothedBlend {
            acceleration, drag, ..
        } => {
            let rate = if input.locked {
                drag
            } else if input.move_magnitude() > INPUT_ACCELERATION_THRESHOLD {
                acceleration * air_scale
            } else {
                drag * air_scale
            };

            let current = planar(&state.velocity);
            let next = blend_vec3(current, target, rate, dt);
            state.velocity.x = next.x;
            state.velocity.z = next.z;
        }

        Integrator::GroundAirAccelerate {
            ground_acceleration,
            air_acceleration,
            friction,
            move_shift_rate,
            ..
        } => {
            let rate = if input.locked {
                move_shift_rate
            } else {
                move_shift_rate * air_scale
            };
            state.wish = blend_vec3(state.wish, target, rate, dt);

            let mut v = planar(&state.velocity);
            let accel = if state.grounded() {
                v = apply_friction(v, friction, dt);
                ground_acceleration
            } else {
                air_acceleration_for(air_acceleration, &state.wish, &v)
            };
            v += state.wish * accel * dt;

            state.velocity.x = v.x;
            state.velocity.z = v.z;
        }
    }
}

/// Scale `v` down by `speed * friction * dt`, never reversing it.
#[inline]
pub(crate) fn apply_friction(v: Vec3, friction: f32, dt: f32) -> Vec3 {
    let speed = v.norm();
    if speed <= EPSILON {
        return v;
    }
    let drop = speed * friction * dt;
    v * ((speed - drop).max(0.0) / speed)
}

/// Air acceleration, boosted the more the current motion opposes the wish direction.
#[inline]
pub(crate) fn air_acceleration_for(base: f32, wish: &Vec3, velocity: &Vec3) -> f32 {
    let alignment = planar_dir(wish).dot(&planar_dir(velocity));
    base + base * (1.0 - alignment) * planar_len(velocity) * 0.25
}

/// Apply gravity and the terminal-speed clamps.
pub(crate) fn apply_gravity(config: &LocomotionConfig, state: &mut LocomotionState, dt: f32) {
    let multiplier = if state.velocity.y > 0.0 {
        1.0
    } else {
        config.fall_gravity_multiplier
    };
    let cap = if state.sliding() {
        config.slide_speed_cap
    } else {
        config.gravity_cap
    };
    state.velocity.y = (state.velocity.y - config.gravity * dt * multiplier).max(-cap);
}
