use crate::{
    config::{CrouchMode, LocomotionConfig},
    constants::{CROUCH_HOLD_THRESHOLD, MIN_CROUCH_RATE},
    environment::EnvironmentQuery,
    input::InputIntent,
    utils::{Vec3, smooth_up},
};

use super::state::{LocomotionState, MotionFlag};

/// Whether something above the character would stop it from standing up.
pub(crate) fn ceiling_blocks_standing(
    config: &LocomotionConfig,
    state: &LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
) -> bool {
    let center = feet + Vec3::y() * state.collider_height * 0.5;
    let reach = config.capsule.height * 0.52;

    environment
        .cast_sphere(center, config.capsule.radius * 0.9, Vec3::y(), reach)
        .is_some()
        || environment.cast_ray(center, Vec3::y(), reach).is_some()
}

/// Update the crouch flag, advance the transition and derive the collider height.
pub(crate) fn resolve_crouch(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    feet: Vec3,
    input: &InputIntent,
    dt: f32,
) {
    let crouching = match config.crouch_mode {
        CrouchMode::None => false,
        CrouchMode::Normal | CrouchMode::NoSprint => {
            if !ceiling_blocks_standing(config, state, environment, feet) {
                !input.locked && input.crouch.held
            } else {
                let stay = input.crouch.pressed || state.crouch_transition >= CROUCH_HOLD_THRESHOLD;
                if stay && !input.crouch.held && state.crouching() {
                    log::debug!("stand-up blocked by ceiling");
                }
                stay
            }
        }
    };
    state.set(MotionFlag::Crouching, crouching);

    let rate = if config.crouch_rate > 0.0 {
        config.crouch_rate
    } else {
        MIN_CROUCH_RATE
    };
    let direction = if crouching { 1.0 } else { -1.0 };
    state.crouch_transition = (state.crouch_transition + direction * dt / rate).clamp(0.0, 1.0);

    let standing = config.capsule.height;
    state.collider_height =
        standing + (config.crouched_height() - standing) * smooth_up(state.crouch_transition);
}
