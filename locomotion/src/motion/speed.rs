use crate::{
    config::{CrouchMode, LocomotionConfig, SprintMode},
    constants::CLASSIC_SPRINT_THRESHOLD,
    input::InputIntent,
};

use super::state::{LocomotionState, MotionFlag};

/// Resolve the sprint flag, then pick the top speed from the crouch/sprint combination.
///
/// Expects the crouch flag to be current for this tick.
pub(crate) fn resolve_speed(config: &LocomotionConfig, state: &mut LocomotionState, input: &InputIntent) {
    let mut sprinting = match config.sprint_mode {
        SprintMode::None => false,
        SprintMode::Normal => input.sprint.held,
        SprintMode::Classic => {
            input.sprint.held && input.average_axis_intensity() >= CLASSIC_SPRINT_THRESHOLD
        }
    };

    if config.crouch_mode == CrouchMode::NoSprint && state.crouching() {
        sprinting = false;
    }

    state.set(MotionFlag::Sprinting, sprinting);
    state.top_speed = top_speed(config, state.crouching(), sprinting);
}

pub(crate) fn top_speed(config: &LocomotionConfig, crouching: bool, sprinting: bool) -> f32 {
    match (crouching, sprinting) {
        (false, false) => config.walk_speed,
        (false, true) => config.sprint_speed,
        (true, false) => config.crouch_speed,
        (true, true) => {
            if config.walk_speed > 0.0 {
                config.crouch_speed * (config.sprint_speed / config.walk_speed)
            } else {
                config.crouch_speed
            }
        }
    }
}
