use crate::{
    config::{JumpMode, LocomotionConfig},
    constants::{
        ENHANCED_JUMP_BONUS, GROUND_STICK_VELOCITY, JUMP_RELEASE_DAMPING, LEAP_HORIZONTAL_SCALE,
        LEAP_VERTICAL_SCALE, STUCK_EPSILON,
    },
    events::{MotionEvent, MotionEvents},
    input::{ButtonState, InputIntent},
    utils::{Quat, Vec3},
};

use super::state::{LocomotionState, MotionFlag};

/// Inputs the jump gate reads for one fixed tick.
pub(crate) struct JumpContext<'a> {
    pub input: &'a InputIntent,
    /// Jump edges latched since the previous fixed tick.
    pub jump: ButtonState,
    pub orientation: Quat,
    pub feet: Vec3,
    /// The ground snap already aimed vertical velocity at the surface this tick.
    pub snapped: bool,
    pub dt: f32,
}

/// Run the jump gate for one fixed tick.
///
/// Airborne: releasing jump while rising cuts the ascent, and a character whose feet have not
/// moved for `anti_stuck.duration` is allowed to jump free. Grounded: try to jump, then hold vertical
/// velocity at a small downward stick so slopes are followed without building fall speed.
pub(crate) fn resolve_jump(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    events: &mut MotionEvents,
    ctx: &JumpContext<'_>,
) {
    if state.jump_cooldown > 0.0 {
        state.jump_cooldown -= ctx.dt;
    }

    if !state.grounded() {
        if !ctx.input.locked && state.velocity.y > 0.0 && ctx.jump.released {
            state.velocity.y -= state.velocity.y * JUMP_RELEASE_DAMPING;
        }

        if config.anti_stuck.enabled {
            release_if_stuck(config, state, events, ctx);
        }
    } else {
        try_jump(config, state, events, ctx);
        if ctx.snapped {
            return;
        }

        let floor = if ctx.input.planar_magnitude() > 0.0 {
            GROUND_STICK_VELOCITY
        } else {
            0.0
        };
        state.velocity.y = state.velocity.y.max(floor);
    }
}

fn release_if_stuck(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    events: &mut MotionEvents,
    ctx: &JumpContext<'_>,
) {
    let moved = state
        .last_position
        .map_or(f32::INFINITY, |last| (ctx.feet - last).norm());

    if moved >= STUCK_EPSILON || state.velocity.y > 0.0 {
        state.stuck_timer = config.anti_stuck.duration;
        return;
    }

    if state.stuck_timer > 0.0 {
        state.stuck_timer -= ctx.dt;
        return;
    }

    if state.sliding() || !state.can_jump() {
        log::debug!("anti-stuck released a wedged character");
    }
    state.set(MotionFlag::Sliding, false);
    state.sliding_normal = Vec3::zeros();
    state.set(MotionFlag::CanJump, true);
    try_jump(config, state, events, ctx);
}

fn try_jump(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    events: &mut MotionEvents,
    ctx: &JumpContext<'_>,
) {
    let requested = ctx.jump.pressed || (config.auto_bunny_hop && ctx.jump.held);
    if ctx.input.locked
        || config.jump_mode == JumpMode::None
        || !state.can_jump()
        || !requested
        || state.jump_cooldown > 0.0
    {
        return;
    }

    let power = config.jump_power;
    match config.jump_mode {
        JumpMode::None => return,
        JumpMode::Normal => state.velocity.y = power,
        JumpMode::Enhanced => {
            let bonus = if state.sprinting() {
                power * ENHANCED_JUMP_BONUS
            } else {
                0.0
            };
            state.velocity.y = power + bonus;
        }
        JumpMode::Leaping => {
            state.velocity.y = power;
            if state.sprinting() {
                let fling = Vec3::new(
                    ctx.input.move_input.x * config.sprint_speed * LEAP_HORIZONTAL_SCALE,
                    power * LEAP_VERTICAL_SCALE,
                    ctx.input.move_input.z * config.sprint_speed * LEAP_HORIZONTAL_SCALE,
                );
                state.velocity += ctx.orientation * fling;
            }
        }
    }

    state.jump_cooldown = config.jump_cooldown;
    log::debug!("jump fired (v.y = {:.2})", state.velocity.y);
    events.emit(MotionEvent::Jump);
}
