use crate::{
    config::LocomotionConfig,
    constants::{LANDING_MIN_FALL_SPEED, SLIDE_LANDING_DEBOUNCE_SECONDS},
    events::{MotionEvent, MotionEvents},
};

use super::state::LocomotionState;

/// Fall speed of the last frame, if it is fast enough to count as a landing.
#[inline]
fn landing_fall_speed(state: &LocomotionState) -> Option<f32> {
    let fall_speed = -state.last_vertical_velocity;
    (fall_speed > LANDING_MIN_FALL_SPEED).then_some(fall_speed)
}

/// Fire a landing if the fall was hard enough and no debounce is running.
///
/// Both landing paths (ground snap and the late check) go through here, so a single touchdown
/// yields at most one event.
pub(crate) fn try_land(config: &LocomotionConfig, state: &mut LocomotionState, events: &mut MotionEvents) {
    if !config.landing_effects || state.slide_timer > 0.0 || state.landing_timer > 0.0 {
        return;
    }
    let Some(fall_speed) = landing_fall_speed(state) else {
        return;
    };

    log::debug!("landed at {:.2} m/s", fall_speed);
    events.emit(MotionEvent::Landing { fall_speed });
    state.landing_timer = config.landing_debounce;
}

/// End-of-frame bookkeeping: slide and landing debounces, the late landing check, and the
/// previous-frame samples used by the next fixed tick.
pub(crate) fn late_tick(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    events: &mut MotionEvents,
    dt: f32,
) {
    if state.sliding() {
        state.slide_timer = SLIDE_LANDING_DEBOUNCE_SECONDS;
    } else {
        state.slide_timer = (state.slide_timer - dt).max(0.0);
    }

    // Only armed timers move: airborne time counts down, ground contact re-arms.
    if state.landing_timer > 0.0 {
        if state.grounded() {
            state.landing_timer = config.landing_debounce;
        } else {
            state.landing_timer -= dt;
        }
    }

    if state.grounded() {
        try_land(config, state, events);
    }

    state.last_vertical_velocity = state.velocity.y;
}
