use crate::{
    config::LocomotionConfig,
    constants::STEP_INPUT_THRESHOLD,
    events::{MotionEvent, MotionEvents},
    input::InputIntent,
    utils::planar_len,
};

use super::state::LocomotionState;

/// Advance the walk cycle and emit one footstep per upward threshold crossing.
///
/// Crossings are counted on the unwrapped phase so a large step across the 1.0/0.0 seam is
/// neither missed nor doubled.
pub(crate) fn advance_walk_phase(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    events: &mut MotionEvents,
    input: &InputIntent,
    dt: f32,
) {
    let before = state.walk_phase;
    let after = before + dt * config.walk_rate * planar_len(&state.velocity);

    let threshold = config.step_threshold;
    let crossings = ((after - threshold).floor() - (before - threshold).floor()).max(0.0) as u32;

    if state.grounded() && input.planar_magnitude() > STEP_INPUT_THRESHOLD {
        for _ in 0..crossings {
            events.emit(MotionEvent::Step);
        }
    }

    state.walk_phase = after.rem_euclid(1.0);
    if state.walk_phase >= 1.0 {
        state.walk_phase = 0.0;
    }
}
