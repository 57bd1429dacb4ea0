use crate::{
    config::LocomotionConfig,
    constants::{FLOOR_MIN_UP, REFERENCE_RATE_HZ, SLIDE_HOLD_SECONDS, SLIDE_PUSH_PER_TICK},
    utils::{Vec3, angle_from_up},
};

use super::state::{LocomotionState, MotionFlag};

/// Whether a surface with `normal` can be stood on.
#[inline]
pub(crate) fn is_walkable(config: &LocomotionConfig, normal: &Vec3) -> bool {
    !config.slope.sliding_on_slopes || angle_from_up(normal) < config.slope.slope_angle
}

/// Decide sliding and jump eligibility from a surface beneath the character.
///
/// Walls (`normal.y <= 0.1`) are ignored. With slope sliding enabled, decisions are only made
/// while moving downward: too-steep surfaces start a slide, walkable ones end it and grant a jump.
pub(crate) fn classify_surface(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    normal: Vec3,
    vertical_velocity: f32,
) {
    if normal.dot(&Vec3::y()) <= FLOOR_MIN_UP {
        return;
    }

    if !config.slope.sliding_on_slopes {
        state.set(MotionFlag::CanJump, true);
        return;
    }

    if vertical_velocity >= 0.0 {
        return;
    }

    if is_walkable(config, &normal) {
        if state.sliding() {
            log::debug!("slide ended on walkable surface");
        }
        state.set(MotionFlag::Sliding, false);
        state.sliding_normal = Vec3::zeros();
        state.set(MotionFlag::CanJump, true);
    } else {
        if !state.sliding() {
            log::debug!(
                "slide started ({:.1}° surface)",
                angle_from_up(&normal)
            );
        }
        enter_slide(state, normal);
    }
}

fn enter_slide(state: &mut LocomotionState, normal: Vec3) {
    state.set(MotionFlag::Sliding, true);
    state.slide_holder = SLIDE_HOLD_SECONDS;
    state.sliding_normal = normal;
    state.set(MotionFlag::CanJump, false);
    state.set(MotionFlag::Grounded, false);

    debug_assert!(!state.can_jump() && !state.grounded());
}

/// Keep sliding for a short hold after leaving the slope, then drop it.
pub(crate) fn tick_slide_hold(state: &mut LocomotionState, dt: f32) {
    if state.grounded() {
        return;
    }

    if state.slide_holder > 0.0 {
        state.slide_holder -= dt;
    } else if state.sliding() {
        log::debug!("slide ended after hold expired");
        state.set(MotionFlag::Sliding, false);
        state.sliding_normal = Vec3::zeros();
    }
}

/// Push a sliding character down the slope and keep it from jumping.
pub(crate) fn apply_slide_push(config: &LocomotionConfig, state: &mut LocomotionState, dt: f32) {
    if !config.slope.sliding_on_slopes || !state.sliding() {
        return;
    }

    state.set(MotionFlag::CanJump, false);

    let n = state.sliding_normal;
    let push = (1.0 - n.y) * SLIDE_PUSH_PER_TICK * dt * REFERENCE_RATE_HZ;
    state.velocity.x += n.x * push;
    state.velocity.z += n.z * push;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_normal(degrees: f32) -> Vec3 {
        let a = degrees.to_radians();
        Vec3::new(a.sin(), a.cos(), 0.0)
    }

    #[test]
    fn steep_surface_while_falling_starts_slide() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        state.set(MotionFlag::CanJump, true);
        state.set(MotionFlag::Grounded, true);

        classify_surface(&config, &mut state, slope_normal(45.0), -1.0);

        assert!(state.sliding());
        assert!(!state.can_jump());
        assert!(!state.grounded());
        assert_eq!(state.slide_holder, SLIDE_HOLD_SECONDS);
    }

    #[test]
    fn walkable_surface_ends_slide_and_grants_jump() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        classify_surface(&config, &mut state, slope_normal(45.0), -1.0);

        classify_surface(&config, &mut state, slope_normal(10.0), -1.0);

        assert!(!state.sliding());
        assert!(state.can_jump());
        assert_eq!(state.sliding_normal, Vec3::zeros());
    }

    #[test]
    fn rising_or_walls_leave_state_alone() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);

        classify_surface(&config, &mut state, slope_normal(45.0), 2.0);
        assert!(!state.sliding());

        classify_surface(&config, &mut state, Vec3::x(), -1.0);
        assert!(!state.sliding());
        assert!(!state.can_jump());
    }

    #[test]
    fn disabled_sliding_always_grants_jump() {
        let mut config = LocomotionConfig::default();
        config.slope.sliding_on_slopes = false;
        let mut state = LocomotionState::new(&config);

        classify_surface(&config, &mut state, slope_normal(60.0), 5.0);

        assert!(state.can_jump());
        assert!(!state.sliding());
        assert!(is_walkable(&config, &slope_normal(80.0)));
    }

    #[test]
    fn slide_push_points_downhill_and_scales_with_dt() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        classify_surface(&config, &mut state, slope_normal(45.0), -1.0);

        apply_slide_push(&config, &mut state, 1.0 / 60.0);
        let one_tick = state.velocity.x;
        assert!(one_tick > 0.0);
        assert_eq!(state.velocity.z, 0.0);

        state.velocity = Vec3::zeros();
        apply_slide_push(&config, &mut state, 1.0 / 120.0);
        apply_slide_push(&config, &mut state, 1.0 / 120.0);
        assert!((state.velocity.x - one_tick).abs() < 1.0e-6);
    }

    #[test]
    fn slide_hold_expires_only_while_airborne() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        classify_surface(&config, &mut state, slope_normal(45.0), -1.0);

        // 0.1 s hold at 60 Hz: still sliding after five ticks, done a few ticks later.
        for _ in 0..5 {
            tick_slide_hold(&mut state, 1.0 / 60.0);
        }
        assert!(state.sliding());

        for _ in 0..3 {
            tick_slide_hold(&mut state, 1.0 / 60.0);
        }
        assert!(!state.sliding());
    }
}
