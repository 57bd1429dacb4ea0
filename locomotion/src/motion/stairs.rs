use crate::{
    config::LocomotionConfig,
    constants::{STAIR_CLIMB_RATE, STAIR_MIN_RISE, STAIR_TREAD_MIN_UP},
    environment::EnvironmentQuery,
    events::{MotionEvent, MotionEvents},
    utils::{Vec3, planar_dir},
};

use super::state::LocomotionState;

/// How far ahead of the capsule the probes look, in radii.
const PROBE_REACH: f32 = 1.2;

/// Lift the character onto a step in front of it.
///
/// The forward probe at step height must be clear and the downward probe just ahead must land on
/// a flat tread above the feet. Vertical velocity is raised toward the tread and, with smooth
/// stepping, the rise is pushed into the presentation offset so the visual root lags behind.
pub(crate) fn climb_stairs(
    config: &LocomotionConfig,
    state: &mut LocomotionState,
    environment: &dyn EnvironmentQuery,
    events: &mut MotionEvents,
    feet: Vec3,
    dt: f32,
) {
    let direction = planar_dir(&state.velocity);
    if direction == Vec3::zeros() || config.step_height <= 0.0 {
        return;
    }

    let reach = config.capsule.radius * PROBE_REACH;
    let ratio = if config.capsule.height > 0.0 {
        state.collider_height / config.capsule.height
    } else {
        1.0
    };
    let lift = Vec3::y() * config.step_height * ratio;

    if environment.cast_ray(feet + lift, direction, reach).is_some() {
        return;
    }

    let Some(tread) = environment.cast_ray(feet + direction * reach + lift, -Vec3::y(), config.step_height) else {
        return;
    };
    if tread.normal.y <= STAIR_TREAD_MIN_UP || tread.point.y <= feet.y + state.velocity.y.max(0.0) {
        return;
    }

    let rise = tread.point.y - feet.y;
    if rise <= STAIR_MIN_RISE {
        return;
    }

    state.velocity.y = state.velocity.y.max(rise * STAIR_CLIMB_RATE);

    if config.smooth_stepping {
        let increment = Vec3::y() * rise * dt;
        state.stair_offset -= increment;
        events.emit(MotionEvent::StairStep { offset: increment });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestWorld;

    const DT: f32 = 1.0 / 60.0;

    fn step_world() -> TestWorld {
        // A 0.2 m step whose face sits 0.3 m ahead of the origin along +z.
        TestWorld::flat_ground().with_box(Vec3::new(-2.0, 0.0, 0.3), Vec3::new(2.0, 0.2, 3.0))
    }

    #[test]
    fn walking_into_a_step_climbs_it() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        let mut events = MotionEvents::default();
        state.velocity = Vec3::new(0.0, 0.0, 4.0);

        climb_stairs(&config, &mut state, &step_world(), &mut events, Vec3::zeros(), DT);

        assert!((state.velocity.y - 0.2 * STAIR_CLIMB_RATE).abs() < 1.0e-3);
        assert!((state.stair_offset.y + 0.2 * DT).abs() < 1.0e-5);
        assert_eq!(events.pending().len(), 1);
    }

    #[test]
    fn walls_and_flat_floors_are_not_steps() {
        let config = LocomotionConfig::default();
        let mut events = MotionEvents::default();

        let wall = TestWorld::flat_ground().with_box(Vec3::new(-2.0, 0.0, 0.3), Vec3::new(2.0, 3.0, 3.0));
        let mut state = LocomotionState::new(&config);
        state.velocity = Vec3::new(0.0, 0.0, 4.0);
        climb_stairs(&config, &mut state, &wall, &mut events, Vec3::zeros(), DT);
        assert_eq!(state.velocity.y, 0.0);

        let mut state = LocomotionState::new(&config);
        state.velocity = Vec3::new(0.0, 0.0, 4.0);
        climb_stairs(&config, &mut state, &TestWorld::flat_ground(), &mut events, Vec3::zeros(), DT);
        assert_eq!(state.velocity.y, 0.0);

        assert!(events.pending().is_empty());
    }

    #[test]
    fn standing_still_never_probes_for_steps() {
        let config = LocomotionConfig::default();
        let mut state = LocomotionState::new(&config);
        let mut events = MotionEvents::default();

        climb_stairs(&config, &mut state, &step_world(), &mut events, Vec3::zeros(), DT);
        assert_eq!(state.velocity, Vec3::zeros());
    }

    #[test]
    fn hard_stepping_leaves_the_offset_alone() {
        let config = LocomotionConfig {
            smooth_stepping: false,
            ..LocomotionConfig::default()
        };
        let mut state = LocomotionState::new(&config);
        let mut events = MotionEvents::default();
        state.velocity = Vec3::new(0.0, 0.0, 4.0);

        climb_stairs(&config, &mut state, &step_world(), &mut events, Vec3::zeros(), DT);

        assert!(state.velocity.y > 0.0);
        assert_eq!(state.stair_offset, Vec3::zeros());
        assert!(events.pending().is_empty());
    }
}
