//! The motion resolver: per-character locomotion state machine.
//!
//! # Tick layout
//! The variable-rate `update` resolves crouch, sprint and top speed, advances the walk cycle,
//! eases the presentation values and latches jump edges. The fixed-rate `fixed_update` runs the
//! physical pipeline in this order:
//!
//! 1. body velocity sync (ground/air integrator only) and queued impulses
//! 2. slide hold countdown
//! 3. horizontal integration, then the slide push
//! 4. ceiling bump, then gravity
//! 5. ground probe (result queued), ground snap, queued grounded applied
//! 6. jump gate and the grounded vertical clamp
//! 7. slope follow, then stair step
//! 8. velocity written to the body
//!
//! `late_update` runs the landing check and samples the previous-frame values.

mod cadence;
mod crouch;
mod ground;
mod integrator;
mod jump;
mod landing;
mod slide;
mod speed;
mod stairs;
pub mod state;

pub use state::{LocomotionState, MotionFlag};

use crate::{
    component::{CharacterComponent, Frame},
    config::{ConfigError, Integrator, LocomotionConfig},
    constants::{FACING_AIM_RATE, FACING_MIN_SPEED, FACING_MOTION_RATE, STAIR_SMOOTHING_DECAY},
    environment::BodyKind,
    events::{MotionEvent, MotionEvents},
    input::ButtonLatch,
    owner::CharacterHandle,
    utils::{Quat, Vec3, blend_vec3, ease_rotation, planar_len, yaw_facing, yaw_only},
};

use jump::JumpContext;

/// Drives one character's locomotion from input intent and environment casts.
#[derive(Debug)]
pub struct MotionResolver {
    config: LocomotionConfig,
    state: LocomotionState,
    events: MotionEvents,
    owner: Option<CharacterHandle>,
    jump_latch: ButtonLatch,
    warned_missing_body: bool,
}

impl MotionResolver {
    /// Validate `config` and build a resolver at rest.
    pub fn new(config: LocomotionConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("rejected locomotion config: {e}");
            return Err(e);
        }

        log::info!(
            "motion resolver created ({:?}, capsule {:.2}x{:.2})",
            config.integrator,
            config.capsule.radius,
            config.capsule.height
        );
        Ok(Self {
            state: LocomotionState::new(&config),
            config,
            events: MotionEvents::default(),
            owner: None,
            jump_latch: ButtonLatch::default(),
            warned_missing_body: false,
        })
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn events(&self) -> &MotionEvents {
        &self.events
    }

    pub fn on_jump(&mut self, f: impl FnMut() + 'static) {
        self.events.on_jump(f);
    }

    pub fn on_landing(&mut self, f: impl FnMut(f32) + 'static) {
        self.events.on_landing(f);
    }

    pub fn on_step(&mut self, f: impl FnMut() + 'static) {
        self.events.on_step(f);
    }

    pub fn on_stair_step(&mut self, f: impl FnMut(Vec3) + 'static) {
        self.events.on_stair_step(f);
    }

    /// Take every event emitted since the start of the frame.
    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        self.events.drain().collect()
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity()
    }

    pub fn grounded(&self) -> bool {
        self.state.grounded()
    }

    pub fn sliding(&self) -> bool {
        self.state.sliding()
    }

    pub fn crouching(&self) -> bool {
        self.state.crouching()
    }

    pub fn sprinting(&self) -> bool {
        self.state.sprinting()
    }

    pub fn top_speed(&self) -> f32 {
        self.state.top_speed()
    }

    pub fn walk_phase(&self) -> f32 {
        self.state.walk_phase()
    }

    /// Queue an external velocity change; it is applied at the start of the next fixed tick.
    pub fn add_velocity(&mut self, delta: Vec3) {
        self.state.pending_impulse += delta;
    }

    /// Forward a contact the host's physics reported this tick.
    ///
    /// Re-runs the slope decision against the surface under the character. Contacts with
    /// dynamic bodies are ignored.
    pub fn on_contact(&mut self, body: BodyKind, frame: &Frame<'_>) {
        let Some(feet) = frame.body.as_deref().map(|b| b.position()) else {
            return;
        };
        ground::reclassify_contact(&self.config, &mut self.state, frame.environment, feet, body);
    }

    fn warn_missing_body(&mut self) {
        if !self.warned_missing_body {
            log::warn!("character {:?} has no body; motion skipped", self.owner);
            self.warned_missing_body = true;
        }
    }

    fn syncs_body_velocity(&self) -> bool {
        matches!(self.config.integrator, Integrator::GroundAirAccelerate { .. })
    }

    fn ease_body_facing(&mut self, facing: &Quat, aiming: bool, dt: f32) {
        let current = self.state.body_facing;
        if aiming {
            self.state.body_facing = ease_rotation(&current, &yaw_only(facing), FACING_AIM_RATE, dt);
        } else if planar_len(&self.state.velocity) > FACING_MIN_SPEED {
            if let Some(target) = yaw_facing(&self.state.velocity) {
                self.state.body_facing = ease_rotation(&current, &target, FACING_MOTION_RATE, dt);
            }
        }
    }
}

impl CharacterComponent for MotionResolver {
    fn initialize(&mut self, owner: CharacterHandle) {
        log::debug!("motion resolver attached to {owner:?}");
        self.owner = Some(owner);
    }

    fn owner(&self) -> Option<CharacterHandle> {
        self.owner
    }

    fn early_update(&mut self, _frame: &mut Frame<'_>) {
        self.events.clear_log();
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        let dt = frame.dt;
        let input = frame.input;
        self.jump_latch.record(input.jump);

        let Some(feet) = frame.body.as_deref().map(|b| b.position()) else {
            self.warn_missing_body();
            return;
        };

        let Self {
            config,
            state,
            events,
            ..
        } = self;

        crouch::resolve_crouch(config, state, frame.environment, feet, input, dt);
        speed::resolve_speed(config, state, input);
        cadence::advance_walk_phase(config, state, events, input, dt);

        self.ease_body_facing(&frame.facing, input.secondary.held, dt);
        self.state.stair_offset =
            blend_vec3(self.state.stair_offset, Vec3::zeros(), STAIR_SMOOTHING_DECAY, dt);
    }

    fn fixed_update(&mut self, frame: &mut Frame<'_>) {
        let dt = frame.dt;
        let input = frame.input;
        let environment = frame.environment;
        let orientation = yaw_only(&frame.facing);
        let sync = self.syncs_body_velocity();

        let Some(body) = frame.body.as_deref_mut() else {
            self.warn_missing_body();
            return;
        };
        let feet = body.position();
        let jump = self.jump_latch.take(input.jump);

        let Self {
            config,
            state,
            events,
            ..
        } = self;

        if sync {
            state.velocity = body.velocity();
        }
        state.velocity += std::mem::take(&mut state.pending_impulse);

        slide::tick_slide_hold(state, dt);
        if state.sliding() {
            state.set(MotionFlag::CanJump, false);
        }

        integrator::integrate_horizontal(config, state, input, &orientation, dt);
        slide::apply_slide_push(config, state, dt);

        ground::bump_ceiling(state, environment, feet);
        integrator::apply_gravity(config, state, dt);
        if state.sliding() {
            state.set(MotionFlag::Grounded, false);
        }

        let queued = ground::probe_ground(config, state, environment, feet);
        let snapped = ground::snap_to_ground(config, state, environment, events, feet, dt);
        if queued {
            state.set(MotionFlag::Grounded, true);
        }

        let ctx = JumpContext {
            input,
            jump,
            orientation,
            feet,
            snapped,
            dt,
        };
        jump::resolve_jump(config, state, events, &ctx);

        let has_planar_input = input.planar_magnitude() > 0.0;
        ground::follow_slope(config, state, environment, feet, has_planar_input, dt);
        stairs::climb_stairs(config, state, environment, events, feet, dt);

        body.set_velocity(state.velocity);
    }

    fn late_update(&mut self, frame: &mut Frame<'_>) {
        landing::late_tick(&self.config, &mut self.state, &mut self.events, frame.dt);
        if let Some(body) = frame.body.as_deref() {
            self.state.last_position = Some(body.position());
        }
    }
}
