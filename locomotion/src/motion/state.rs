use crate::{
    bitmask_flags::BitmaskFlags,
    config::LocomotionConfig,
    constants::STUCK_TIMER_INITIAL,
    utils::{Quat, Vec3},
};

crate::define_bitmask_flags!(MotionFlag, u8, {
    Grounded,
    Sliding,
    Crouching,
    Sprinting,
    CanJump,
});

/// Mutable locomotion state of one character.
///
/// Owned and mutated only by its [`crate::MotionResolver`]; collaborators get read access.
#[derive(Debug, Clone)]
pub struct LocomotionState {
    pub(crate) velocity: Vec3,
    /// Smoothed wish velocity fed to the ground/air accelerator.
    pub(crate) wish: Vec3,
    pub(crate) flags: BitmaskFlags<u8>,

    pub(crate) crouch_transition: f32,
    pub(crate) collider_height: f32,
    pub(crate) top_speed: f32,
    pub(crate) walk_phase: f32,

    pub(crate) jump_cooldown: f32,
    pub(crate) stuck_timer: f32,
    pub(crate) slide_holder: f32,
    pub(crate) slide_timer: f32,
    pub(crate) landing_timer: f32,
    pub(crate) sliding_normal: Vec3,

    pub(crate) last_vertical_velocity: f32,
    pub(crate) last_position: Option<Vec3>,
    pub(crate) pending_impulse: Vec3,

    pub(crate) stair_offset: Vec3,
    pub(crate) body_facing: Quat,
}

impl LocomotionState {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            velocity: Vec3::zeros(),
            wish: Vec3::zeros(),
            flags: BitmaskFlags::default(),
            crouch_transition: 0.0,
            collider_height: config.capsule.height,
            top_speed: config.walk_speed,
            walk_phase: 0.0,
            jump_cooldown: 0.0,
            stuck_timer: STUCK_TIMER_INITIAL,
            slide_holder: 0.0,
            slide_timer: 0.0,
            landing_timer: 0.0,
            sliding_normal: Vec3::zeros(),
            last_vertical_velocity: 0.0,
            last_position: None,
            pending_impulse: Vec3::zeros(),
            stair_offset: Vec3::zeros(),
            body_facing: Quat::identity(),
        }
    }

    #[inline]
    pub fn is(&self, flag: MotionFlag) -> bool {
        self.flags.has(flag)
    }

    #[inline]
    pub(crate) fn set(&mut self, flag: MotionFlag, on: bool) {
        self.flags.set(flag, on);
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn grounded(&self) -> bool {
        self.is(MotionFlag::Grounded)
    }

    pub fn sliding(&self) -> bool {
        self.is(MotionFlag::Sliding)
    }

    pub fn crouching(&self) -> bool {
        self.is(MotionFlag::Crouching)
    }

    pub fn sprinting(&self) -> bool {
        self.is(MotionFlag::Sprinting)
    }

    pub fn can_jump(&self) -> bool {
        self.is(MotionFlag::CanJump)
    }

    /// 0 standing, 1 fully crouched.
    pub fn crouch_transition(&self) -> f32 {
        self.crouch_transition
    }

    /// Current collider height; the collider center sits at half this height above the feet.
    pub fn collider_height(&self) -> f32 {
        self.collider_height
    }

    pub fn top_speed(&self) -> f32 {
        self.top_speed
    }

    /// Walk cycle position in `[0, 1)`.
    pub fn walk_phase(&self) -> f32 {
        self.walk_phase
    }

    pub fn jump_cooldown(&self) -> f32 {
        self.jump_cooldown
    }

    /// Offset to add to the visual root so stair climbs ease in instead of snapping.
    pub fn stair_offset(&self) -> Vec3 {
        self.stair_offset
    }

    /// Yaw-only facing for the body art.
    pub fn body_facing(&self) -> Quat {
        self.body_facing
    }
}
