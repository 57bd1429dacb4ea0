//! Per-character locomotion tuning.
//!
//! A [`LocomotionConfig`] is fixed for the lifetime of a character. It is checked once by
//! [`LocomotionConfig::validate`] when a [`crate::MotionResolver`] is created and treated as
//! read-only afterwards.

use thiserror::Error;

use crate::constants::STUCK_TIMER_RESET;

/// Rejected configuration value, naming the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must lie within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Whether and how the character may crouch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrouchMode {
    /// Crouching is disabled.
    None,
    /// Crouching never interferes with sprinting.
    #[default]
    Normal,
    /// Crouching forces sprinting off.
    NoSprint,
}

/// Whether and how the character may sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SprintMode {
    None,
    /// Sprint exactly while the control is held.
    #[default]
    Normal,
    /// Sprint while held, but drop out as soon as average absolute input falls below 0.5.
    Classic,
}

/// Jump behavior once the jump gate opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpMode {
    None,
    /// Always jump with `jump_power`.
    #[default]
    Normal,
    /// `jump_power` boosted by 15% while sprinting.
    Enhanced,
    /// `jump_power` plus a forward fling scaled by sprint speed while sprinting.
    Leaping,
}

/// Horizontal velocity integration model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integrator {
    /// Exponentially blend toward the target velocity.
    ///
    /// `acceleration` is used while input exceeds 0.2, `drag` otherwise. Both are per-reference-tick
    /// rates in `[0, 1]`, scaled by `air_control` while airborne.
    SmoothedBlend {
        acceleration: f32,
        drag: f32,
        air_control: f32,
    },

    /// Ground friction then acceleration, with a strafing-friendly air acceleration.
    GroundAirAccelerate {
        /// Ground acceleration (1/s, applied to the wish velocity).
        ground_acceleration: f32,
        /// Base air acceleration (1/s).
        air_acceleration: f32,
        /// Ground friction (1/s).
        friction: f32,
        /// Per-reference-tick easing of the wish velocity toward the input.
        move_shift_rate: f32,
        air_control: f32,
    },
}

impl Integrator {
    pub fn smoothed_blend() -> Self {
        Self::SmoothedBlend {
            acceleration: 0.2,
            drag: 0.2,
            air_control: 1.0,
        }
    }

    pub fn ground_air_accelerate() -> Self {
        Self::GroundAirAccelerate {
            ground_acceleration: 18.0,
            air_acceleration: 0.5,
            friction: 20.0,
            move_shift_rate: 1.0,
            air_control: 1.0,
        }
    }

    pub fn air_control(&self) -> f32 {
        match *self {
            Self::SmoothedBlend { air_control, .. } => air_control,
            Self::GroundAirAccelerate { air_control, .. } => air_control,
        }
    }
}

/// Standing capsule dimensions (meters). `height` is the full height, feet to crown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub height: f32,
}

impl Default for CapsuleSpec {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeConfig {
    /// When false, every surface hit by the ground probe is walkable.
    pub sliding_on_slopes: bool,
    /// Steepest walkable angle from world-up (degrees).
    pub slope_angle: f32,
}

impl Default for SlopeConfig {
    fn default() -> Self {
        Self {
            sliding_on_slopes: true,
            slope_angle: 30.0,
        }
    }
}

/// Recovery for characters wedged in mid-air between inward-facing slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiStuckConfig {
    pub enabled: bool,
    /// How long the character must stay put before jumping is force-granted (seconds).
    pub duration: f32,
}

impl Default for AntiStuckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: STUCK_TIMER_RESET,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocomotionConfig {
    // ========================================================================
    // Body
    // ========================================================================
    pub capsule: CapsuleSpec,

    // ========================================================================
    // Speeds (m/s)
    // ========================================================================
    pub walk_speed: f32,
    pub crouch_speed: f32,
    pub sprint_speed: f32,
    /// Vertical launch velocity (m/s).
    pub jump_power: f32,

    // ========================================================================
    // Modes
    // ========================================================================
    pub crouch_mode: CrouchMode,
    pub sprint_mode: SprintMode,
    pub jump_mode: JumpMode,
    pub integrator: Integrator,

    // ========================================================================
    // Crouch
    // ========================================================================
    /// Seconds for a full crouch or stand transition.
    pub crouch_rate: f32,
    /// Crouched collider height as a fraction of standing height, in `[0.4, 1]`.
    pub crouch_fraction: f32,

    // ========================================================================
    // Walk cycle and stairs
    // ========================================================================
    /// Walk phase advanced per second per m/s of planar speed.
    pub walk_rate: f32,
    /// Walk phase at which a footstep is emitted.
    pub step_threshold: f32,
    /// Tallest climbable step (meters).
    pub step_height: f32,
    /// Accumulate a visual offset for stair climbs so presentation can smooth them.
    pub smooth_stepping: bool,
    pub slope: SlopeConfig,

    // ========================================================================
    // Gravity
    // ========================================================================
    /// Downward acceleration (m/s²).
    pub gravity: f32,
    /// Terminal fall speed (m/s).
    pub gravity_cap: f32,
    /// Terminal fall speed while sliding (m/s).
    pub slide_speed_cap: f32,
    /// Gravity multiplier applied once the character is no longer rising.
    pub fall_gravity_multiplier: f32,

    // ========================================================================
    // Jump and landing
    // ========================================================================
    /// Minimum time between two jumps (seconds).
    pub jump_cooldown: f32,
    /// Holding jump re-triggers a jump whenever the gate opens.
    pub auto_bunny_hop: bool,
    pub anti_stuck: AntiStuckConfig,
    pub landing_effects: bool,
    /// Minimum airborne time between two landing events (seconds).
    pub landing_debounce: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self::smoothed_blend()
    }
}

impl LocomotionConfig {
    /// Smoothed-blend tuning: soft gravity, short jump debounce.
    pub fn smoothed_blend() -> Self {
        Self {
            capsule: CapsuleSpec::default(),
            walk_speed: 5.0,
            crouch_speed: 2.0,
            sprint_speed: 9.0,
            jump_power: 12.0,
            crouch_mode: CrouchMode::Normal,
            sprint_mode: SprintMode::Normal,
            jump_mode: JumpMode::Normal,
            integrator: Integrator::smoothed_blend(),
            crouch_rate: 0.2,
            crouch_fraction: 0.4,
            walk_rate: 0.2,
            step_threshold: 0.5,
            step_height: 0.5,
            smooth_stepping: true,
            slope: SlopeConfig::default(),
            gravity: 30.0,
            gravity_cap: 100.0,
            slide_speed_cap: 45.0,
            fall_gravity_multiplier: 1.0,
            jump_cooldown: 0.05,
            auto_bunny_hop: false,
            anti_stuck: AntiStuckConfig::default(),
            landing_effects: true,
            landing_debounce: 0.2,
        }
    }

    /// Ground/air-accelerate tuning: heavier falls, auto bunny-hop, long landing debounce.
    pub fn ground_air() -> Self {
        Self {
            integrator: Integrator::ground_air_accelerate(),
            gravity: 40.0,
            fall_gravity_multiplier: 1.25,
            jump_cooldown: 0.1,
            auto_bunny_hop: true,
            landing_debounce: 1.0,
            ..Self::smoothed_blend()
        }
    }

    /// Collider height when fully crouched.
    pub fn crouched_height(&self) -> f32 {
        self.capsule.height * self.crouch_fraction
    }

    /// Check every field, failing on the first offending one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("capsule.radius", self.capsule.radius)?;
        positive("capsule.height", self.capsule.height)?;

        non_negative("walk_speed", self.walk_speed)?;
        non_negative("crouch_speed", self.crouch_speed)?;
        non_negative("sprint_speed", self.sprint_speed)?;
        non_negative("jump_power", self.jump_power)?;

        // Crouch-sprint speed is scaled by sprint/walk.
        if self.sprint_mode != SprintMode::None && self.crouch_mode != CrouchMode::None {
            positive("walk_speed", self.walk_speed)?;
        }

        non_negative("crouch_rate", self.crouch_rate)?;
        in_range("crouch_fraction", self.crouch_fraction, 0.4, 1.0)?;

        non_negative("walk_rate", self.walk_rate)?;
        in_range("step_threshold", self.step_threshold, 0.0, 1.0)?;
        non_negative("step_height", self.step_height)?;
        in_range("slope.slope_angle", self.slope.slope_angle, 0.0, 90.0)?;

        non_negative("gravity", self.gravity)?;
        positive("gravity_cap", self.gravity_cap)?;
        positive("slide_speed_cap", self.slide_speed_cap)?;
        non_negative("fall_gravity_multiplier", self.fall_gravity_multiplier)?;

        non_negative("jump_cooldown", self.jump_cooldown)?;
        non_negative("anti_stuck.duration", self.anti_stuck.duration)?;
        non_negative("landing_debounce", self.landing_debounce)?;

        match self.integrator {
            Integrator::SmoothedBlend {
                acceleration,
                drag,
                air_control,
            } => {
                in_range("integrator.acceleration", acceleration, 0.0, 1.0)?;
                in_range("integrator.drag", drag, 0.0, 1.0)?;
                in_range("integrator.air_control", air_control, 0.0, 1.0)?;
            }
            Integrator::GroundAirAccelerate {
                ground_acceleration,
                air_acceleration,
                friction,
                move_shift_rate,
                air_control,
            } => {
                non_negative("integrator.ground_acceleration", ground_acceleration)?;
                non_negative("integrator.air_acceleration", air_acceleration)?;
                non_negative("integrator.friction", friction)?;
                in_range("integrator.move_shift_rate", move_shift_rate, 0.0, 1.0)?;
                in_range("integrator.air_control", air_control, 0.0, 1.0)?;
            }
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
