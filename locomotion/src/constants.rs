/// Reference simulation rate (Hz) that all per-tick tuning values were authored against.
///
/// Exponential smoothing rates and per-tick pushes are expressed "per reference tick" and are
/// rescaled by `dt * REFERENCE_RATE_HZ`, so the same tuning behaves identically at any tick rate.
pub const REFERENCE_RATE_HZ: f32 = 60.0;

/// Distance below which an exponential blend snaps straight onto its target.
pub const BLEND_SNAP_DISTANCE: f32 = 0.001;

/// Planar input magnitude above which the smoothed-blend integrator uses `acceleration`
/// instead of `drag`.
pub const INPUT_ACCELERATION_THRESHOLD: f32 = 0.2;

/// Average absolute input axis below which classic sprint disengages.
pub const CLASSIC_SPRINT_THRESHOLD: f32 = 0.5;

/// Planar input magnitude required for the step cadence to emit footsteps.
pub const STEP_INPUT_THRESHOLD: f32 = 0.3;

/// Vertical velocity floor while grounded with horizontal input (m/s).
///
/// Slightly negative so the character keeps meeting downward slopes without accumulating
/// fall speed.
pub const GROUND_STICK_VELOCITY: f32 = -0.5;

/// How long contact with a too-steep surface keeps the character sliding once airborne (seconds).
pub const SLIDE_HOLD_SECONDS: f32 = 0.1;

/// Landing effects stay muted for this long after sliding stops (seconds).
pub const SLIDE_LANDING_DEBOUNCE_SECONDS: f32 = 0.2;

/// Horizontal slide push applied per reference tick, scaled by `(1 - n.y) * n.xz`.
pub const SLIDE_PUSH_PER_TICK: f32 = 0.25;

/// Fall speed (m/s, positive) that must be exceeded before a landing event fires.
pub const LANDING_MIN_FALL_SPEED: f32 = 5.0;

/// Horizontal travel (meters) under which an airborne character counts as stuck.
pub const STUCK_EPSILON: f32 = 0.05;

/// Stuck timer value while the character is moving freely (seconds).
pub const STUCK_TIMER_RESET: f32 = 1.0;

/// Stuck timer value for a freshly created character (seconds).
pub const STUCK_TIMER_INITIAL: f32 = 0.5;

/// Fraction of upward velocity kept when jump is released mid-ascent.
pub const JUMP_RELEASE_DAMPING: f32 = 0.5;

/// Extra jump power fraction granted by `JumpMode::Enhanced` while sprinting.
pub const ENHANCED_JUMP_BONUS: f32 = 0.15;

/// Horizontal leap impulse multiplier (times sprint speed) for `JumpMode::Leaping`.
pub const LEAP_HORIZONTAL_SCALE: f32 = 2.0;

/// Vertical leap impulse fraction (times jump power) for `JumpMode::Leaping`.
pub const LEAP_VERTICAL_SCALE: f32 = 0.5;

/// Rate (1/s) at which a detected stair step is climbed: `v.y = rise * STAIR_CLIMB_RATE`.
pub const STAIR_CLIMB_RATE: f32 = 15.0;

/// Smallest rise (meters) treated as a stair step rather than contact noise.
pub const STAIR_MIN_RISE: f32 = 0.01;

/// Minimum `normal.y` for a stair tread to count as a step.
pub const STAIR_TREAD_MIN_UP: f32 = 0.99;

/// Per-reference-tick decay rate of the stair smoothing offset.
pub const STAIR_SMOOTHING_DECAY: f32 = 0.1;

/// Surfaces whose normal has at most this much up component are walls, not floors.
pub const FLOOR_MIN_UP: f32 = 0.1;

/// Reach of the downward ray used to reclassify a reported contact (meters).
pub const CONTACT_PROBE_DISTANCE: f32 = 1000.0;

/// `normal.y` at or above which a surface is considered perfectly flat for slope following.
pub const FLAT_SURFACE_UP: f32 = 0.99;

/// Minimum planar speed (m/s) before the body turns to face its motion.
pub const FACING_MIN_SPEED: f32 = 0.1;

/// Per-reference-tick easing toward the motion direction.
pub const FACING_MOTION_RATE: f32 = 0.1;

/// Per-reference-tick easing toward the camera facing while aiming.
pub const FACING_AIM_RATE: f32 = 0.2;

/// Crouch transition value above which an obstructed character stays crouched.
pub const CROUCH_HOLD_THRESHOLD: f32 = 0.1;

/// Smallest crouch rate used when a non-positive rate is configured (seconds).
pub const MIN_CROUCH_RATE: f32 = 0.01;

/// Practical small value for float comparisons.
pub const EPSILON: f32 = 1.0e-6;
