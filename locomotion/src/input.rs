use nalgebra as na;

use crate::utils::{Vec3, planar_len};

/// Edge and level state of one digital control for a single sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Went down since the previous sample.
    pub pressed: bool,
    /// Currently down.
    pub held: bool,
    /// Went up since the previous sample.
    pub released: bool,
}

impl ButtonState {
    /// Derive edges from two consecutive level samples.
    pub fn from_levels(was_held: bool, is_held: bool) -> Self {
        Self {
            pressed: is_held && !was_held,
            held: is_held,
            released: was_held && !is_held,
        }
    }

    /// Force the control up, reporting a release if it was held.
    pub fn neutralized(self) -> Self {
        Self {
            pressed: false,
            held: false,
            released: self.held,
        }
    }
}

/// Per-tick snapshot of what the player wants to do.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    /// Desired motion in the facing frame: `x` strafes, `z` moves forward. `y` is ignored by
    /// planar logic but counts toward the acceleration threshold.
    pub move_input: Vec3,
    /// Look delta, consumed by camera collaborators only.
    pub look_delta: na::Vector2<f32>,
    pub jump: ButtonState,
    pub crouch: ButtonState,
    pub sprint: ButtonState,
    pub interact: ButtonState,
    /// Secondary action (aim). Turns the body toward the camera while held.
    pub secondary: ButtonState,
    /// Locked input drives motion toward rest and suppresses crouch and jump requests.
    pub locked: bool,
}

impl InputIntent {
    /// Intent that only moves along `move_input`.
    pub fn moving(x: f32, z: f32) -> Self {
        Self {
            move_input: Vec3::new(x, 0.0, z),
            ..Self::default()
        }
    }

    /// The snapshot a locked controller reports: no motion, no look, every held control
    /// released this tick.
    pub fn neutralized(&self) -> Self {
        Self {
            move_input: Vec3::zeros(),
            look_delta: na::Vector2::zeros(),
            jump: self.jump.neutralized(),
            crouch: self.crouch.neutralized(),
            sprint: self.sprint.neutralized(),
            interact: self.interact.neutralized(),
            secondary: self.secondary.neutralized(),
            locked: true,
        }
    }

    /// Full magnitude of the move vector.
    pub fn move_magnitude(&self) -> f32 {
        self.move_input.norm()
    }

    /// Magnitude of the planar (XZ) move vector.
    pub fn planar_magnitude(&self) -> f32 {
        planar_len(&self.move_input)
    }

    /// Average absolute intensity over the two planar axes.
    pub fn average_axis_intensity(&self) -> f32 {
        (self.move_input.x.abs() + self.move_input.z.abs()) * 0.5
    }
}

/// Holds press/release edges seen by the variable-rate tick until a fixed-rate tick consumes them.
///
/// Each edge is handed out exactly once, however many fixed ticks run per frame (including none).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLatch {
    pressed: bool,
    released: bool,
}

impl ButtonLatch {
    pub fn record(&mut self, state: ButtonState) {
        self.pressed |= state.pressed;
        self.released |= state.released;
    }

    /// Latched edges combined with the current level; clears the latch.
    pub fn take(&mut self, current: ButtonState) -> ButtonState {
        let out = ButtonState {
            pressed: self.pressed,
            held: current.held,
            released: self.released,
        };
        *self = Self::default();
        out
    }
}
