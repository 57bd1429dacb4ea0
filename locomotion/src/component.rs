use crate::{
    environment::{CharacterBody, EnvironmentQuery},
    input::InputIntent,
    owner::CharacterHandle,
    utils::Quat,
};

/// Everything a component may look at during one callback.
pub struct Frame<'a> {
    /// Seconds covered by this callback: the frame delta for variable-rate callbacks, the fixed
    /// step for `fixed_update`.
    pub dt: f32,
    pub input: &'a InputIntent,
    /// Yaw-only camera facing; motion input is rotated into this frame.
    pub facing: Quat,
    pub environment: &'a dyn EnvironmentQuery,
    /// The character's rigid body. Absent bodies make motion skip the tick.
    pub body: Option<&'a mut dyn CharacterBody>,
}

impl<'a> Frame<'a> {
    pub fn new(
        dt: f32,
        input: &'a InputIntent,
        facing: Quat,
        environment: &'a dyn EnvironmentQuery,
    ) -> Self {
        Self {
            dt,
            input,
            facing,
            environment,
            body: None,
        }
    }

    pub fn with_body(mut self, body: &'a mut dyn CharacterBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Per-character behavior driven by the host's dispatch loop.
///
/// Per frame the host calls `early_update`, `update`, zero or more `fixed_update`s, then
/// `late_update`. Every callback defaults to a no-op.
pub trait CharacterComponent {
    /// Called once, after the owning character is registered.
    fn initialize(&mut self, _owner: CharacterHandle) {}

    fn owner(&self) -> Option<CharacterHandle> {
        None
    }

    fn early_update(&mut self, _frame: &mut Frame<'_>) {}

    fn update(&mut self, _frame: &mut Frame<'_>) {}

    fn late_update(&mut self, _frame: &mut Frame<'_>) {}

    fn fixed_update(&mut self, _frame: &mut Frame<'_>) {}
}
