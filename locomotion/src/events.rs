//! Motion events and their observers.
//!
//! Dispatch is synchronous: callbacks run inside the tick that produced the event, in
//! registration order. Every event is also appended to a log the host may drain once per frame.

use std::fmt;

use crate::utils::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    /// A jump fired.
    Jump,
    /// The character touched down after falling at `fall_speed` (m/s, positive).
    Landing { fall_speed: f32 },
    /// The walk cycle crossed the footstep threshold.
    Step,
    /// A stair step was climbed; `offset` is this tick's rise to smooth out visually.
    StairStep { offset: Vec3 },
}

type Callback = Box<dyn FnMut()>;
type LandingCallback = Box<dyn FnMut(f32)>;
type StairCallback = Box<dyn FnMut(Vec3)>;

/// Typed observer lists plus the undrained event log.
#[derive(Default)]
pub struct MotionEvents {
    jump: Vec<Callback>,
    landing: Vec<LandingCallback>,
    step: Vec<Callback>,
    stair_step: Vec<StairCallback>,
    log: Vec<MotionEvent>,
}

impl fmt::Debug for MotionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionEvents")
            .field("jump", &self.jump.len())
            .field("landing", &self.landing.len())
            .field("step", &self.step.len())
            .field("stair_step", &self.stair_step.len())
            .field("log", &self.log)
            .finish()
    }
}

impl MotionEvents {
    pub fn on_jump(&mut self, f: impl FnMut() + 'static) {
        self.jump.push(Box::new(f));
    }

    pub fn on_landing(&mut self, f: impl FnMut(f32) + 'static) {
        self.landing.push(Box::new(f));
    }

    pub fn on_step(&mut self, f: impl FnMut() + 'static) {
        self.step.push(Box::new(f));
    }

    pub fn on_stair_step(&mut self, f: impl FnMut(Vec3) + 'static) {
        self.stair_step.push(Box::new(f));
    }

    /// Notify observers and log the event.
    pub(crate) fn emit(&mut self, event: MotionEvent) {
        match event {
            MotionEvent::Jump => self.jump.iter_mut().for_each(|f| f()),
            MotionEvent::Landing { fall_speed } => {
                self.landing.iter_mut().for_each(|f| f(fall_speed))
            }
            MotionEvent::Step => self.step.iter_mut().for_each(|f| f()),
            MotionEvent::StairStep { offset } => {
                self.stair_step.iter_mut().for_each(|f| f(offset))
            }
        }
        self.log.push(event);
    }

    /// Events emitted since the last drain.
    pub fn pending(&self) -> &[MotionEvent] {
        &self.log
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, MotionEvent> {
        self.log.drain(..)
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
    }
}
