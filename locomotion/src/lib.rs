//! Character locomotion: a per-character motion resolver driven by input intent and
//! environment casts, writing velocity to a host-owned rigid body.

pub mod bitmask_flags;
pub mod component;
pub mod config;
pub mod constants;
pub mod environment;
pub mod events;
pub mod input;
pub mod motion;
pub mod owner;
pub mod rapier_world;
pub mod utils;

#[cfg(test)]
mod testing;

pub use component::{CharacterComponent, Frame};
pub use config::{
    AntiStuckConfig, CapsuleSpec, ConfigError, CrouchMode, Integrator, JumpMode,
    LocomotionConfig, SlopeConfig, SprintMode,
};
pub use environment::{BodyKind, CharacterBody, EmptyEnvironment, EnvironmentQuery, QueryHit};
pub use events::{MotionEvent, MotionEvents};
pub use input::{ButtonLatch, ButtonState, InputIntent};
pub use motion::{LocomotionState, MotionFlag, MotionResolver};
pub use owner::{CharacterHandle, CharacterRegistry};
pub use rapier_world::{
    ColliderShapeDef, RapierBody, RapierEnvironment, RapierQueryWorld, WorldBodyDef,
};
pub use utils::{Quat, Vec3};
