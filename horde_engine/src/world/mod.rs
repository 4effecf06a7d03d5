//! World module
//!
//! Entity storage, the hook contract and the five-phase frame loop.

mod camera;
mod context;
mod entity;
mod registry;
mod world;

pub use camera::Camera;
pub use context::FrameContext;
pub use entity::{Body, Entity, EntityFlags, EntityKey, EntityState, NoOpEntity, TextureHandle};
pub use world::{FrameReport, World, WorldDesc};
