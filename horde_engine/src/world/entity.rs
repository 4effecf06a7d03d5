/// Entity types: handles, common body data and the behaviour trait.
///
/// The World owns two things per entity: a `Body` (transform and flags the
/// core reads every frame) and a boxed `Entity` (gameplay behaviour, only
/// reached through hooks).

use bitflags::bitflags;
use glam::Vec4;
use slotmap::new_key_type;
use crate::geometry::OrientedBox;
use super::context::FrameContext;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle to an entity within one World.
    ///
    /// A key stays valid until its entity is killed; afterwards every
    /// lookup with it fails and `World::kill` ignores it.
    pub struct EntityKey;
}

// ===== FLAGS =====

bitflags! {
    /// Per-entity participation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntityFlags: u32 {
        /// Drawn by the render layer
        const RENDER     = 1 << 0;
        /// Indexed in the spatial partitioner and dispatched collisions
        const COLLIDER   = 1 << 1;
        /// Projectiles never collide with other projectiles
        const PROJECTILE = 1 << 2;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        EntityFlags::RENDER | EntityFlags::COLLIDER
    }
}

/// Opaque texture id owned by the asset layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Lifecycle of an entity within its World.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Spawn requested, activated at the next spawn resolution
    Pending,
    /// Updated, indexed and collided every frame
    Live,
    /// Killed, or never belonged to this world
    Dead,
}

// ===== BODY =====

/// Data every simulated object carries.
///
/// `texture` and `color` are carried for the render layer and never read by
/// the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub shape: OrientedBox,
    pub texture: Option<TextureHandle>,
    pub color: Vec4,
    pub flags: EntityFlags,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            shape: OrientedBox::default(),
            texture: None,
            color: Vec4::ONE,
            flags: EntityFlags::default(),
        }
    }
}

impl Body {
    /// Rendered collider with the given shape.
    pub fn new(shape: OrientedBox) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn is_collider(&self) -> bool {
        self.flags.contains(EntityFlags::COLLIDER)
    }

    pub fn is_projectile(&self) -> bool {
        self.flags.contains(EntityFlags::PROJECTILE)
    }

    pub fn renders(&self) -> bool {
        self.flags.contains(EntityFlags::RENDER)
    }
}

// ===== BEHAVIOUR =====

/// Gameplay behaviour of a simulated object.
///
/// Every hook defaults to a no-op. Hooks receive the entity's own `Body`
/// mutably and a `FrameContext` for deferred spawns/kills and spatial
/// queries; structural changes take effect at the next resolution phase.
pub trait Entity {
    /// Called once when the entity becomes live, before its first update.
    fn on_spawn(&mut self, _body: &mut Body, _ctx: &mut FrameContext<'_>) {}

    /// Called every frame, in spawn order.
    fn on_update(&mut self, _body: &mut Body, _ctx: &mut FrameContext<'_>, _dt: f32) {}

    /// Called on the querying side of an overlapping pair.
    fn on_collision(
        &mut self,
        _body: &mut Body,
        _other: EntityKey,
        _other_body: &Body,
        _ctx: &mut FrameContext<'_>,
    ) {
    }

    /// Called once when the entity is removed.
    fn on_kill(&mut self, _body: &mut Body, _ctx: &mut FrameContext<'_>) {}
}

/// Entity without behaviour (walls, pickups driven from outside).
pub struct NoOpEntity;

impl Entity for NoOpEntity {}
