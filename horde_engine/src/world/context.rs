/// FrameContext — what an entity hook may touch.
///
/// Spawns and kills are deferred exactly like the World's own API. Spatial
/// queries read the index built at the end of the previous frame during
/// spawn/update/kill hooks, and the current frame's index during collision
/// hooks.

use glam::Vec2;
use rustc_hash::FxHashSet;
use crate::geometry::OrientedBox;
use crate::spatial::SpatialPartitioner;
use super::entity::{Body, Entity, EntityKey, EntityState};
use super::registry::Registry;

pub struct FrameContext<'a> {
    registry: &'a mut Registry,
    partitioner: &'a dyn SpatialPartitioner,
    current: EntityKey,
    frame: u64,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        registry: &'a mut Registry,
        partitioner: &'a dyn SpatialPartitioner,
        current: EntityKey,
        frame: u64,
    ) -> Self {
        Self {
            registry,
            partitioner,
            current,
            frame,
        }
    }

    /// Key of the entity whose hook is running.
    pub fn current(&self) -> EntityKey {
        self.current
    }

    /// Frame number of the running `World::advance` call.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Queue a spawn; the entity becomes live at the next frame's spawn phase.
    pub fn spawn<E: Entity + 'static>(&mut self, body: Body, entity: E) -> EntityKey {
        self.registry.spawn(body, Box::new(entity))
    }

    /// Queue a kill for any entity of this world.
    pub fn kill(&mut self, key: EntityKey) {
        self.registry.kill(key);
    }

    pub fn kill_self(&mut self) {
        self.registry.kill(self.current);
    }

    pub fn state(&self, key: EntityKey) -> EntityState {
        self.registry.state(key)
    }

    /// Body of another entity.
    ///
    /// The running entity's own stored body is stale while its hook runs;
    /// use the `body` argument of the hook instead.
    pub fn body(&self, key: EntityKey) -> Option<&Body> {
        self.registry.body(key)
    }

    pub fn live_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.registry.live.iter().copied()
    }

    pub fn query_circle(&self, position: Vec2, radius: f32) -> FxHashSet<EntityKey> {
        let mut results = FxHashSet::default();
        self.partitioner.query_circle(position, radius, &mut results);
        results
    }

    pub fn query_box(&self, shape: &OrientedBox) -> FxHashSet<EntityKey> {
        let mut results = FxHashSet::default();
        self.partitioner.query_box(shape, &mut results);
        results
    }
}
