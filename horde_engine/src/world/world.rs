/// World — owner of every simulated entity and of the spatial index.
///
/// One call to `advance` runs five phases in a fixed order:
///
/// 1. spawn resolution (`on_spawn`, entity becomes live)
/// 2. update (`on_update` on every live entity, in spawn order)
/// 3. kill resolution (`on_kill`, record removed)
/// 4. spatial rebuild (partitioner cleared, live colliders inserted)
/// 5. collision dispatch (each collider queries with its own shape)
///
/// Spawns and kills requested at any point (from outside or from a hook)
/// are queued and only take effect at the next resolution phase, so the
/// live list never changes while it is being walked.

use std::time::Instant;
use glam::Vec2;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::geometry::OrientedBox;
use crate::profiler::{FramePhase, FrameProfiler, NoOpProfiler};
use crate::spatial::{PartitionerDesc, SpatialPartitioner};
use crate::{sim_info, sim_trace};
use super::camera::Camera;
use super::context::FrameContext;
use super::entity::{Body, Entity, EntityKey, EntityState};
use super::registry::Registry;

const SOURCE: &str = "horde::World";

// ===== DESCRIPTOR =====

/// World creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldDesc {
    pub partitioner: PartitionerDesc,
    pub camera: Camera,
}

/// Counters for one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Frame number (1 for the first `advance`)
    pub frame: u64,
    /// Entities that became live this frame
    pub spawned: usize,
    /// Live entities removed this frame
    pub killed: usize,
    /// `on_collision` calls dispatched
    pub collisions: usize,
    /// Live entities after kill resolution
    pub live: usize,
}

// ===== WORLD =====

pub struct World {
    registry: Registry,
    partitioner: Box<dyn SpatialPartitioner>,
    camera: Camera,
    profiler: Box<dyn FrameProfiler>,
    frame: u64,

    // Scratch buffers reused across frames
    spawn_buffer: Vec<EntityKey>,
    kill_buffer: Vec<EntityKey>,
    live_snapshot: Vec<EntityKey>,
    collider_buffer: Vec<EntityKey>,
    query_scratch: FxHashSet<EntityKey>,
    candidates: Vec<EntityKey>,
}

impl World {
    /// Create an empty world without profiling.
    pub fn new(desc: WorldDesc) -> Result<Self> {
        Self::with_profiler(desc, Box::new(NoOpProfiler))
    }

    /// Create an empty world reporting phase timings to `profiler`.
    pub fn with_profiler(desc: WorldDesc, profiler: Box<dyn FrameProfiler>) -> Result<Self> {
        let partitioner = desc.partitioner.build()?;
        sim_info!(SOURCE, "World created (partitioner: {})", partitioner.name());

        Ok(Self {
            registry: Registry::default(),
            partitioner,
            camera: desc.camera,
            profiler,
            frame: 0,
            spawn_buffer: Vec::new(),
            kill_buffer: Vec::new(),
            live_snapshot: Vec::new(),
            collider_buffer: Vec::new(),
            query_scratch: FxHashSet::default(),
            candidates: Vec::new(),
        })
    }

    // ===== ENTITY API =====

    /// Queue an entity. It stays `Pending` until the next `advance`.
    pub fn spawn<E: Entity + 'static>(&mut self, body: Body, entity: E) -> EntityKey {
        self.registry.spawn(body, Box::new(entity))
    }

    pub fn spawn_boxed(&mut self, body: Body, entity: Box<dyn Entity>) -> EntityKey {
        self.registry.spawn(body, entity)
    }

    /// Queue a kill. Unknown, dead or already-queued keys are ignored.
    pub fn kill(&mut self, key: EntityKey) {
        self.registry.kill(key);
    }

    /// Entities overlapping the circle, as indexed by the last `advance`.
    pub fn query_circle(&self, position: Vec2, radius: f32) -> FxHashSet<EntityKey> {
        let mut results = FxHashSet::default();
        self.partitioner.query_circle(position, radius, &mut results);
        results
    }

    /// Entities overlapping `shape`, as indexed by the last `advance`.
    pub fn query_box(&self, shape: &OrientedBox) -> FxHashSet<EntityKey> {
        let mut results = FxHashSet::default();
        self.partitioner.query_box(shape, &mut results);
        results
    }

    // ===== ACCESSORS =====

    /// Live entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Body)> + '_ {
        self.registry.iter_live()
    }

    pub fn live_keys(&self) -> &[EntityKey] {
        &self.registry.live
    }

    pub fn body(&self, key: EntityKey) -> Option<&Body> {
        self.registry.body(key)
    }

    /// Shape changes are seen by the partitioner at the next rebuild.
    pub fn body_mut(&mut self, key: EntityKey) -> Option<&mut Body> {
        self.registry.body_mut(key)
    }

    pub fn state(&self, key: EntityKey) -> EntityState {
        self.registry.state(key)
    }

    pub fn is_alive(&self, key: EntityKey) -> bool {
        self.state(key) == EntityState::Live
    }

    pub fn live_count(&self) -> usize {
        self.registry.live.len()
    }

    pub fn pending_spawn_count(&self) -> usize {
        self.registry.pending_spawns.len()
    }

    /// Number of completed `advance` calls.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn partitioner(&self) -> &dyn SpatialPartitioner {
        self.partitioner.as_ref()
    }

    /// Replace the spatial index and fill it with the current live colliders.
    ///
    /// On error the previous partitioner stays in place.
    pub fn set_partitioner(&mut self, desc: PartitionerDesc) -> Result<()> {
        let mut partitioner = desc.build()?;
        for (key, body) in self.registry.iter_live() {
            if body.is_collider() {
                partitioner.insert(key, &body.shape);
            }
        }
        sim_info!(
            SOURCE,
            "Partitioner switched from {} to {} ({} entries)",
            self.partitioner.name(),
            partitioner.name(),
            partitioner.len()
        );
        self.partitioner = partitioner;
        Ok(())
    }

    // ===== FRAME =====

    /// Run one simulation step.
    pub fn advance(&mut self, dt: f32) -> FrameReport {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..Default::default()
        };

        let start = Instant::now();
        report.spawned = self.resolve_spawns();
        self.profiler.record(FramePhase::Spawn, start.elapsed());

        let start = Instant::now();
        self.update_live(dt);
        self.profiler.record(FramePhase::Update, start.elapsed());

        let start = Instant::now();
        report.killed = self.resolve_kills();
        self.profiler.record(FramePhase::Kill, start.elapsed());

        let start = Instant::now();
        self.rebuild_index();
        self.profiler.record(FramePhase::Rebuild, start.elapsed());

        let start = Instant::now();
        report.collisions = self.dispatch_collisions();
        self.profiler.record(FramePhase::Collide, start.elapsed());

        report.live = self.registry.live.len();
        self.profiler.end_frame(self.frame);

        sim_trace!(
            SOURCE,
            "frame {}: +{} -{} live {} collisions {}",
            report.frame,
            report.spawned,
            report.killed,
            report.live,
            report.collisions
        );
        report
    }

    fn resolve_spawns(&mut self) -> usize {
        std::mem::swap(&mut self.spawn_buffer, &mut self.registry.pending_spawns);
        let mut spawned = 0;

        for key in self.spawn_buffer.drain(..) {
            if self.registry.state(key) != EntityState::Pending {
                continue;
            }
            dispatch(
                &mut self.registry,
                self.partitioner.as_ref(),
                self.frame,
                key,
                |entity, body, ctx| entity.on_spawn(body, ctx),
            );
            if let Some(record) = self.registry.entities.get_mut(key) {
                record.state = EntityState::Live;
                self.registry.live.push(key);
                spawned += 1;
            }
        }
        spawned
    }

    fn update_live(&mut self, dt: f32) {
        self.live_snapshot.clear();
        self.live_snapshot.extend_from_slice(&self.registry.live);

        for &key in &self.live_snapshot {
            dispatch(
                &mut self.registry,
                self.partitioner.as_ref(),
                self.frame,
                key,
                |entity, body, ctx| entity.on_update(body, ctx, dt),
            );
        }
    }

    fn resolve_kills(&mut self) -> usize {
        std::mem::swap(&mut self.kill_buffer, &mut self.registry.pending_kills);
        let mut killed = 0;

        for key in self.kill_buffer.drain(..) {
            match self.registry.state(key) {
                // Not spawned yet: the request is dropped and the spawn goes ahead
                EntityState::Pending | EntityState::Dead => {}
                EntityState::Live => {
                    if let Some(record) = self.registry.entities.get_mut(key) {
                        record.state = EntityState::Dead;
                    }
                    dispatch(
                        &mut self.registry,
                        self.partitioner.as_ref(),
                        self.frame,
                        key,
                        |entity, body, ctx| entity.on_kill(body, ctx),
                    );
                    self.registry.entities.remove(key);
                    killed += 1;
                }
            }
        }

        if killed > 0 {
            let Registry { entities, live, .. } = &mut self.registry;
            live.retain(|key| entities.contains_key(*key));
        }
        killed
    }

    fn rebuild_index(&mut self) {
        self.partitioner.clear();
        self.collider_buffer.clear();

        for (key, body) in self.registry.iter_live() {
            if body.is_collider() {
                self.partitioner.insert(key, &body.shape);
                self.collider_buffer.push(key);
            }
        }
    }

    fn dispatch_collisions(&mut self) -> usize {
        let mut collisions = 0;

        for i in 0..self.collider_buffer.len() {
            let key = self.collider_buffer[i];
            let Some(body) = self.registry.body(key) else {
                continue;
            };
            let shape = body.shape;

            self.query_scratch.clear();
            self.partitioner.query_box(&shape, &mut self.query_scratch);
            self.candidates.clear();
            self.candidates.extend(self.query_scratch.drain());
            self.candidates.sort_unstable();

            for j in 0..self.candidates.len() {
                let other = self.candidates[j];
                if other == key {
                    continue;
                }
                let (Some(querier), Some(&other_body)) =
                    (self.registry.body(key), self.registry.body(other))
                else {
                    continue;
                };
                if querier.is_projectile() && other_body.is_projectile() {
                    continue;
                }
                dispatch(
                    &mut self.registry,
                    self.partitioner.as_ref(),
                    self.frame,
                    key,
                    |entity, body, ctx| entity.on_collision(body, other, &other_body, ctx),
                );
                collisions += 1;
            }
        }
        collisions
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("frame", &self.frame)
            .field("live", &self.registry.live.len())
            .field("pending_spawns", &self.registry.pending_spawns.len())
            .field("pending_kills", &self.registry.pending_kills.len())
            .field("partitioner", &self.partitioner.name())
            .finish()
    }
}

/// Run one hook of `key` with its behaviour and body taken out of the registry.
///
/// The closure gets a context over the rest of the world; body and behaviour
/// are written back afterwards.
fn dispatch<F>(
    registry: &mut Registry,
    partitioner: &dyn SpatialPartitioner,
    frame: u64,
    key: EntityKey,
    hook: F,
)
where
    F: FnOnce(&mut Box<dyn Entity>, &mut Body, &mut FrameContext<'_>),
{
    let Some(record) = registry.entities.get_mut(key) else {
        return;
    };
    let Some(mut behavior) = record.behavior.take() else {
        return;
    };
    let mut body = record.body;

    {
        let mut ctx = FrameContext::new(registry, partitioner, key, frame);
        hook(&mut behavior, &mut body, &mut ctx);
    }

    if let Some(record) = registry.entities.get_mut(key) {
        record.body = body;
        record.behavior = Some(behavior);
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
