/// Spatial acceleration structures for entity queries.
///
/// A SpatialPartitioner indexes collidable entities by the bounding AABB of
/// their oriented shape. Queries descend with the AABB broad phase and
/// confirm candidates with the exact oriented-box test.
///
/// Ownership: each World owns exactly one partitioner and rebuilds it from
/// scratch every frame (`clear` + `insert` for every live collider).

use glam::Vec2;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::geometry::{OrientedBox, AABB};
use crate::world::EntityKey;
use super::grid_hash::{GridHash, GridHashDesc};
use super::quadtree::{Quadtree, QuadtreeDesc};

/// One indexed entity: its key, true shape and cached bounding box.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub key: EntityKey,
    pub shape: OrientedBox,
    pub bounds: AABB,
}

impl SpatialEntry {
    pub fn new(key: EntityKey, shape: &OrientedBox) -> Self {
        Self {
            key,
            shape: *shape,
            bounds: shape.bounding_aabb(),
        }
    }
}

/// Trait for spatial indexing of collidable entities.
///
/// Results are appended to a set: an entity stored in several cells or
/// leaves is reported once.
pub trait SpatialPartitioner {
    /// Short name used in logs ("quadtree", "grid_hash").
    fn name(&self) -> &'static str;

    /// Index an entity under its current shape.
    fn insert(&mut self, key: EntityKey, shape: &OrientedBox);

    /// Entities whose oriented shape overlaps the circle.
    fn query_circle(&self, position: Vec2, radius: f32, results: &mut FxHashSet<EntityKey>);

    /// Entities whose oriented shape overlaps `shape` (strict SAT).
    fn query_box(&self, shape: &OrientedBox, results: &mut FxHashSet<EntityKey>);

    /// Remove every entry, keeping allocations for the next rebuild.
    fn clear(&mut self);

    /// Number of entities indexed since the last `clear`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which partitioner a World builds, with its tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartitionerDesc {
    Quadtree(QuadtreeDesc),
    GridHash(GridHashDesc),
}

impl Default for PartitionerDesc {
    fn default() -> Self {
        PartitionerDesc::Quadtree(QuadtreeDesc::default())
    }
}

impl PartitionerDesc {
    /// Validate the descriptor and construct the partitioner.
    pub fn build(&self) -> Result<Box<dyn SpatialPartitioner>> {
        Ok(match self {
            PartitionerDesc::Quadtree(desc) => Box::new(Quadtree::new(*desc)?),
            PartitionerDesc::GridHash(desc) => Box::new(GridHash::new(*desc)?),
        })
    }
}
