/// Quadtree — pooled, depth-bounded spatial index rebuilt every frame.
///
/// Nodes live in a flat pool and reference their children by index: the
/// four children of a split node occupy four consecutive slots starting at
/// `first_child`, and `NO_CHILD` marks a leaf. `clear()` only resets the
/// high-water mark, so a frame that needs no more nodes than the previous
/// peak performs no allocation.
///
/// Placement: an entry is copied into every leaf its bounding AABB
/// overlaps, so boundary-straddling entities are found from any side.
/// Queries deduplicate through the result set.
///
/// Split policy: a leaf at or above `capacity` splits into four quadrants
/// and hands its whole bucket down. Nodes at `max_depth` never split and
/// accept any number of entries.

use glam::Vec2;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::geometry::{OrientedBox, AABB};
use crate::world::EntityKey;
use crate::{sim_debug, sim_err};
use super::partitioner::{SpatialEntry, SpatialPartitioner};

/// Sentinel child index for leaf nodes.
pub const NO_CHILD: u32 = u32::MAX;

/// Index of the root node in the pool.
const ROOT: usize = 0;

/// Quadtree construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeDesc {
    /// Region covered by the root node. Entities entirely outside are not indexed.
    pub bounds: AABB,
    /// Maximum depth (root = 0). Must be at least 1.
    pub max_depth: u32,
    /// Bucket size that triggers a split. Must be at least 1.
    pub capacity: usize,
}

impl Default for QuadtreeDesc {
    fn default() -> Self {
        Self {
            bounds: AABB::new(Vec2::ZERO, Vec2::splat(4096.0)),
            max_depth: 6,
            capacity: 8,
        }
    }
}

impl QuadtreeDesc {
    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(sim_err!("horde::Quadtree", "max_depth must be at least 1"));
        }
        if self.capacity == 0 {
            return Err(sim_err!("horde::Quadtree", "capacity must be at least 1"));
        }
        if !self.bounds.is_finite() || self.bounds.size.x <= 0.0 || self.bounds.size.y <= 0.0 {
            return Err(sim_err!(
                "horde::Quadtree",
                "bounds must be finite with a positive size (got {:?})",
                self.bounds
            ));
        }
        Ok(())
    }
}

/// Snapshot of the tree shape, for profiling overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    /// Nodes reachable from the root this frame
    pub node_count: usize,
    pub leaf_count: usize,
    /// Bucket entries, counting duplicates across leaves
    pub entry_count: usize,
    pub max_depth_reached: u32,
    /// Slots allocated in the pool (peak over the tree's lifetime)
    pub pool_capacity: usize,
}

/// A single node in the pool.
struct QuadNode {
    region: AABB,
    depth: u32,
    /// First of four consecutive children, or NO_CHILD
    first_child: u32,
    bucket: Vec<SpatialEntry>,
}

impl QuadNode {
    fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILD
    }

    fn children(&self) -> std::ops::Range<usize> {
        let first = self.first_child as usize;
        first..first + 4
    }
}

/// Depth-bounded quadtree over a fixed world region.
pub struct Quadtree {
    desc: QuadtreeDesc,
    /// Node pool; only `nodes[..used]` belongs to the current tree
    nodes: Vec<QuadNode>,
    used: usize,
    /// Largest `used` seen at a clear, for pool growth logging
    peak_used: usize,
    inserted: usize,
}

impl Quadtree {
    /// Create an empty tree. Fails if the descriptor is unusable.
    pub fn new(desc: QuadtreeDesc) -> Result<Self> {
        desc.validate()?;

        let mut tree = Self {
            desc,
            nodes: Vec::new(),
            used: 0,
            peak_used: 0,
            inserted: 0,
        };
        tree.alloc_node(desc.bounds, 0);
        Ok(tree)
    }

    pub fn desc(&self) -> &QuadtreeDesc {
        &self.desc
    }

    pub fn bounds(&self) -> &AABB {
        &self.desc.bounds
    }

    /// Take the next pool slot, reusing a previous frame's node when one exists.
    fn alloc_node(&mut self, region: AABB, depth: u32) -> usize {
        let index = self.used;
        self.used += 1;

        if let Some(node) = self.nodes.get_mut(index) {
            node.region = region;
            node.depth = depth;
            node.first_child = NO_CHILD;
            node.bucket.clear();
        } else {
            self.nodes.push(QuadNode {
                region,
                depth,
                first_child: NO_CHILD,
                bucket: Vec::new(),
            });
        }
        index
    }

    /// Turn a leaf into a routing node with four quadrant children.
    fn split(&mut self, node_idx: usize) {
        let region = self.nodes[node_idx].region;
        let depth = self.nodes[node_idx].depth + 1;

        let first_child = self.alloc_node(region.quadrant(0), depth);
        for quadrant in 1..4 {
            self.alloc_node(region.quadrant(quadrant), depth);
        }
        self.nodes[node_idx].first_child = first_child as u32;
    }

    fn insert_recursive(&mut self, node_idx: usize, entry: SpatialEntry) {
        let node = &self.nodes[node_idx];

        if node.depth >= self.desc.max_depth {
            self.nodes[node_idx].bucket.push(entry);
            return;
        }

        if !entry.bounds.intersects_aabb(&node.region) {
            return;
        }

        if !node.is_leaf() {
            let children = node.children();
            self.insert_into_children(children, entry);
            return;
        }

        if node.bucket.len() >= self.desc.capacity {
            self.split(node_idx);
            let children = self.nodes[node_idx].children();

            let mut bucket = std::mem::take(&mut self.nodes[node_idx].bucket);
            for existing in bucket.drain(..) {
                self.insert_into_children(children.clone(), existing);
            }
            self.insert_into_children(children, entry);
            // Hand the emptied buffer back so the slot keeps its allocation
            self.nodes[node_idx].bucket = bucket;
            return;
        }

        self.nodes[node_idx].bucket.push(entry);
    }

    /// Copy the entry into every child whose region it overlaps.
    fn insert_into_children(&mut self, children: std::ops::Range<usize>, entry: SpatialEntry) {
        for child in children {
            if entry.bounds.intersects_aabb(&self.nodes[child].region) {
                self.insert_recursive(child, entry);
            }
        }
    }

    /// Visit every leaf overlapping `bounds`, testing entries with `matches`.
    fn query_recursive<F>(
        &self,
        node_idx: usize,
        bounds: &AABB,
        matches: &F,
        results: &mut FxHashSet<EntityKey>,
    ) where
        F: Fn(&SpatialEntry) -> bool,
    {
        let node = &self.nodes[node_idx];
        if !node.region.intersects_aabb(bounds) {
            return;
        }

        if node.is_leaf() {
            for entry in &node.bucket {
                if entry.bounds.intersects_aabb(bounds) && matches(entry) {
                    results.insert(entry.key);
                }
            }
            return;
        }

        for child in node.children() {
            self.query_recursive(child, bounds, matches, results);
        }
    }

    /// Shape of the current tree.
    pub fn stats(&self) -> QuadtreeStats {
        let mut stats = QuadtreeStats {
            pool_capacity: self.nodes.len(),
            ..Default::default()
        };
        let mut stack = vec![ROOT];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            stats.node_count += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(node.depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
                stats.entry_count += node.bucket.len();
            } else {
                stack.extend(node.children());
            }
        }
        stats
    }

    /// Regions of every current leaf (debug-draw overlay).
    pub fn leaf_regions(&self) -> Vec<AABB> {
        let mut regions = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                regions.push(node.region);
            } else {
                stack.extend(node.children());
            }
        }
        regions
    }
}

// ===== SPATIAL PARTITIONER TRAIT =====

impl SpatialPartitioner for Quadtree {
    fn name(&self) -> &'static str {
        "quadtree"
    }

    fn insert(&mut self, key: EntityKey, shape: &OrientedBox) {
        let entry = SpatialEntry::new(key, shape);
        if entry.bounds.intersects_aabb(&self.nodes[ROOT].region) {
            self.inserted += 1;
        }
        self.insert_recursive(ROOT, entry);
    }

    fn query_circle(&self, position: Vec2, radius: f32, results: &mut FxHashSet<EntityKey>) {
        let bounds = AABB::from_circle(position, radius);
        self.query_recursive(
            ROOT,
            &bounds,
            &|entry: &SpatialEntry| entry.shape.intersects_circle(position, radius),
            results,
        );
    }

    fn query_box(&self, shape: &OrientedBox, results: &mut FxHashSet<EntityKey>) {
        let bounds = shape.bounding_aabb();
        self.query_recursive(
            ROOT,
            &bounds,
            &|entry: &SpatialEntry| shape.intersects_box(&entry.shape),
            results,
        );
    }

    fn clear(&mut self) {
        if self.used > self.peak_used {
            self.peak_used = self.used;
            sim_debug!(
                "horde::Quadtree",
                "Node pool grew to {} slots",
                self.nodes.len()
            );
        }

        self.used = 0;
        self.inserted = 0;
        self.alloc_node(self.desc.bounds, 0);
    }

    fn len(&self) -> usize {
        self.inserted
    }
}

#[cfg(test)]
#[path = "quadtree_tests.rs"]
mod tests;
