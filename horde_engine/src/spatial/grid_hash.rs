/// GridHash — uniform grid folded into a fixed number of hash buckets.
///
/// The plane is cut into square cells of `cell_size`. Cell `(cx, cy)` maps
/// to bucket `hash(cx, cy) mod bucket_count`, so the grid is unbounded
/// while memory stays fixed; unrelated cells may share a bucket, which the
/// narrow phase filters out.
///
/// Cost is proportional to the population of the hottest cell, regardless
/// of global density. The quadtree adapts better to clustered scenes; this
/// is the simpler fallback.

use glam::Vec2;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::geometry::{OrientedBox, AABB};
use crate::world::EntityKey;
use crate::sim_err;
use super::partitioner::{SpatialEntry, SpatialPartitioner};

/// Large primes for the (cx, cy) spatial hash.
const HASH_PRIME_X: i32 = 73_856_093;
const HASH_PRIME_Y: i32 = 19_349_663;

/// Grid hash construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHashDesc {
    /// Edge length of one cell, in world units
    pub cell_size: f32,
    /// Number of hash buckets
    pub bucket_count: usize,
}

impl Default for GridHashDesc {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            bucket_count: 1024,
        }
    }
}

impl GridHashDesc {
    fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(sim_err!(
                "horde::GridHash",
                "cell_size must be finite and positive (got {})",
                self.cell_size
            ));
        }
        if self.bucket_count == 0 || self.bucket_count > i32::MAX as usize {
            return Err(sim_err!(
                "horde::GridHash",
                "bucket_count must be in 1..={} (got {})",
                i32::MAX,
                self.bucket_count
            ));
        }
        Ok(())
    }
}

/// Inclusive cell rectangle covered by an AABB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    min: (i32, i32),
    max: (i32, i32),
}

impl CellSpan {
    fn cell_count(&self) -> i64 {
        let w = self.max.0 as i64 - self.min.0 as i64 + 1;
        let h = self.max.1 as i64 - self.min.1 as i64 + 1;
        w * h
    }
}

/// Spatial hash over an unbounded uniform grid.
pub struct GridHash {
    desc: GridHashDesc,
    buckets: Vec<Vec<SpatialEntry>>,
    inserted: usize,
}

impl GridHash {
    pub fn new(desc: GridHashDesc) -> Result<Self> {
        desc.validate()?;
        Ok(Self {
            desc,
            buckets: (0..desc.bucket_count).map(|_| Vec::new()).collect(),
            inserted: 0,
        })
    }

    pub fn desc(&self) -> &GridHashDesc {
        &self.desc
    }

    /// Cell containing a world coordinate (saturates far outside the i32 range).
    fn cell(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.desc.cell_size).floor() as i32,
            (point.y / self.desc.cell_size).floor() as i32,
        )
    }

    fn span(&self, bounds: &AABB) -> CellSpan {
        CellSpan {
            min: self.cell(bounds.min()),
            max: self.cell(bounds.max()),
        }
    }

    /// Bucket index of a cell.
    fn bucket_index(&self, cx: i32, cy: i32) -> usize {
        let hash = cx.wrapping_mul(HASH_PRIME_X) ^ cy.wrapping_mul(HASH_PRIME_Y);
        // `%` keeps the sign of a negative hash; rem_euclid folds it back into range
        hash.rem_euclid(self.buckets.len() as i32) as usize
    }

    /// Call `visit` with the bucket of every cell in the span.
    ///
    /// A span of more cells than buckets touches every bucket anyway, so it
    /// is replaced by one pass over all buckets.
    fn for_each_bucket<F: FnMut(usize)>(&self, span: CellSpan, mut visit: F) {
        if span.cell_count() > self.buckets.len() as i64 {
            (0..self.buckets.len()).for_each(visit);
            return;
        }
        for cy in span.min.1..=span.max.1 {
            for cx in span.min.0..=span.max.0 {
                visit(self.bucket_index(cx, cy));
            }
        }
    }

    fn query<F>(&self, bounds: &AABB, matches: F, results: &mut FxHashSet<EntityKey>)
    where
        F: Fn(&SpatialEntry) -> bool,
    {
        if !bounds.is_finite() {
            return;
        }
        self.for_each_bucket(self.span(bounds), |bucket| {
            for entry in &self.buckets[bucket] {
                if entry.bounds.intersects_aabb(bounds) && matches(entry) {
                    results.insert(entry.key);
                }
            }
        });
    }

    /// Number of non-empty buckets (load diagnostics).
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }
}

// ===== SPATIAL PARTITIONER TRAIT =====

impl SpatialPartitioner for GridHash {
    fn name(&self) -> &'static str {
        "grid_hash"
    }

    fn insert(&mut self, key: EntityKey, shape: &OrientedBox) {
        let entry = SpatialEntry::new(key, shape);
        if !entry.bounds.is_finite() {
            return;
        }

        let mut targets = Vec::new();
        self.for_each_bucket(self.span(&entry.bounds), |bucket| targets.push(bucket));

        for bucket in targets {
            let slot = &mut self.buckets[bucket];
            // Neighbouring cells that hash together would add the same entry twice in a row
            if slot.last().map(|e| e.key) != Some(key) {
                slot.push(entry);
            }
        }
        self.inserted += 1;
    }

    fn query_circle(&self, position: Vec2, radius: f32, results: &mut FxHashSet<EntityKey>) {
        let bounds = AABB::from_circle(position, radius);
        self.query(&bounds, |entry| entry.shape.intersects_circle(position, radius), results);
    }

    fn query_box(&self, shape: &OrientedBox, results: &mut FxHashSet<EntityKey>) {
        let bounds = shape.bounding_aabb();
        self.query(&bounds, |entry| shape.intersects_box(&entry.shape), results);
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.inserted = 0;
    }

    fn len(&self) -> usize {
        self.inserted
    }
}

#[cfg(test)]
#[path = "grid_hash_tests.rs"]
mod tests;
