//! Spatial partitioning module
//!
//! Broad-phase indexes for collision detection and gameplay queries:
//! a pooled quadtree (default) and a uniform grid hash.

mod partitioner;
mod quadtree;
mod grid_hash;

pub use partitioner::{PartitionerDesc, SpatialEntry, SpatialPartitioner};
pub use quadtree::{Quadtree, QuadtreeDesc, QuadtreeStats, NO_CHILD};
pub use grid_hash::{GridHash, GridHashDesc};
