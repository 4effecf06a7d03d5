/*!
# Horde Engine

Real-time 2D entity simulation core for games with large numbers of moving
objects.

The crate owns the per-frame update loop, an adaptive spatial index and the
broad/narrow-phase collision pipeline built on top of it. Rendering, input,
assets and gameplay behaviours live outside and drive the core through
`World` (spawn, kill, query, advance, iterate).

## Architecture

- **World**: entity storage and the five-phase frame loop
- **Entity**: behaviour trait with spawn/update/collision/kill hooks
- **SpatialPartitioner**: broad-phase index trait (`Quadtree`, `GridHash`)
- **OrientedBox / AABB**: shapes and exact intersection tests
- **FrameProfiler**: per-phase timing sink injected into the World
*/

// Internal modules
mod error;
pub mod log;
pub mod geometry;
pub mod spatial;
pub mod world;
pub mod profiler;

// Main horde namespace module
pub mod horde {
    // Error types
    pub use crate::error::{Error, Result};

    // World and entity contract
    pub use crate::world::{
        Body, Camera, Entity, EntityFlags, EntityKey, EntityState, FrameContext, FrameReport,
        NoOpEntity, TextureHandle, World, WorldDesc,
    };

    // Query result set
    pub use rustc_hash::FxHashSet;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            reset_logger, set_logger, set_min_severity, DefaultLogger, LogEntry, LogSeverity,
            Logger,
        };
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Spatial partitioning sub-module
    pub mod spatial {
        pub use crate::spatial::*;
    }

    // Profiling sub-module
    pub mod profiler {
        pub use crate::profiler::*;
    }
}

// Re-export math library at crate root
pub use glam;
