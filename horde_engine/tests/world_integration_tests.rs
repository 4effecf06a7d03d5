//! Integration tests for the World frame loop
//!
//! Drives the public `horde` namespace only: spawning, hooks, collision
//! dispatch against both partitioners, and queries between frames.
//!
//! Run with: cargo test --test world_integration_tests

use horde_engine::glam::Vec2;
use horde_engine::horde::geometry::OrientedBox;
use horde_engine::horde::profiler::{FramePhase, PhaseTimings};
use horde_engine::horde::spatial::{GridHashDesc, PartitionerDesc, QuadtreeDesc};
use horde_engine::horde::{
    Body, Entity, EntityFlags, EntityKey, EntityState, FrameContext, NoOpEntity, World, WorldDesc,
};
use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// HELPERS
// ============================================================================

/// Deterministic position source (xorshift32)
struct Rng(u32);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 % 10_000) as f32 / 10_000.0
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Counts collision callbacks it receives.
struct Counter {
    hits: Rc<RefCell<Vec<EntityKey>>>,
}

impl Entity for Counter {
    fn on_collision(
        &mut self,
        _body: &mut Body,
        other: EntityKey,
        _other_body: &Body,
        _ctx: &mut FrameContext<'_>,
    ) {
        self.hits.borrow_mut().push(other);
    }
}

fn boxed(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> Body {
    Body::new(OrientedBox::new(Vec2::new(x, y), Vec2::new(w, h)).with_rotation(rotation))
}

/// Overlapping ordered pairs among live colliders, skipping projectile pairs.
fn brute_force_collisions(world: &World) -> usize {
    let colliders: Vec<(EntityKey, Body)> = world
        .iter()
        .filter(|(_, body)| body.is_collider())
        .map(|(key, body)| (key, *body))
        .collect();

    let mut count = 0;
    for (a_key, a) in &colliders {
        for (b_key, b) in &colliders {
            if a_key == b_key || (a.is_projectile() && b.is_projectile()) {
                continue;
            }
            if a.shape.intersects_box(&b.shape) {
                count += 1;
            }
        }
    }
    count
}

fn populate(world: &mut World, seed: u32, count: usize) {
    let mut rng = Rng(seed);
    for i in 0..count {
        let mut body = boxed(
            rng.range(-800.0, 800.0),
            rng.range(-800.0, 800.0),
            rng.range(4.0, 60.0),
            rng.range(4.0, 60.0),
            rng.range(0.0, std::f32::consts::TAU),
        );
        if i % 3 == 0 {
            body = body.with_flags(EntityFlags::RENDER | EntityFlags::COLLIDER | EntityFlags::PROJECTILE);
        }
        if i % 11 == 0 {
            body = body.with_flags(EntityFlags::RENDER);
        }
        world.spawn(body, NoOpEntity);
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_integration_pair_and_isolated_entity() {
    let a_hits = Rc::new(RefCell::new(Vec::new()));
    let b_hits = Rc::new(RefCell::new(Vec::new()));
    let c_hits = Rc::new(RefCell::new(Vec::new()));

    let mut world = World::new(WorldDesc::default()).unwrap();
    let a = world.spawn(boxed(0.0, 0.0, 10.0, 10.0, 0.0), Counter { hits: a_hits.clone() });
    let b = world.spawn(boxed(5.0, 0.0, 10.0, 10.0, 0.0), Counter { hits: b_hits.clone() });
    world.spawn(boxed(100.0, 100.0, 10.0, 10.0, 0.0), Counter { hits: c_hits.clone() });

    let report = world.advance(1.0 / 60.0);

    assert_eq!(report.collisions, 2);
    assert_eq!(*a_hits.borrow(), vec![b]);
    assert_eq!(*b_hits.borrow(), vec![a]);
    assert!(c_hits.borrow().is_empty());
}

#[test]
fn test_integration_quadtree_matches_brute_force() {
    let mut world = World::new(WorldDesc::default()).unwrap();
    populate(&mut world, 0x1234_5678, 400);

    let report = world.advance(1.0 / 60.0);
    assert_eq!(report.live, 400);
    assert_eq!(report.collisions, brute_force_collisions(&world));
}

#[test]
fn test_integration_grid_hash_matches_brute_force() {
    let desc = WorldDesc {
        partitioner: PartitionerDesc::GridHash(GridHashDesc {
            cell_size: 32.0,
            bucket_count: 64,
        }),
        ..Default::default()
    };
    let mut world = World::new(desc).unwrap();
    populate(&mut world, 0x0bad_cafe, 400);

    let report = world.advance(1.0 / 60.0);
    assert_eq!(report.collisions, brute_force_collisions(&world));
}

#[test]
fn test_integration_partitioners_agree_on_queries() {
    let mut quad_world = World::new(WorldDesc {
        partitioner: PartitionerDesc::Quadtree(QuadtreeDesc {
            max_depth: 4,
            capacity: 3,
            ..Default::default()
        }),
        ..Default::default()
    })
    .unwrap();
    populate(&mut quad_world, 42, 250);
    quad_world.advance(1.0 / 60.0);

    let mut grid_world = World::new(WorldDesc {
        partitioner: PartitionerDesc::GridHash(GridHashDesc::default()),
        ..Default::default()
    })
    .unwrap();
    populate(&mut grid_world, 42, 250);
    grid_world.advance(1.0 / 60.0);

    // Same seed and spawn order give the same keys in both worlds
    let mut rng = Rng(7);
    for _ in 0..50 {
        let center = Vec2::new(rng.range(-900.0, 900.0), rng.range(-900.0, 900.0));
        let radius = rng.range(1.0, 150.0);
        assert_eq!(
            quad_world.query_circle(center, radius),
            grid_world.query_circle(center, radius)
        );

        let probe = OrientedBox::new(center, Vec2::new(radius, radius * 0.5)).with_rotation(radius);
        assert_eq!(quad_world.query_box(&probe), grid_world.query_box(&probe));
    }
}

// ============================================================================
// GAMEPLAY LOOP
// ============================================================================

/// Moves right and dies on the first hit.
struct Bullet {
    speed: f32,
}

impl Entity for Bullet {
    fn on_update(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>, dt: f32) {
        body.shape.position.x += self.speed * dt;
        if body.shape.position.x > 500.0 {
            ctx.kill_self();
        }
    }

    fn on_collision(
        &mut self,
        _body: &mut Body,
        other: EntityKey,
        other_body: &Body,
        ctx: &mut FrameContext<'_>,
    ) {
        if !other_body.is_projectile() {
            ctx.kill(other);
            ctx.kill_self();
        }
    }
}

/// Fires one bullet every `period` frames.
struct Turret {
    period: u64,
    fired: Rc<RefCell<Vec<EntityKey>>>,
}

impl Entity for Turret {
    fn on_update(&mut self, body: &mut Body, ctx: &mut FrameContext<'_>, _dt: f32) {
        if ctx.frame() % self.period == 0 {
            let shape = OrientedBox::new(body.shape.position, Vec2::splat(2.0));
            let bullet = ctx.spawn(
                Body::new(shape).with_flags(EntityFlags::COLLIDER | EntityFlags::PROJECTILE),
                Bullet { speed: 600.0 },
            );
            self.fired.borrow_mut().push(bullet);
        }
    }
}

#[test]
fn test_integration_turret_clears_targets() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new(WorldDesc::default()).unwrap();
    world.spawn(
        Body::new(OrientedBox::new(Vec2::new(-400.0, 0.0), Vec2::splat(8.0)))
            .with_flags(EntityFlags::RENDER),
        Turret {
            period: 5,
            fired: fired.clone(),
        },
    );
    let targets: Vec<EntityKey> = (0..3)
        .map(|i| world.spawn(boxed(100.0 + i as f32 * 100.0, 0.0, 20.0, 20.0, 0.0), NoOpEntity))
        .collect();

    for _ in 0..240 {
        world.advance(1.0 / 60.0);
    }

    for target in &targets {
        assert_eq!(world.state(*target), EntityState::Dead);
    }
    assert!(!fired.borrow().is_empty());
    // Bullets pass each other without interacting and die on hit or off-screen
    for bullet in fired.borrow().iter().take(10) {
        assert_eq!(world.state(*bullet), EntityState::Dead);
    }
    assert_eq!(world.frame(), 240);
}

#[test]
fn test_integration_profiled_world() {
    let timings = Rc::new(RefCell::new(PhaseTimings::new()));
    let mut world = World::with_profiler(WorldDesc::default(), Box::new(timings.clone())).unwrap();
    populate(&mut world, 99, 100);

    for _ in 0..10 {
        world.advance(1.0 / 60.0);
    }

    let timings = timings.borrow();
    assert_eq!(timings.frames(), 10);
    let total: std::time::Duration = FramePhase::ALL.iter().map(|p| timings.total(*p)).sum();
    assert!(total >= timings.last_frame_total());
}
