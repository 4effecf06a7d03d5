//! Integration tests for the logging system
//!
//! These tests swap the process-wide logger, so every one runs serially.
//!
//! Run with: cargo test --test logging_integration_tests

use horde_engine::horde::log::{self, LogEntry, LogSeverity, Logger};
use horde_engine::horde::spatial::{GridHashDesc, PartitionerDesc, QuadtreeDesc};
use horde_engine::horde::{World, WorldDesc};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install() -> Arc<Mutex<Vec<LogEntry>>> {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);
    entries
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_world_creation_logs_info() {
    let entries = install();

    World::new(WorldDesc::default()).unwrap();

    {
        let entries = entries.lock().unwrap();
        let created = entries
            .iter()
            .find(|e| e.message.contains("World created"))
            .expect("creation message");
        assert_eq!(created.severity, LogSeverity::Info);
        assert_eq!(created.source, "horde::World");
        assert!(created.message.contains("quadtree"));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_invalid_config_logs_error_with_location() {
    let entries = install();

    let desc = WorldDesc {
        partitioner: PartitionerDesc::Quadtree(QuadtreeDesc {
            capacity: 0,
            ..Default::default()
        }),
        ..Default::default()
    };
    let err = World::new(desc).unwrap_err();

    {
        let entries = entries.lock().unwrap();
        let error = entries
            .iter()
            .find(|e| e.severity == LogSeverity::Error)
            .expect("error entry");
        assert_eq!(error.source, "horde::Quadtree");
        assert!(error.file.is_some());
        assert!(error.line.is_some());
        assert!(err.to_string().contains(&error.message));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_partitioner_swap_logs_info() {
    let entries = install();

    let mut world = World::new(WorldDesc::default()).unwrap();
    world
        .set_partitioner(PartitionerDesc::GridHash(GridHashDesc::default()))
        .unwrap();

    {
        let entries = entries.lock().unwrap();
        assert!(entries.iter().any(|e| e.severity == LogSeverity::Info
            && e.message.contains("quadtree")
            && e.message.contains("grid_hash")));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_frame_summary_only_at_trace() {
    let entries = install();

    let mut world = World::new(WorldDesc::default()).unwrap();
    world.advance(0.016);
    assert!(!entries
        .lock()
        .unwrap()
        .iter()
        .any(|e| e.severity == LogSeverity::Trace));

    log::set_min_severity(LogSeverity::Trace);
    world.advance(0.016);
    {
        let entries = entries.lock().unwrap();
        let summary = entries
            .iter()
            .find(|e| e.severity == LogSeverity::Trace)
            .expect("frame summary");
        assert!(summary.message.starts_with("frame 2"));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_filters() {
    let entries = install();
    log::set_min_severity(LogSeverity::Warn);

    World::new(WorldDesc::default()).unwrap();
    assert!(entries.lock().unwrap().is_empty());

    log::reset_logger();
}
