//! Unit tests for error.rs

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_config_display() {
    let err = Error::InvalidConfig("capacity must be > 0".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid configuration"));
    assert!(display.contains("capacity must be > 0"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidConfig("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_debug() {
    let err = Error::InvalidConfig("a".to_string());
    let copy = err.clone();
    assert_eq!(format!("{}", err), format!("{}", copy));
    assert!(format!("{:?}", copy).contains("InvalidConfig"));
}

// ============================================================================
// MACRO
// ============================================================================

#[test]
fn test_sim_err_builds_invalid_config() {
    let Error::InvalidConfig(msg) = crate::sim_err!("horde::test", "depth {} too small", 0);
    assert_eq!(msg, "depth 0 too small");
}

#[test]
fn test_result_alias_propagates() {
    fn fails() -> Result<u32> {
        Err(Error::InvalidConfig("nope".to_string()))
    }
    fn outer() -> Result<u32> {
        let v = fails()?;
        Ok(v + 1)
    }
    assert!(outer().is_err());
}
