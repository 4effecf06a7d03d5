//! Error types for the Horde engine
//!
//! The simulation core has a very small failure surface: descriptors are
//! validated when a structure is built, everything after that is infallible.

use std::fmt;

/// Result type for Horde engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Horde engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A descriptor was rejected at construction (depth, capacity, bounds, cell size)
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an `Error::InvalidConfig`, logging it at ERROR with file:line first.
///
/// # Example
///
/// ```ignore
/// return Err(sim_err!("horde::Quadtree", "capacity must be > 0 (got {})", capacity));
/// ```
#[macro_export]
macro_rules! sim_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!(),
        );
        $crate::horde::Error::InvalidConfig(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
