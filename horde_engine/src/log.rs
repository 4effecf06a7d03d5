//! Process-wide log sink for the simulation core
//!
//! Every subsystem reports through the `sim_*!` macros, which forward to one
//! replaceable `Logger`. Entries below the current threshold are dropped
//! before their message is formatted, so per-frame TRACE output costs a
//! single comparison when disabled. ERROR entries carry the call site.

use chrono::{DateTime, Local};
use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

/// Destination for log entries.
///
/// Install one with `set_logger` to send output to a file, an in-game
/// console or a test buffer.
///
/// # Example
///
/// ```no_run
/// use horde_engine::horde::log::{Logger, LogEntry};
///
/// struct ConsoleOverlay;
///
/// impl Logger for ConsoleOverlay {
///     fn log(&self, entry: &LogEntry) {
///         // push into the in-game console...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One message as handed to the active logger.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting subsystem, e.g. "horde::World"
    pub source: String,
    pub message: String,
    /// Call site, present on entries built by `sim_error!` / `sim_err!`
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

/// Ordered from most verbose to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Frame summaries; below the default threshold
    Trace,
    /// Pool growth and other tuning hints
    Debug,
    /// World creation, partitioner swaps
    Info,
    Warn,
    /// Rejected configuration
    Error,
}

/// Prints one colored line per entry to stdout.
///
/// `[2024-01-01 12:00:00.000] [INFO ] [horde::World] message`, with
/// ` (file:line)` appended when the entry has a call site.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let local: DateTime<Local> = entry.timestamp.into();
        let label = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };
        let site = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            local.format("%Y-%m-%d %H:%M:%S%.3f"),
            label,
            entry.source.bright_blue(),
            entry.message,
            site
        );
    }
}

// ===== GLOBAL REGISTRY =====

struct LoggerState {
    logger: Box<dyn Logger>,
    min_severity: LogSeverity,
}

static LOGGER: OnceLock<RwLock<LoggerState>> = OnceLock::new();

fn state() -> &'static RwLock<LoggerState> {
    LOGGER.get_or_init(|| {
        RwLock::new(LoggerState {
            logger: Box::new(DefaultLogger),
            min_severity: LogSeverity::Info,
        })
    })
}

/// Replace the active logger.
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut lock) = state().write() {
        lock.logger = Box::new(logger);
    }
}

/// Restore `DefaultLogger` and the default `Info` threshold.
pub fn reset_logger() {
    if let Ok(mut lock) = state().write() {
        lock.logger = Box::new(DefaultLogger);
        lock.min_severity = LogSeverity::Info;
    }
}

/// Drop every entry below `severity`.
pub fn set_min_severity(severity: LogSeverity) {
    if let Ok(mut lock) = state().write() {
        lock.min_severity = severity;
    }
}

/// Current minimum severity.
pub fn min_severity() -> LogSeverity {
    state()
        .read()
        .map(|lock| lock.min_severity)
        .unwrap_or(LogSeverity::Info)
}

/// Whether an entry of `severity` would reach the logger.
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Log without file:line (used by `sim_trace!` .. `sim_warn!`).
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None, None);
}

/// Log with file:line (used by `sim_error!` and `sim_err!`).
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some(file), Some(line));
}

fn dispatch(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: Option<&'static str>,
    line: Option<u32>,
) {
    if let Ok(lock) = state().read() {
        if severity < lock.min_severity {
            return;
        }
        lock.logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file,
            line,
        });
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (per-frame detail)
///
/// ```ignore
/// sim_trace!("horde::World", "frame {} done", frame);
/// ```
#[macro_export]
macro_rules! sim_trace {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Trace) {
            $crate::log::log($crate::log::LogSeverity::Trace, $source, format!($($arg)*))
        }
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! sim_debug {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Debug) {
            $crate::log::log($crate::log::LogSeverity::Debug, $source, format!($($arg)*))
        }
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! sim_info {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Info) {
            $crate::log::log($crate::log::LogSeverity::Info, $source, format!($($arg)*))
        }
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! sim_warn {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::log::LogSeverity::Warn) {
            $crate::log::log($crate::log::LogSeverity::Warn, $source, format!($($arg)*))
        }
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! sim_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
