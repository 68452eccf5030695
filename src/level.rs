//! Engine log severity levels.

use serde::Serialize;
use std::fmt;

/// Severity of a log line emitted by the engine.
///
/// Values mirror the engine's native severity ladder. `Stderr` is the
/// synthetic level the engine uses for output written directly to its
/// standard error stream; it is forwarded regardless of the active
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Stderr,
    Quiet,
    Panic,
    Fatal,
    Error,
    Warning,
    Info,
    Verbose,
    Debug,
    Trace,
}

impl Level {
    /// The raw numeric value the engine reports for this level.
    pub fn value(self) -> i32 {
        match self {
            Level::Stderr => -16,
            Level::Quiet => -8,
            Level::Panic => 0,
            Level::Fatal => 8,
            Level::Error => 16,
            Level::Warning => 24,
            Level::Info => 32,
            Level::Verbose => 40,
            Level::Debug => 48,
            Level::Trace => 56,
        }
    }

    /// Map a raw engine value back to a level. Unknown values are
    /// treated as the most verbose level.
    pub fn from_value(value: i32) -> Level {
        match value {
            -16 => Level::Stderr,
            -8 => Level::Quiet,
            0 => Level::Panic,
            8 => Level::Fatal,
            16 => Level::Error,
            24 => Level::Warning,
            32 => Level::Info,
            40 => Level::Verbose,
            48 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Parse a level from its lowercase name, as used in configuration.
    pub fn from_name(name: &str) -> Option<Level> {
        match name {
            "stderr" => Some(Level::Stderr),
            "quiet" => Some(Level::Quiet),
            "panic" => Some(Level::Panic),
            "fatal" => Some(Level::Fatal),
            "error" => Some(Level::Error),
            "warning" => Some(Level::Warning),
            "info" => Some(Level::Info),
            "verbose" => Some(Level::Verbose),
            "debug" => Some(Level::Debug),
            "trace" => Some(Level::Trace),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Level::Stderr => "stderr",
            Level::Quiet => "quiet",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Verbose => "verbose",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
