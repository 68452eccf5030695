//! Log redirection types and the default sink.

use crate::level::Level;

/// A log line redirected from the engine.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// Severity the engine reported for this line.
    pub level: Level,
    /// The redirected text, including any trailing newline the engine
    /// printed.
    pub message: String,
}

impl LogMessage {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Callback invoked for every forwarded log message.
pub type LogCallback = Box<dyn FnMut(&LogMessage) + Send>;

/// Decide whether a message at `level` passes the `active` threshold.
///
/// Quiet suppresses everything except the engine's direct stderr
/// output, which is always forwarded.
pub(crate) fn passes(level: Level, active: Level) -> bool {
    if active == Level::Quiet {
        return level == Level::Stderr;
    }
    level.value() <= active.value()
}

/// Default sink: route a forwarded message onto the host logger.
pub(crate) fn forward_to_tracing(message: &LogMessage) {
    let text = message.message.trim_end_matches('\n');
    match message.level {
        Level::Quiet => {}
        Level::Trace | Level::Debug => tracing::trace!(target: "engine", "{text}"),
        Level::Verbose => tracing::debug!(target: "engine", "{text}"),
        Level::Info => tracing::info!(target: "engine", "{text}"),
        Level::Warning => tracing::warn!(target: "engine", "{text}"),
        Level::Error | Level::Fatal | Level::Panic | Level::Stderr => {
            tracing::error!(target: "engine", "{text}")
        }
    }
}
