//! The seam between the harness and the native transcoding engine.

use crate::level::Level;
use crate::statistics::Statistics;

/// Return code the engine reports when an execution was cancelled.
pub const CANCEL_RETURN_CODE: i32 = 255;

/// Receiver for the events an engine emits during one execution.
pub trait EventSink {
    /// A log line, tagged with the severity the engine assigned to it.
    fn log(&mut self, level: Level, message: &str);

    /// A periodic progress sample.
    fn statistics(&mut self, sample: Statistics);
}

/// The transcoding engine behind the harness.
///
/// Implementations wrap the native `(argc, argv)`-style entry point.
/// `execute` blocks until the run finishes and returns the engine's
/// status code: zero on success, [`CANCEL_RETURN_CODE`] on user cancel,
/// any other non-zero value on error.
pub trait Engine {
    fn execute(&mut self, arguments: &[String], sink: &mut dyn EventSink) -> i32;

    /// Request cancellation of an ongoing execution. Returns without
    /// waiting for the run to terminate.
    fn cancel(&mut self);

    /// Export an environment variable to the engine. Returns zero on
    /// success, non-zero on error.
    fn set_environment_variable(&mut self, name: &str, value: &str) -> i32;
}
