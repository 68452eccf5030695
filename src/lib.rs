//! ffmpeg-harness - host-side harness for an embedded FFmpeg-style engine.
//!
//! Turns free-form command strings into argument vectors, drives the
//! engine through a trait seam, redirects its log and statistics events,
//! and decodes the media information it prints about its inputs.

pub mod command;
pub mod config;
pub mod engine;
pub mod fontconfig;
pub mod harness;
pub mod level;
pub mod log;
pub mod media;
pub mod session;
pub mod statistics;

pub use command::tokenize;
pub use config::{Config, ConfigError};
pub use engine::{Engine, EventSink};
pub use harness::{Harness, HarnessError};
pub use level::Level;
pub use log::{LogCallback, LogMessage};
pub use media::{MediaInformation, StreamInformation};
pub use session::{Execution, ReturnCode};
pub use statistics::{Statistics, StatisticsCallback};
