//! The calling layer around the engine.

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use chrono::Utc;

use crate::command::tokenize;
use crate::config::{Config, ConfigError};
use crate::engine::{Engine, EventSink};
use crate::fontconfig::{self, FontconfigError};
use crate::level::Level;
use crate::log::{self, LogCallback, LogMessage};
use crate::media::{self, MediaInformation};
use crate::session::{Execution, ReturnCode};
use crate::statistics::{Statistics, StatisticsCallback};

/// Errors reported by harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("media probe failed with return code {code}")]
    ProbeFailed { code: i32, output: String },

    #[error(transparent)]
    Fontconfig(#[from] FontconfigError),

    #[error("engine rejected environment variable {name} (rc={code})")]
    Environment { name: String, code: i32 },
}

/// Drives an [`Engine`] with tokenized commands and supervises its
/// log and statistics redirection.
///
/// Every execution is recorded; captured output respects the active
/// log level, exactly as the forwarded messages do.
pub struct Harness<E: Engine> {
    engine: E,
    program_name: String,
    log_level: Level,
    log_callback: Option<LogCallback>,
    statistics_callback: Option<StatisticsCallback>,
    last_statistics: Statistics,
    executions: Vec<Execution>,
    next_execution_id: u64,
}

impl<E: Engine> Harness<E> {
    /// Create a harness with default settings: program name "ffmpeg",
    /// info log level, no callbacks.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            program_name: "ffmpeg".to_string(),
            log_level: Level::Info,
            log_callback: None,
            statistics_callback: None,
            last_statistics: Statistics::default(),
            executions: Vec::new(),
            next_execution_id: 1,
        }
    }

    /// Create a harness from a loaded [`Config`].
    pub fn with_config(engine: E, config: &Config) -> Result<Self, ConfigError> {
        let mut harness = Self::new(engine);
        harness.program_name = config.program_name().to_string();
        harness.log_level = config.log_level()?;
        Ok(harness)
    }

    /// Tokenize a command string and execute it.
    ///
    /// The configured program-name token is prepended, so the engine
    /// receives a conventional argument vector.
    pub fn execute(&mut self, command: &str) -> Execution {
        let mut arguments = vec![self.program_name.clone()];
        arguments.extend(tokenize(command));
        self.run(command.to_string(), &arguments)
    }

    /// Execute an already-split argument vector (program name is still
    /// prepended).
    pub fn execute_arguments(&mut self, arguments: &[String]) -> Execution {
        let mut argv = Vec::with_capacity(arguments.len() + 1);
        argv.push(self.program_name.clone());
        argv.extend_from_slice(arguments);
        self.run(arguments.join(" "), &argv)
    }

    /// Probe a media input by running
    /// `-v info -hide_banner -i <path> -f null -` and decoding the
    /// captured banner.
    pub fn media_information(&mut self, path: &str) -> Result<MediaInformation, HarnessError> {
        let arguments: Vec<String> = ["-v", "info", "-hide_banner", "-i", path, "-f", "null", "-"]
            .into_iter()
            .map(String::from)
            .collect();
        let execution = self.execute_arguments(&arguments);
        match execution.return_code {
            ReturnCode::Success => Ok(media::parse(&execution.output)),
            code => Err(HarnessError::ProbeFailed {
                code: code.value(),
                output: execution.output,
            }),
        }
    }

    /// Request cancellation of an ongoing execution.
    pub fn cancel(&mut self) {
        self.engine.cancel();
    }

    /// Register fonts from `font_directory` with the engine: writes a
    /// fontconfig configuration under `configuration_directory` and
    /// exports FONTCONFIG_PATH.
    pub fn set_font_directory(
        &mut self,
        configuration_directory: &Path,
        font_directory: &str,
        name_mapping: &BTreeMap<String, String>,
    ) -> Result<(), HarnessError> {
        fontconfig::write_font_configuration(
            configuration_directory,
            font_directory,
            name_mapping,
        )?;
        self.set_fontconfig_configuration_path(configuration_directory)
    }

    /// Point the engine at an existing fontconfig configuration
    /// directory.
    pub fn set_fontconfig_configuration_path(&mut self, path: &Path) -> Result<(), HarnessError> {
        let value = path.to_string_lossy();
        let code = self.engine.set_environment_variable("FONTCONFIG_PATH", &value);
        if code == 0 {
            Ok(())
        } else {
            Err(HarnessError::Environment {
                name: "FONTCONFIG_PATH".to_string(),
                code,
            })
        }
    }

    /// The active log level.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Set the active log level. Messages above it are neither
    /// forwarded nor captured.
    pub fn set_log_level(&mut self, level: Level) {
        self.log_level = level;
    }

    /// Redirect forwarded log messages to a callback instead of the
    /// host logger.
    pub fn set_log_callback(&mut self, callback: Option<LogCallback>) {
        self.log_callback = callback;
    }

    /// Observe statistics samples as they arrive.
    pub fn set_statistics_callback(&mut self, callback: Option<StatisticsCallback>) {
        self.statistics_callback = callback;
    }

    /// The last received statistics sample, merged across deliveries.
    pub fn last_received_statistics(&self) -> &Statistics {
        &self.last_statistics
    }

    /// Reset the merged statistics. Recommended before starting a new
    /// execution.
    pub fn reset_statistics(&mut self) {
        self.last_statistics = Statistics::default();
    }

    /// History of completed executions, oldest first.
    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn run(&mut self, command: String, arguments: &[String]) -> Execution {
        let id = self.next_execution_id;
        self.next_execution_id += 1;
        let started_at = Utc::now();

        let mut sink = RunSink {
            active_level: self.log_level,
            log_callback: &mut self.log_callback,
            statistics_callback: &mut self.statistics_callback,
            last_statistics: &mut self.last_statistics,
            output: String::new(),
        };
        let code = self.engine.execute(arguments, &mut sink);
        let output = sink.output;

        let execution = Execution {
            id,
            command,
            started_at,
            return_code: ReturnCode::from_value(code),
            output,
        };
        self.executions.push(execution.clone());
        execution
    }
}

/// Per-run event sink: filters, captures and forwards.
struct RunSink<'a> {
    active_level: Level,
    log_callback: &'a mut Option<LogCallback>,
    statistics_callback: &'a mut Option<StatisticsCallback>,
    last_statistics: &'a mut Statistics,
    output: String,
}

impl EventSink for RunSink<'_> {
    fn log(&mut self, level: Level, message: &str) {
        if !log::passes(level, self.active_level) {
            return;
        }
        self.output.push_str(message);
        let entry = LogMessage::new(level, message);
        match self.log_callback.as_mut() {
            Some(callback) => callback(&entry),
            None => log::forward_to_tracing(&entry),
        }
    }

    fn statistics(&mut self, sample: Statistics) {
        self.last_statistics.update(&sample);
        if let Some(callback) = self.statistics_callback.as_mut() {
            callback(self.last_statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Engine that replays a fixed script of events.
    struct ScriptedEngine {
        events: Vec<(Level, String)>,
        samples: Vec<Statistics>,
        return_code: i32,
        environment_return_code: i32,
        seen_arguments: Vec<Vec<String>>,
        cancelled: bool,
        environment: Vec<(String, String)>,
    }

    impl ScriptedEngine {
        fn new(return_code: i32) -> Self {
            Self {
                events: Vec::new(),
                samples: Vec::new(),
                return_code,
                environment_return_code: 0,
                seen_arguments: Vec::new(),
                cancelled: false,
                environment: Vec::new(),
            }
        }

        fn with_log(mut self, level: Level, message: &str) -> Self {
            self.events.push((level, message.to_string()));
            self
        }

        fn with_sample(mut self, sample: Statistics) -> Self {
            self.samples.push(sample);
            self
        }
    }

    impl Engine for ScriptedEngine {
        fn execute(&mut self, arguments: &[String], sink: &mut dyn EventSink) -> i32 {
            self.seen_arguments.push(arguments.to_vec());
            for (level, message) in &self.events {
                sink.log(*level, message);
            }
            for sample in &self.samples {
                sink.statistics(sample.clone());
            }
            self.return_code
        }

        fn cancel(&mut self) {
            self.cancelled = true;
        }

        fn set_environment_variable(&mut self, name: &str, value: &str) -> i32 {
            self.environment.push((name.to_string(), value.to_string()));
            self.environment_return_code
        }
    }

    #[test]
    fn test_execute_prepends_program_name() {
        let mut harness = Harness::new(ScriptedEngine::new(0));
        harness.execute("-i 'My Movie.mp4' out.mp4");
        assert_eq!(
            harness.engine().seen_arguments[0],
            vec!["ffmpeg", "-i", "My Movie.mp4", "out.mp4"]
        );
    }

    #[test]
    fn test_execute_records_history() {
        let mut harness = Harness::new(ScriptedEngine::new(0));
        harness.execute("-version");
        harness.execute("-formats");
        let executions = harness.executions();
        assert_eq!(executions.len(), 2);
        assert_eq!(executions[0].id, 1);
        assert_eq!(executions[1].id, 2);
        assert_eq!(executions[1].command, "-formats");
    }

    #[test]
    fn test_return_code_mapping() {
        let mut harness = Harness::new(ScriptedEngine::new(255));
        let execution = harness.execute("-i missing.mp4 out.mp4");
        assert!(execution.return_code.is_cancel());
    }

    #[test]
    fn test_output_capture_respects_level() {
        let engine = ScriptedEngine::new(0)
            .with_log(Level::Info, "frame rate detected\n")
            .with_log(Level::Debug, "probing buffers\n");
        let mut harness = Harness::new(engine);
        let execution = harness.execute("-version");
        assert!(execution.output.contains("frame rate detected"));
        assert!(!execution.output.contains("probing buffers"));
    }

    #[test]
    fn test_quiet_level_drops_everything_but_stderr() {
        let engine = ScriptedEngine::new(0)
            .with_log(Level::Error, "boom\n")
            .with_log(Level::Stderr, "direct\n");
        let mut harness = Harness::new(engine);
        harness.set_log_level(Level::Quiet);
        let execution = harness.execute("-version");
        assert_eq!(execution.output, "direct\n");
    }

    #[test]
    fn test_log_callback_receives_messages() {
        let engine = ScriptedEngine::new(0).with_log(Level::Warning, "deprecated option\n");
        let mut harness = Harness::new(engine);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        harness.set_log_callback(Some(Box::new(move |message| {
            sink.lock().unwrap().push((message.level, message.message.clone()));
        })));
        harness.execute("-version");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Level::Warning);
    }

    #[test]
    fn test_statistics_merge_and_callback() {
        let engine = ScriptedEngine::new(0)
            .with_sample(Statistics {
                video_frame_number: 10,
                video_fps: 24.0,
                ..Default::default()
            })
            .with_sample(Statistics {
                video_frame_number: 20,
                time: 800,
                ..Default::default()
            });
        let mut harness = Harness::new(engine);
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        harness.set_statistics_callback(Some(Box::new(move |_| {
            *counter.lock().unwrap() += 1;
        })));
        harness.execute("-i in.mp4 out.mp4");

        assert_eq!(*count.lock().unwrap(), 2);
        let statistics = harness.last_received_statistics();
        assert_eq!(statistics.video_frame_number, 20);
        assert_eq!(statistics.video_fps, 24.0);
        assert_eq!(statistics.time, 800);

        harness.reset_statistics();
        assert_eq!(harness.last_received_statistics(), &Statistics::default());
    }

    #[test]
    fn test_cancel_reaches_engine() {
        let mut harness = Harness::new(ScriptedEngine::new(0));
        harness.cancel();
        assert!(harness.engine().cancelled);
    }

    #[test]
    fn test_media_information_probe_failure() {
        let mut harness = Harness::new(ScriptedEngine::new(1));
        let error = harness.media_information("missing.mp4").unwrap_err();
        assert!(matches!(error, HarnessError::ProbeFailed { code: 1, .. }));
    }

    #[test]
    fn test_fontconfig_path_exported_to_engine() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut harness = Harness::new(ScriptedEngine::new(0));
        harness
            .set_font_directory(dir.path(), "/fonts", &BTreeMap::new())
            .unwrap();
        let environment = &harness.engine().environment;
        assert_eq!(environment.len(), 1);
        assert_eq!(environment[0].0, "FONTCONFIG_PATH");
        assert!(dir.path().join("fonts.conf").exists());
    }

    #[test]
    fn test_rejected_environment_export_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut engine = ScriptedEngine::new(0);
        engine.environment_return_code = 1;
        let mut harness = Harness::new(engine);
        let error = harness
            .set_font_directory(dir.path(), "/fonts", &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(error, HarnessError::Environment { code: 1, .. }));
    }
}
