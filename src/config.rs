//! Harness configuration loading.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::level::Level;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown log level '{name}'")]
    UnknownLogLevel { name: String },
}

/// Harness configuration, loaded from a user-level TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Program-name token prepended to every argument vector.
    pub program_name: Option<String>,

    /// Log level name ("quiet", "info", "debug", ...).
    pub log_level: Option<String>,

    /// Font registration settings.
    pub fonts: FontsConfig,
}

/// Font registration settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FontsConfig {
    /// Directory containing .ttf/.otf files to register.
    pub directory: Option<String>,

    /// Friendly-name to family-name mappings.
    pub mapping: BTreeMap<String, String>,
}

impl Config {
    /// Load the user-level configuration, if present.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                Ok(toml::from_str(&content)?)
            }
            _ => Ok(Config::default()),
        }
    }

    /// Get the user config path.
    /// Respects the FFMPEG_HARNESS_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FFMPEG_HARNESS_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("ffmpeg-harness.toml"))
    }

    /// The configured log level, defaulting to info.
    pub fn log_level(&self) -> Result<Level, ConfigError> {
        match &self.log_level {
            None => Ok(Level::Info),
            Some(name) => Level::from_name(name).ok_or_else(|| ConfigError::UnknownLogLevel {
                name: name.clone(),
            }),
        }
    }

    /// The configured program-name token, defaulting to "ffmpeg".
    pub fn program_name(&self) -> &str {
        self.program_name.as_deref().unwrap_or("ffmpeg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.program_name(), "ffmpeg");
        assert_eq!(config.log_level().unwrap(), Level::Info);
        assert!(config.fonts.directory.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
program_name = "ffprobe"
log_level = "warning"

[fonts]
directory = "/usr/share/fonts"

[fonts.mapping]
MyFont = "Ubuntu Mono"
"#,
        )
        .unwrap();
        assert_eq!(config.program_name(), "ffprobe");
        assert_eq!(config.log_level().unwrap(), Level::Warning);
        assert_eq!(config.fonts.directory.as_deref(), Some("/usr/share/fonts"));
        assert_eq!(
            config.fonts.mapping.get("MyFont").map(String::as_str),
            Some("Ubuntu Mono")
        );
    }

    #[test]
    fn test_unknown_log_level() {
        let config: Config = toml::from_str(r#"log_level = "loud""#).unwrap();
        assert!(matches!(
            config.log_level(),
            Err(ConfigError::UnknownLogLevel { .. })
        ));
    }
}
