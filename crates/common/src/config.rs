//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the binding profile document.
    pub profile_path: PathBuf,

    /// Default dispatch loop settings.
    pub dispatch: DispatchDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default dispatch loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchDefaults {
    /// Nominal inference frame rate (Hz). Informational only; the
    /// driving loop is paced by the frame source.
    pub frame_rate_hz: u32,

    /// How often to poll the profile file for hot reload (ms).
    pub profile_poll_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "facepilot=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile_path: default_profile_path(),
            dispatch: DispatchDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DispatchDefaults {
    fn default() -> Self {
        Self {
            frame_rate_hz: 30,
            profile_poll_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Default binding profile location.
fn default_profile_path() -> PathBuf {
    config_dir().join("profile.json")
}

fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("facepilot")
}
