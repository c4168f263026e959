//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Camera acquisition settings.
    pub camera: CameraDefaults,

    /// Default recording settings.
    pub recording: RecordingDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Camera request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDefaults {
    /// Requested frame width in pixels.
    pub width: u32,

    /// Requested frame height in pixels.
    pub height: u32,
}

/// Default recording parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingDefaults {
    /// Capture stream sampling rate.
    pub capture_fps: u32,

    /// Chunk timeslice in milliseconds; the encoder cuts a chunk on each
    /// boundary and on finalize.
    pub chunk_interval_ms: u64,

    /// Target encoder bitrate in bits per second.
    pub bitrate_bps: u32,

    /// Mime type advertised on exported artifacts. Open configuration;
    /// the encoder implementation decides what it actually produces.
    pub mime_type: String,

    /// Default export filename (without extension).
    pub export_filename: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "annocam=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraDefaults::default(),
            recording: RecordingDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
        }
    }
}

impl Default for RecordingDefaults {
    fn default() -> Self {
        Self {
            capture_fps: 30,
            chunk_interval_ms: 1000,
            bitrate_bps: 2_500_000,
            mime_type: "video/webm;codecs=vp9".to_string(),
            export_filename: "recorded-video".to_string(),
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
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("annocam").join("config.json")
}
