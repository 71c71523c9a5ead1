use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sink::SinkBackend;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_segment_secs")]
    pub segment_secs: u64,
    #[serde(default = "default_warmup_frames")]
    pub warmup_frames: u32,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_segment_secs() -> u64 {
    600
}

fn default_warmup_frames() -> u32 {
    40
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            segment_secs: default_segment_secs(),
            warmup_frames: default_warmup_frames(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub device_index: i32,
    #[serde(default = "default_auto_exposure")]
    pub auto_exposure: bool,
}

fn default_auto_exposure() -> bool {
    true
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            auto_exposure: default_auto_exposure(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub backend: SinkBackend,
    #[serde(default = "default_codec")]
    pub codec: String,
}

fn default_codec() -> String {
    "libx264".to_string()
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: SinkBackend::default(),
            codec: default_codec(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Missing config file is not an error; the recorder runs with defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file found, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.recording.segment_secs, 600);
        assert_eq!(config.recording.warmup_frames, 40);
        assert_eq!(config.camera.device_index, 0);
        assert!(config.camera.auto_exposure);
        assert_eq!(config.sink.backend, SinkBackend::Avi);
        assert_eq!(config.sink.codec, "libx264");
    }

    #[test]
    fn test_parse() {
        let toml = r#"
            [recording]
            base_dir = "/data"
            segment_secs = 120

            [sink]
            backend = "ffmpeg"
            codec = "libx265"

            [camera]
            device_index = 1
            auto_exposure = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.recording.base_dir, PathBuf::from("/data"));
        assert_eq!(config.recording.segment_secs, 120);
        assert_eq!(config.recording.warmup_frames, 40);
        assert_eq!(config.sink.backend, SinkBackend::Ffmpeg);
        assert_eq!(config.sink.codec, "libx265");
        assert_eq!(config.camera.device_index, 1);
        assert!(!config.camera.auto_exposure);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("/nonexistent/irrec-config.toml").unwrap();
        assert_eq!(config.recording.segment_secs, 600);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[recording]\nsegment_secs = 30").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.recording.segment_secs, 30);
    }
}
