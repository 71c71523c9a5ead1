mod avi;
mod ffmpeg;

use std::path::Path;

use opencv::core::Mat;
use serde::Deserialize;
use thiserror::Error;

pub use avi::AviSink;
pub use ffmpeg::FfmpegSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open output sink: {0}")]
    Unavailable(String),
    #[error("failed to write frame: {0}")]
    Write(String),
    #[error("opencv error: {0}")]
    Cv(#[from] opencv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output backend for one segment file. Frames go out in submission order
/// and none are dropped by the sink; skipping and duplication are decided
/// upstream by the pacer. `close` flushes anything the backend buffered
/// and finalizes the file, exactly once per segment.
pub trait VideoSink {
    fn write(&mut self, frame: &Mat) -> Result<(), SinkError>;
    fn close(&mut self) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    #[default]
    Avi,
    Ffmpeg,
}

impl SinkBackend {
    pub fn extension(&self) -> &'static str {
        match self {
            SinkBackend::Avi => "avi",
            SinkBackend::Ffmpeg => "mkv",
        }
    }
}

/// Backend selection is a config choice, not a compile-time one.
pub fn open_sink(
    backend: SinkBackend,
    codec: &str,
    path: &Path,
    width: i32,
    height: i32,
    fps: f64,
) -> Result<Box<dyn VideoSink>, SinkError> {
    match backend {
        SinkBackend::Avi => Ok(Box::new(AviSink::open(path, width, height, fps)?)),
        SinkBackend::Ffmpeg => Ok(Box::new(FfmpegSink::open(path, width, height, fps, codec)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_extensions() {
        assert_eq!(SinkBackend::Avi.extension(), "avi");
        assert_eq!(SinkBackend::Ffmpeg.extension(), "mkv");
    }

    #[test]
    fn test_backend_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: SinkBackend,
        }
        let w: Wrapper = toml::from_str("backend = \"ffmpeg\"").unwrap();
        assert_eq!(w.backend, SinkBackend::Ffmpeg);
    }

    #[test]
    fn test_avi_open_fails_on_bad_path() {
        let err = AviSink::open(Path::new("/nonexistent-dir/out.avi"), 640, 480, 30.0);
        assert!(matches!(err, Err(SinkError::Unavailable(_))));
    }
}
