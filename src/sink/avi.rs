use std::path::{Path, PathBuf};

use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio::{self, VideoWriter};

use super::{SinkError, VideoSink};

/// Simple container backend: an XVID-coded AVI written through OpenCV's
/// VideoWriter, which accepts decoded BGR frames directly.
pub struct AviSink {
    writer: VideoWriter,
    path: PathBuf,
    frames_written: u64,
}

impl AviSink {
    pub fn open(path: &Path, width: i32, height: i32, fps: f64) -> Result<Self, SinkError> {
        let fourcc = VideoWriter::fourcc('X', 'V', 'I', 'D')?;
        let writer = VideoWriter::new(
            &path.to_string_lossy(),
            fourcc,
            fps,
            Size::new(width, height),
            true,
        )?;
        if !writer.is_opened()? {
            return Err(SinkError::Unavailable(format!(
                "could not open video writer for {}",
                path.display()
            )));
        }
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            frames_written: 0,
        })
    }
}

impl VideoSink for AviSink {
    fn write(&mut self, frame: &Mat) -> Result<(), SinkError> {
        self.writer.write(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.writer.release()?;
        tracing::info!(
            path = %self.path.display(),
            frames = self.frames_written,
            "finalized segment file"
        );
        Ok(())
    }
}
