use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::camera::{FrameSource, TARGET_FPS};
use crate::preview::Preview;
use crate::sink::{SinkError, VideoSink};

use super::pacer::FramePacer;
use super::session::{RecordingSession, SessionEnd};
use super::RecordError;

const RECORDS_SUBDIR: &str = "records";

/// Rotates bounded-duration recording segments until a session reports
/// cancellation. Every segment gets a fresh wall-clock-derived file path
/// and a fresh sink; the capture device is shared across all of them and
/// released by the caller afterwards.
pub struct RecordingController {
    records_dir: PathBuf,
    segment_duration: Duration,
    extension: &'static str,
}

impl RecordingController {
    pub fn new(base_dir: &Path, segment_secs: u64, extension: &'static str) -> Self {
        Self {
            records_dir: base_dir.join(RECORDS_SUBDIR),
            segment_duration: Duration::from_secs(segment_secs),
            extension,
        }
    }

    pub fn run<F>(
        &self,
        source: &mut dyn FrameSource,
        preview: &mut dyn Preview,
        open_sink: &mut F,
    ) -> Result<(), RecordError>
    where
        F: FnMut(&Path) -> Result<Box<dyn VideoSink>, SinkError>,
    {
        std::fs::create_dir_all(&self.records_dir)?;

        loop {
            let session = RecordingSession::new(
                self.segment_path(Local::now()),
                self.segment_duration,
                FramePacer::for_fps(TARGET_FPS),
            );

            match session.run(source, preview, open_sink)? {
                SessionEnd::TimedOut => {
                    tracing::info!("segment limit reached, rotating to a new file");
                }
                SessionEnd::Cancelled => {
                    tracing::info!("cancellation observed, stopping after current segment");
                    return Ok(());
                }
            }
        }
    }

    fn segment_path(&self, now: DateTime<Local>) -> PathBuf {
        self.records_dir.join(format!(
            "{}.{}",
            now.format("%Y-%m-%d_%H:%M:%S"),
            self.extension
        ))
    }
}
