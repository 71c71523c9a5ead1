use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::camera::FrameSource;
use crate::frame;
use crate::preview::Preview;
use crate::sink::{SinkError, VideoSink};

use super::pacer::{FramePacer, PacingState};
use super::RecordError;

/// Why a session left its running state. Both are terminal; the controller
/// only rotates to a new segment after a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    TimedOut,
    Cancelled,
}

/// One bounded-duration recording segment writing exactly one output file.
pub struct RecordingSession {
    path: PathBuf,
    time_limit: Duration,
    pacer: FramePacer,
}

impl RecordingSession {
    pub fn new(path: PathBuf, time_limit: Duration, pacer: FramePacer) -> Self {
        Self {
            path,
            time_limit,
            pacer,
        }
    }

    /// Drive the capture/process/pace/write loop until the time limit or a
    /// cancellation ends it. The sink is opened before any capture and
    /// closed exactly once on every exit path; an open failure aborts
    /// before the first grab.
    pub fn run<F>(
        &self,
        source: &mut dyn FrameSource,
        preview: &mut dyn Preview,
        open_sink: &mut F,
    ) -> Result<SessionEnd, RecordError>
    where
        F: FnMut(&Path) -> Result<Box<dyn VideoSink>, SinkError>,
    {
        let started = Instant::now();
        let mut sink = open_sink(&self.path)?;
        tracing::info!(path = %self.path.display(), "recording segment started");

        let outcome = self.capture_loop(sink.as_mut(), source, preview, started);
        let close_result = sink.close();

        let end = outcome?;
        close_result?;

        tracing::info!(path = %self.path.display(), end = ?end, "recording segment ended");
        Ok(end)
    }

    fn capture_loop(
        &self,
        sink: &mut dyn VideoSink,
        source: &mut dyn FrameSource,
        preview: &mut dyn Preview,
        started: Instant,
    ) -> Result<SessionEnd, RecordError> {
        // Baseline grab: the very first capture has no predecessor to pace
        // against, so it seeds the state and contributes zero writes.
        let baseline = source.grab()?;
        preview.show(&frame::colorize_ir(&baseline.ir)?)?;
        let mut pacing = PacingState {
            last_timestamp_ms: baseline.timestamp_ms,
            last_color: baseline.color,
        };

        loop {
            if preview.cancel_requested()? {
                return Ok(SessionEnd::Cancelled);
            }

            let frames = source.grab()?;
            preview.show(&frame::colorize_ir(&frames.ir)?)?;

            let repeats = self
                .pacer
                .repeat_count(pacing.last_timestamp_ms, frames.timestamp_ms);
            for _ in 0..repeats {
                sink.write(&pacing.last_color)?;
            }
            tracing::trace!(
                timestamp_ms = frames.timestamp_ms,
                repeats,
                "paced capture"
            );

            // The preview always follows the newest capture; the encode
            // side only sees it once its output slot arrives.
            pacing.last_timestamp_ms = frames.timestamp_ms;
            pacing.last_color = frames.color;

            if started.elapsed() >= self.time_limit {
                return Ok(SessionEnd::TimedOut);
            }
        }
    }
}
