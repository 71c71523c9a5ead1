use opencv::core::Mat;

/// Pacing state owned by exactly one recording session. `last_color` is
/// the encode-channel snapshot that the next iteration duplicates into the
/// output; `last_timestamp_ms` never decreases within a session.
pub struct PacingState {
    pub last_timestamp_ms: f64,
    pub last_color: Mat,
}

/// Decides how many fixed-rate output slots elapsed between two captures.
///
/// The previous snapshot, not the new frame, fills those slots: the new
/// frame's own slot has not arrived yet. That costs one frame of latency
/// but keeps the recording at wall-clock rate. A device stall duplicates
/// the stale frame many times; captures arriving faster than the target
/// rate get zero slots and never reach the output.
pub struct FramePacer {
    interval_ms: f64,
}

impl FramePacer {
    pub fn new(interval_ms: f64) -> Self {
        debug_assert!(interval_ms > 0.0);
        Self { interval_ms }
    }

    pub fn for_fps(fps: f64) -> Self {
        Self::new(1000.0 / fps)
    }

    pub fn repeat_count(&self, previous_ms: f64, current_ms: f64) -> usize {
        let delta = current_ms - previous_ms;
        if delta <= 0.0 {
            return 0;
        }
        (delta / self.interval_ms) as usize
    }
}
