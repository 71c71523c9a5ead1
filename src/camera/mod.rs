mod openni;

use opencv::core::Mat;
use thiserror::Error;

pub use openni::OpenniSource;

/// Fixed capture and output geometry. The recording target is not
/// configurable; everything downstream assumes VGA at 30 fps.
pub const FRAME_WIDTH: i32 = 640;
pub const FRAME_HEIGHT: i32 = 480;
pub const TARGET_FPS: f64 = 30.0;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no capture device available")]
    DeviceUnavailable,
    #[error("failed to capture frame set: {0}")]
    CaptureFailure(String),
    #[error("opencv error: {0}")]
    Cv(#[from] opencv::Error),
}

/// One synchronized capture: an infrared image for the live preview, a
/// color image for encoding, and the device timestamp of the color frame.
pub struct FrameSet {
    pub timestamp_ms: f64,
    pub ir: Mat,
    pub color: Mat,
}

/// Blocking frame supplier. `grab` waits for the next synchronized frame
/// set from the device; a failed wait ends the current segment and is
/// never retried.
pub trait FrameSource {
    fn grab(&mut self) -> Result<FrameSet, CameraError>;
    fn stop(&mut self);
}

/// Drop frames after device start so the sensor can stabilize before any
/// of them are paced into a recording.
pub fn warmup<S: FrameSource>(source: &mut S, frames: u32) -> Result<(), CameraError> {
    tracing::info!(frames, "warming up camera");
    for _ in 0..frames {
        source.grab()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSource {
        grabs: u32,
    }

    impl FrameSource for CountingSource {
        fn grab(&mut self) -> Result<FrameSet, CameraError> {
            self.grabs += 1;
            Ok(FrameSet {
                timestamp_ms: self.grabs as f64,
                ir: Mat::default(),
                color: Mat::default(),
            })
        }

        fn stop(&mut self) {}
    }

    #[test]
    fn test_warmup_drops_requested_frames() {
        let mut source = CountingSource { grabs: 0 };
        warmup(&mut source, 40).unwrap();
        assert_eq!(source.grabs, 40);
    }

    #[test]
    fn test_warmup_zero_frames_grabs_nothing() {
        let mut source = CountingSource { grabs: 0 };
        warmup(&mut source, 0).unwrap();
        assert_eq!(source.grabs, 0);
    }
}
