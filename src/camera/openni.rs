use opencv::core::{self, Mat};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::config::CameraConfig;

use super::{CameraError, FrameSet, FrameSource};

/// Depth-sensing camera behind OpenCV's OpenNI2 bridge. The infrared and
/// color streams run at VGA/30; the depth stream must stay enabled for the
/// infrared stream to deliver frames, even though depth data is never
/// persisted.
pub struct OpenniSource {
    cap: VideoCapture,
}

impl OpenniSource {
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        let mut cap = VideoCapture::new(config.device_index, videoio::CAP_OPENNI2)?;
        if !cap.is_opened()? {
            return Err(CameraError::DeviceUnavailable);
        }

        require_generator(
            &cap,
            videoio::CAP_OPENNI_DEPTH_GENERATOR_PRESENT,
            "depth",
        )?;
        require_generator(&cap, videoio::CAP_OPENNI_IR_GENERATOR_PRESENT, "infrared")?;
        require_generator(&cap, videoio::CAP_OPENNI_IMAGE_GENERATOR_PRESENT, "color")?;

        if !cap.set(
            videoio::CAP_OPENNI_IMAGE_GENERATOR_OUTPUT_MODE,
            videoio::CAP_OPENNI_VGA_30HZ as f64,
        )? {
            tracing::warn!("device refused VGA/30 output mode, continuing with its default");
        }

        apply_guarded_option(
            &mut cap,
            videoio::CAP_PROP_AUTO_EXPOSURE,
            if config.auto_exposure { 1.0 } else { 0.0 },
            "auto_exposure",
        )?;

        tracing::info!(device_index = config.device_index, "camera opened");
        Ok(Self { cap })
    }
}

impl FrameSource for OpenniSource {
    fn grab(&mut self) -> Result<FrameSet, CameraError> {
        if !self.cap.grab()? {
            return Err(CameraError::CaptureFailure(
                "wait for frame set failed".to_string(),
            ));
        }

        let timestamp_ms = self.cap.get(videoio::CAP_PROP_POS_MSEC)?;

        let mut ir16 = Mat::default();
        if !self.cap.retrieve(&mut ir16, videoio::CAP_OPENNI_IR_IMAGE)? {
            return Err(CameraError::CaptureFailure(
                "infrared channel missing from frame set".to_string(),
            ));
        }
        // The bridge hands infrared out as 16-bit; narrow it before the
        // preview path equalizes it.
        let mut ir = Mat::default();
        ir16.convert_to(&mut ir, core::CV_8U, 1.0 / 256.0, 0.0)?;

        let mut color = Mat::default();
        if !self.cap.retrieve(&mut color, videoio::CAP_OPENNI_BGR_IMAGE)? {
            return Err(CameraError::CaptureFailure(
                "color channel missing from frame set".to_string(),
            ));
        }

        Ok(FrameSet {
            timestamp_ms,
            ir,
            color,
        })
    }

    fn stop(&mut self) {
        if let Err(e) = self.cap.release() {
            tracing::warn!(error = %e, "failed to release capture device");
        }
    }
}

fn require_generator(cap: &VideoCapture, prop: i32, name: &str) -> Result<(), CameraError> {
    if cap.get(prop)? <= 0.0 {
        tracing::error!(generator = name, "device lacks required stream generator");
        return Err(CameraError::DeviceUnavailable);
    }
    Ok(())
}

/// Probe before set: devices reject properties they do not implement, and
/// an unsupported option is a downgrade, not a failure.
fn apply_guarded_option(
    cap: &mut VideoCapture,
    prop: i32,
    value: f64,
    name: &str,
) -> Result<(), CameraError> {
    match cap.get(prop) {
        Ok(current) => {
            if cap.set(prop, value)? {
                tracing::info!(option = name, from = current, to = value, "set camera option");
            } else {
                tracing::warn!(option = name, "camera rejected option value");
            }
        }
        Err(e) => {
            tracing::debug!(option = name, error = %e, "option not supported by device");
        }
    }
    Ok(())
}
