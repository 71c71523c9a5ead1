mod controller;
mod pacer;
mod session;

use thiserror::Error;

pub use controller::RecordingController;
pub use pacer::{FramePacer, PacingState};
pub use session::{RecordingSession, SessionEnd};

use crate::camera::CameraError;
use crate::preview::PreviewError;
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Preview(#[from] PreviewError),
    #[error("opencv error: {0}")]
    Cv(#[from] opencv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
