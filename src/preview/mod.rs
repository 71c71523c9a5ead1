mod window;

use opencv::core::Mat;
use thiserror::Error;

pub use window::WindowPreview;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("opencv error: {0}")]
    Cv(#[from] opencv::Error),
}

/// Presentation seam for the capture loop. The loop hands every colorized
/// infrared image to `show` and polls `cancel_requested` once per
/// iteration, so cancellation latency is bounded by one capture interval.
pub trait Preview {
    fn show(&mut self, image: &Mat) -> Result<(), PreviewError>;
    fn cancel_requested(&mut self) -> Result<bool, PreviewError>;
}
