use opencv::core::Mat;
use opencv::highgui;

use super::{Preview, PreviewError};

const ESC_KEY: i32 = 27;

/// On-screen preview window. Pumping the highgui event loop via `wait_key`
/// doubles as the cancellation poll: ESC ends the recording.
pub struct WindowPreview {
    name: String,
}

impl WindowPreview {
    pub fn create(name: &str) -> Result<Self, PreviewError> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            name: name.to_string(),
        })
    }
}

impl Preview for WindowPreview {
    fn show(&mut self, image: &Mat) -> Result<(), PreviewError> {
        highgui::imshow(&self.name, image)?;
        Ok(())
    }

    fn cancel_requested(&mut self) -> Result<bool, PreviewError> {
        Ok(highgui::wait_key(1)? == ESC_KEY)
    }
}
