use opencv::core::Mat;
use opencv::imgproc;

/// Turn a raw single-channel infrared image into something a human can
/// read: spread the intensity histogram, then map it through a fixed
/// perceptual palette. Stateless; a wrong-shaped input is a caller bug and
/// surfaces as an opencv error.
///
/// The color channel needs no counterpart here: it is already in the BGR
/// layout the sinks consume and passes through the pipeline unmodified.
pub fn colorize_ir(ir: &Mat) -> Result<Mat, opencv::Error> {
    let mut equalized = Mat::default();
    imgproc::equalize_hist(ir, &mut equalized)?;
    let mut colorized = Mat::default();
    imgproc::apply_color_map(&equalized, &mut colorized, imgproc::COLORMAP_JET)?;
    Ok(colorized)
}
