//! Color-to-line-art conversion for coloring-book style output.

use crate::cache::{ContentCache, ContentKind};
use crate::{Error, Result};
use image::GrayImage;
use imageproc::distance_transform::Norm;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BLUR_SIGMA: f32 = 0.8;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
const DILATE_RADIUS: u8 = 1;

/// Converts a color illustration into white-background black line art,
/// cache-wrapped under `bw_{basename}`.
///
/// Returns `Ok(None)` when the source image is missing or unreadable; a
/// missing monochrome variant is an acceptable partial outcome, not an
/// error.
pub fn convert_to_line_art(cache: &ContentCache, color_path: &Path) -> Result<Option<PathBuf>> {
    if !color_path.exists() {
        return Ok(None);
    }
    let basename = color_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let key = format!("bw_{}", basename);
    if let Some(path) = cache.lookup(&key, ContentKind::Image) {
        info!("using cached line art");
        return Ok(Some(path));
    }

    let color = match image::open(color_path) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, path = %color_path.display(), "failed to load color image");
            return Ok(None);
        }
    };

    let line_art = render_line_art(&color.to_luma8());

    let scratch = tempfile::Builder::new().suffix(".png").tempfile()?;
    line_art
        .save(scratch.path())
        .map_err(|e| Error::cache_io(e.to_string()))?;
    let outcome = cache.store(&key, ContentKind::Image, scratch.path());
    if outcome.cached {
        Ok(Some(outcome.path))
    } else {
        let (_file, path) = scratch
            .keep()
            .map_err(|e| Error::cache_io(e.to_string()))?;
        Ok(Some(path))
    }
}

/// Grayscale input, noise-reduction blur, edge detection, line thickening,
/// then inversion so the result is black lines on a white background.
///
/// Fixed parameters keep the output pixel-identical for identical input.
pub fn render_line_art(gray: &GrayImage) -> GrayImage {
    let blurred = imageproc::filter::gaussian_blur_f32(gray, BLUR_SIGMA);
    let edges = imageproc::edges::canny(&blurred, CANNY_LOW, CANNY_HIGH);
    let mut thick = imageproc::morphology::dilate(&edges, Norm::LInf, DILATE_RADIUS);
    for pixel in thick.pixels_mut() {
        pixel.0[0] = 255 - pixel.0[0];
    }
    thick
}
