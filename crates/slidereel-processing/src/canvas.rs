//! Compositing canvas
//!
//! Clips of different sizes are not scaled. The output frame is as wide as the
//! widest image and as tall as the tallest, and every clip is centred on it over a
//! black background.

use anyhow::{anyhow, Context, Result};
use slidereel_core::FrameSize;
use std::io::Cursor;

/// Read image dimensions from the header of an in-memory image.
pub fn image_dimensions(data: &[u8]) -> Result<FrameSize> {
    let (width, height) = ::image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .context("Failed to detect image format")?
        .into_dimensions()
        .context("Failed to read image dimensions")?;

    if width == 0 || height == 0 {
        return Err(anyhow!("Image has zero width or height"));
    }

    Ok(FrameSize::new(width, height))
}

/// Smallest even-sided frame that holds every clip without scaling.
pub fn compose_canvas(sizes: &[FrameSize]) -> Option<FrameSize> {
    let width = sizes.iter().map(|s| s.width).max()?;
    let height = sizes.iter().map(|s| s.height).max()?;
    Some(FrameSize::new(width, height).to_even())
}
