//! Image loading - decode, convert to luminance and resize to a character grid.

use crate::{GlyphgateError, Result};
use image::imageops::{self, FilterType};
use image::GrayImage;
use std::path::Path;

/// Monospace cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 0.55;

/// Fixed grid used by the animated banner, independent of the source aspect
pub const ANIMATION_WIDTH: u32 = 100;
pub const ANIMATION_HEIGHT: u32 = 50;

/// Open and decode an image, converting it to 8-bit luminance.
pub fn open_luma(path: impl AsRef<Path>) -> Result<GrayImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| GlyphgateError::Decode {
        path: path.to_path_buf(),
        name: path.file_name().unwrap_or(path.as_os_str()).to_string_lossy().into_owned(),
        source,
    })?;
    log::debug!("decoded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image.to_luma8())
}

/// Row count for a grid `target_width` columns wide, corrected for cell aspect.
///
/// Truncates toward zero, never returns less than one row.
pub fn aspect_height(target_width: u32, src_width: u32, src_height: u32) -> u32 {
    if src_width == 0 {
        return 1;
    }
    let ratio = src_height as f64 / src_width as f64;
    let rows = (target_width as f64 * ratio * CELL_ASPECT) as u32;
    rows.max(1)
}

/// Resize to `width` columns, keeping the source aspect ratio.
pub fn fit_width(image: &GrayImage, width: u32) -> Result<GrayImage> {
    let height = aspect_height(width, image.width(), image.height());
    fit_fixed(image, width, height)
}

/// Resize to an exact grid, ignoring the source aspect ratio.
pub fn fit_fixed(image: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return Err(GlyphgateError::InvalidDimensions { width, height });
    }
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    log::debug!("resizing {}x{} -> {}x{}", image.width(), image.height(), width, height);
    Ok(imageops::resize(image, width, height, FilterType::CatmullRom))
}
