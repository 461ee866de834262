// SPDX-License-Identifier: MPL-2.0
//! Image-to-grid quantization.
//!
//! [`quantize`] decodes raw bytes (any raster format the `image` crate reads,
//! or SVG), downsizes the result so that neither side exceeds the configured
//! maximum dimension, and reduces every cell to the chosen color depth.
//! It is a pure function of its inputs: identical bytes and parameters always
//! produce identical grids.

pub mod palette;
pub mod session;

pub use palette::{reduce_color, PALETTE_16};
pub use session::{GridSession, LoadOutcome, LoadTicket};

use crate::domain::{Cell, GridImage, MaxDimension, QuantizationMode};
use crate::error::{Error, Result};
use image_rs::imageops;
use image_rs::{ImageFormat, Rgba, RgbaImage};
use resvg::usvg;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// A quantized grid together with the decoded source it came from.
#[derive(Debug, Clone)]
pub struct QuantizedImage {
    pub grid: Arc<GridImage>,
    /// Full-resolution decoded source, kept for an "original image" view.
    pub original: Arc<RgbaImage>,
}

/// Computes the grid size for a source image.
///
/// Sources that fit are kept as is. Otherwise the longer side becomes
/// `max` and the other side is scaled by the same ratio, rounded down,
/// with a minimum of one cell.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, max: MaxDimension) -> (u32, u32) {
    let max = max.value();
    if width <= max && height <= max {
        return (width.max(1), height.max(1));
    }
    let longest = u64::from(width.max(height));
    let scale = |side: u32| -> u32 {
        let scaled = u64::from(side) * u64::from(max) / longest;
        (scaled as u32).max(1)
    };
    (scale(width), scale(height))
}

/// Decodes raw image bytes into RGBA pixels.
///
/// # Errors
///
/// Returns [`Error::Decode`] for empty or unreadable raster data and
/// [`Error::Svg`] when SVG data cannot be rasterized.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(Error::Decode("image data is empty".into()));
    }
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    let image = image_rs::load_from_memory(bytes)?;
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(Error::Decode("image has empty dimensions".into()));
    }
    Ok(rgba)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    if width == 0 || height == 0 {
        return Err(Error::Svg("SVG has empty dimensions".into()));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg("Failed to allocate SVG pixmap".into()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let pixels: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| Error::Svg("rasterized SVG has an unexpected size".into()))
}

/// Resizes and color-reduces an already decoded image.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the image has no pixels.
pub fn quantize_image(
    source: &RgbaImage,
    max: MaxDimension,
    mode: QuantizationMode,
) -> Result<GridImage> {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(Error::Decode("image has empty dimensions".into()));
    }

    let (width, height) = target_dimensions(src_w, src_h, max);
    let resized;
    let pixels = if (width, height) == (src_w, src_h) {
        source
    } else {
        // Area average: one representative sample per target cell.
        resized = imageops::thumbnail(source, width, height);
        &resized
    };

    let cells = pixels
        .pixels()
        .map(|&Rgba([r, g, b, a])| {
            let [r, g, b] = reduce_color(mode, [r, g, b]);
            Cell::new(r, g, b, a)
        })
        .collect();

    GridImage::new(width, height, mode, cells)
}

/// Decodes and quantizes raw image bytes.
///
/// # Errors
///
/// See [`decode`]. No partial grid is ever returned.
pub fn quantize(bytes: &[u8], max: MaxDimension, mode: QuantizationMode) -> Result<QuantizedImage> {
    let original = decode(bytes)?;
    let grid = quantize_image(&original, max, mode)?;
    tracing::debug!(
        source_width = original.width(),
        source_height = original.height(),
        width = grid.width(),
        height = grid.height(),
        mode = mode.as_str(),
        "quantized image"
    );
    Ok(QuantizedImage {
        grid: Arc::new(grid),
        original: Arc::new(original),
    })
}

/// Runs [`quantize`] on the blocking thread pool.
///
/// # Errors
///
/// See [`quantize`]. A panicked worker is reported as [`Error::Decode`].
pub async fn quantize_async(
    bytes: Arc<Vec<u8>>,
    max: MaxDimension,
    mode: QuantizationMode,
) -> Result<QuantizedImage> {
    tokio::task::spawn_blocking(move || quantize(&bytes, max, mode))
        .await
        .map_err(|e| Error::Decode(format!("decode task failed: {e}")))?
}

/// Reads a file and quantizes its contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, otherwise see [`quantize`].
pub fn quantize_file<P: AsRef<Path>>(
    path: P,
    max: MaxDimension,
    mode: QuantizationMode,
) -> Result<QuantizedImage> {
    let bytes = std::fs::read(path.as_ref())?;
    quantize(&bytes, max, mode)
}

// =============================================================================
// Sample image
// =============================================================================

const SAMPLE_SIDE: u32 = 4;

/// Builds the 4×4 sample: a diagonal red → green → blue gradient.
#[must_use]
pub fn sample_image() -> RgbaImage {
    const STOPS: [[f32; 3]; 3] = [[255.0, 0.0, 0.0], [0.0, 128.0, 0.0], [0.0, 0.0, 255.0]];

    RgbaImage::from_fn(SAMPLE_SIDE, SAMPLE_SIDE, |x, y| {
        // Projection of the pixel center onto the top-left → bottom-right diagonal.
        let t = (x as f32 + y as f32 + 1.0) / (2.0 * SAMPLE_SIDE as f32);
        let (from, to, local) = if t <= 0.5 {
            (STOPS[0], STOPS[1], t / 0.5)
        } else {
            (STOPS[1], STOPS[2], (t - 0.5) / 0.5)
        };
        let mix = |i: usize| (from[i] + (to[i] - from[i]) * local).round() as u8;
        Rgba([mix(0), mix(1), mix(2), 255])
    })
}

/// The sample image encoded as PNG, ready to go through [`quantize`].
///
/// # Errors
///
/// Returns [`Error::Decode`] if PNG encoding fails.
pub fn sample_png() -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    sample_image().write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
