// SPDX-License-Identifier: MPL-2.0
//! Headless rendering of a quantized image to a PNG file.
//!
//! Runs the same pipeline as the window (quantizer, camera, render engine)
//! against an offscreen [`PixmapSurface`].

use crate::config::ZoomAnchor;
use crate::domain::{CellSize, GridImage, MaxDimension, QuantizationMode};
use crate::error::{Error, Result};
use crate::quantize::{self, QuantizedImage};
use crate::render::{FrameStats, PixmapSurface, RenderEngine};
use crate::selection::SelectionBroker;
use crate::ui::state::ViewportCamera;
use iced::Size;
use std::path::{Path, PathBuf};

/// Default logical width of an exported frame.
pub const DEFAULT_EXPORT_WIDTH: u32 = 800;
/// Default logical height of an exported frame.
pub const DEFAULT_EXPORT_HEIGHT: u32 = 600;

/// Parameters of one headless export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Device pixels per logical pixel.
    pub scale: f32,
    pub max_dimension: MaxDimension,
    pub mode: QuantizationMode,
    pub cell_size: CellSize,
    /// Cell to mark as active and center the camera on.
    pub active: Option<usize>,
}

impl ExportOptions {
    #[must_use]
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            width: DEFAULT_EXPORT_WIDTH,
            height: DEFAULT_EXPORT_HEIGHT,
            scale: 1.0,
            max_dimension: MaxDimension::default(),
            mode: QuantizationMode::default(),
            cell_size: CellSize::default(),
            active: None,
        }
    }
}

/// Renders one frame of `image` into a fresh surface.
///
/// The grid is centered in the frame, or on `options.active` when it names a
/// cell of the grid. An out-of-range active index is ignored.
///
/// # Errors
///
/// Returns [`Error::Render`] if the surface cannot be allocated.
pub fn render_frame(
    image: &QuantizedImage,
    options: &ExportOptions,
) -> Result<(PixmapSurface, FrameStats)> {
    if options.width == 0 || options.height == 0 {
        return Err(Error::Render(format!(
            "empty export size {}x{}",
            options.width, options.height
        )));
    }
    let viewport = Size::new(options.width as f32, options.height as f32);
    let grid: &GridImage = &image.grid;

    let mut camera = ViewportCamera::new(options.cell_size, ZoomAnchor::Center);
    camera.set_viewport(viewport);
    camera.set_grid(grid.width(), grid.height());

    let selection = SelectionBroker::new();
    if let Some(index) = options.active.filter(|&i| grid.contains_index(i)) {
        selection.set_active(Some(index));
        camera.center_on_index(index);
    }

    let mut engine = RenderEngine::new();
    if let Err(err) = engine.prepare(grid, camera.cell_size()) {
        tracing::warn!(error = %err, "exporting without static layer");
    }

    let mut surface = PixmapSurface::new(viewport, options.scale)?;
    let stats = engine.render_frame(&mut surface, Some(grid), &camera, &selection.snapshot());
    Ok((surface, stats))
}

/// Quantizes `source`, renders one frame and writes it to `options.output`.
///
/// # Errors
///
/// Propagates read, decode, render and write failures.
pub fn export(source: &Path, options: &ExportOptions) -> Result<FrameStats> {
    let image = quantize::quantize_file(source, options.max_dimension, options.mode)?;
    let (surface, stats) = render_frame(&image, options)?;
    surface.save_png(&options.output)?;
    tracing::info!(
        output = %options.output.display(),
        grid_width = image.grid.width(),
        grid_height = image.grid.height(),
        visible = stats.visible.len(),
        "frame exported"
    );
    Ok(stats)
}
