// SPDX-License-Identifier: MPL-2.0
//! Cached static layer: every cell's fill over the gap color, drawn once.

use super::palette;
use crate::config::defaults::MAX_LAYER_SIDE_PX;
use crate::domain::{CellSize, GridId, GridImage, QuantizationMode};
use crate::error::{Error, Result};
use iced::widget::image;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Inputs the static layer is a pure function of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerKey {
    pub grid: GridId,
    pub cell_size: CellSize,
    pub mode: QuantizationMode,
}

impl LayerKey {
    #[must_use]
    pub fn new(grid: &GridImage, cell_size: CellSize) -> Self {
        Self {
            grid: grid.id(),
            cell_size,
            mode: grid.mode(),
        }
    }
}

/// Rendered grid at one cell size, one pixel per logical pixel.
#[derive(Debug, Clone)]
pub struct StaticLayer {
    key: LayerKey,
    pixmap: Pixmap,
    handle: image::Handle,
}

impl StaticLayer {
    /// Draws all cells of `grid` at `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when the layer would exceed the pixel budget
    /// or cannot be allocated.
    pub fn build(grid: &GridImage, cell_size: CellSize) -> Result<Self> {
        let pitch = cell_size.value();
        let width = grid.width() * pitch;
        let height = grid.height() * pitch;
        if width > MAX_LAYER_SIDE_PX || height > MAX_LAYER_SIDE_PX {
            return Err(Error::Render(format!(
                "static layer of {width}x{height} exceeds {MAX_LAYER_SIDE_PX}px per side"
            )));
        }

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("cannot allocate {width}x{height} layer")))?;
        pixmap.fill(to_skia(palette::GAP));

        let fill = cell_size.fill() as f32;
        let mut paint = Paint::default();
        paint.anti_alias = false;
        for (index, cell) in grid.cells().iter().enumerate() {
            let (col, row) = crate::domain::cell_position(index, grid.width());
            let Some(rect) =
                Rect::from_xywh((col * pitch) as f32, (row * pitch) as f32, fill, fill)
            else {
                continue;
            };
            paint.set_color_rgba8(cell.r, cell.g, cell.b, cell.a);
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }

        let handle = image::Handle::from_rgba(width, height, straight_rgba(&pixmap));
        Ok(Self {
            key: LayerKey::new(grid, cell_size),
            pixmap,
            handle,
        })
    }

    #[must_use]
    pub fn key(&self) -> LayerKey {
        self.key
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Image handle for the iced renderer.
    #[must_use]
    pub fn handle(&self) -> &image::Handle {
        &self.handle
    }
}

/// Converts an iced color to tiny-skia.
#[must_use]
pub fn to_skia(color: iced::Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.into_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

/// Demultiplied RGBA bytes of a pixmap.
#[must_use]
pub fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
