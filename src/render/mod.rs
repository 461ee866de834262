// SPDX-License-Identifier: MPL-2.0
//! Grid rendering engine.
//!
//! A frame is composed of two layers:
//!
//! - a **static layer** ([`StaticLayer`]) holding every cell's fill, built once
//!   per `(grid, cell size, mode)` and blitted at the current pan offset;
//! - a **dynamic layer** with the hover and active outlines, redrawn on every
//!   frame from the latest selection.
//!
//! Drawing goes through the [`Surface`] trait so the same engine draws into an
//! iced canvas frame on screen and into an offscreen [`PixmapSurface`] for
//! export and tests. All coordinates handed to a surface are logical pixels;
//! surfaces apply their own device scale.

pub mod layer;
pub mod pixmap;

pub use layer::{LayerKey, StaticLayer};
pub use pixmap::PixmapSurface;

use crate::domain::{CellSize, GridImage};
use crate::error::Result;
use crate::selection::SelectionState;
use crate::ui::state::{CellRange, ViewportCamera};
use iced::{Color, Point, Rectangle, Size};

/// Colors used by the engine.
pub mod palette {
    use iced::Color;

    /// Surface background outside the grid.
    pub const BACKGROUND: Color = Color::from_rgb(17.0 / 255.0, 17.0 / 255.0, 17.0 / 255.0);
    /// Color showing through the inter-cell gap.
    pub const GAP: Color = Color::from_rgb(238.0 / 255.0, 238.0 / 255.0, 238.0 / 255.0);
    pub const ACTIVE: Color = Color::from_rgb(0.0, 1.0, 0.0);
    pub const HOVER: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.8);

    pub const ACTIVE_STROKE_WIDTH: f32 = 2.0;
    pub const HOVER_STROKE_WIDTH: f32 = 1.0;
}

/// Immediate-mode 2D drawing target.
pub trait Surface {
    /// Drawable size in logical pixels.
    fn logical_size(&self) -> Size;

    /// Restores the base transform (device scale only).
    fn reset_transform(&mut self);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rectangle, color: Color);

    /// Strokes the outline of `rect`, centered on its edges.
    fn stroke_rect(&mut self, rect: Rectangle, color: Color, width: f32);

    /// Draws a whole static layer with its top-left corner at `origin`.
    fn blit_layer(&mut self, layer: &StaticLayer, origin: Point);
}

/// What one call to [`RenderEngine::render_frame`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStats {
    pub visible: CellRange,
    /// Whether the cached static layer was used.
    pub used_layer: bool,
    /// Cells filled one by one because no matching layer was available.
    pub direct_cells: usize,
    /// Outlines drawn (hover and active).
    pub highlights: usize,
}

impl FrameStats {
    fn empty() -> Self {
        Self {
            visible: CellRange::empty(),
            used_layer: false,
            direct_cells: 0,
            highlights: 0,
        }
    }
}

/// Owns the static layer cache.
#[derive(Debug, Default)]
pub struct RenderEngine {
    layer: Option<StaticLayer>,
    rebuilds: u64,
}

impl RenderEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure the static layer matches `grid` at `cell_size`.
    ///
    /// Returns true when the layer had to be rebuilt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Render`] if the layer cannot be allocated.
    pub fn prepare(&mut self, grid: &GridImage, cell_size: CellSize) -> Result<bool> {
        let key = LayerKey::new(grid, cell_size);
        if self.layer.as_ref().is_some_and(|layer| layer.key() == key) {
            return Ok(false);
        }
        // A failed rebuild leaves no layer behind.
        self.layer = None;
        self.layer = Some(StaticLayer::build(grid, cell_size)?);
        self.rebuilds += 1;
        tracing::debug!(
            grid = key.grid.value(),
            cell_size = cell_size.value(),
            rebuilds = self.rebuilds,
            "static layer rebuilt"
        );
        Ok(true)
    }

    /// Forgets the cached layer.
    pub fn invalidate(&mut self) {
        self.layer = None;
    }

    #[must_use]
    pub fn layer(&self) -> Option<&StaticLayer> {
        self.layer.as_ref()
    }

    /// Number of static layer builds so far.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Draws one frame from the latest camera and selection.
    pub fn render_frame<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        grid: Option<&GridImage>,
        camera: &ViewportCamera,
        selection: &SelectionState,
    ) -> FrameStats {
        surface.reset_transform();
        surface.clear(palette::BACKGROUND);

        let Some(grid) = grid else {
            return FrameStats::empty();
        };

        let visible = camera.visible_cells(surface.logical_size());
        let mut stats = FrameStats {
            visible: visible.clone(),
            ..FrameStats::empty()
        };
        if visible.is_empty() {
            return stats;
        }

        let key = LayerKey::new(grid, camera.cell_size());
        match self.layer.as_ref().filter(|layer| layer.key() == key) {
            Some(layer) => {
                let pan = camera.pan();
                surface.blit_layer(layer, Point::new(pan.x, pan.y));
                stats.used_layer = true;
            }
            None => {
                stats.direct_cells = draw_cells(surface, grid, camera, &visible);
            }
        }

        let mut outline = |index: Option<usize>, color: Color, stroke: f32| {
            let Some((col, row)) = index.and_then(|i| grid.position_of(i)) else {
                return;
            };
            if visible.contains(col, row) {
                surface.stroke_rect(camera.cell_rect(col, row), color, stroke);
                stats.highlights += 1;
            }
        };
        outline(
            selection.hover_index,
            palette::HOVER,
            palette::HOVER_STROKE_WIDTH,
        );
        outline(
            selection.active_index,
            palette::ACTIVE,
            palette::ACTIVE_STROKE_WIDTH,
        );

        stats
    }
}

/// Fills the visible cells one by one, gap backdrop included.
fn draw_cells<S: Surface + ?Sized>(
    surface: &mut S,
    grid: &GridImage,
    camera: &ViewportCamera,
    visible: &CellRange,
) -> usize {
    let pitch = camera.cell_size().as_f32();
    let origin = camera.world_to_screen(visible.cols.start, visible.rows.start);
    surface.fill_rect(
        Rectangle::new(
            origin,
            Size::new(
                visible.cols.len() as f32 * pitch,
                visible.rows.len() as f32 * pitch,
            ),
        ),
        palette::GAP,
    );

    let mut drawn = 0;
    for (col, row) in visible.iter() {
        if let Some(cell) = grid.cell(col, row) {
            surface.fill_rect(camera.cell_rect(col, row), cell_color(cell));
            drawn += 1;
        }
    }
    drawn
}

/// Straight (non-premultiplied) color of a cell.
#[must_use]
pub fn cell_color(cell: &crate::domain::Cell) -> Color {
    Color::from_rgba8(cell.r, cell.g, cell.b, f32::from(cell.a) / 255.0)
}
