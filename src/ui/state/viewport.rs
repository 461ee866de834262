// SPDX-License-Identifier: MPL-2.0
//! Grid camera: pan offset, cell size and the transforms between screen
//! space and grid space.
//!
//! Screen position of a cell is `col * cell_size + pan_x` (resp. rows), where
//! the cell size already includes the inter-cell gap. Pan is never clamped;
//! cells that leave the viewport are simply culled.

use crate::config::ZoomAnchor;
use crate::domain::{cell_index, cell_position, CellSize, ZoomDirection};
use iced::{Point, Rectangle, Size, Vector};
use std::ops::Range;

/// Pan offset and zoom level for one grid display session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub pan: Vector,
    pub cell_size: CellSize,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: Vector::new(0.0, 0.0),
            cell_size: CellSize::default(),
        }
    }
}

// =============================================================================
// Culling
// =============================================================================

/// Returns the indices along one axis whose `[i * pitch + pan, (i + 1) * pitch + pan)`
/// span intersects `[0, extent)`, clamped to `0..count`.
#[must_use]
pub fn visible_span(pan: f32, extent: f32, pitch: f32, count: u32) -> Range<u32> {
    if pitch <= 0.0 || extent <= 0.0 || count == 0 {
        return 0..0;
    }
    let first = (-pan / pitch).floor();
    let last = ((extent - pan) / pitch).ceil();

    let count_f = count as f32;
    let start = first.clamp(0.0, count_f) as u32;
    let end = last.clamp(0.0, count_f) as u32;
    start..end.max(start)
}

/// Rectangular block of visible cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub cols: Range<u32>,
    pub rows: Range<u32>,
}

impl CellRange {
    #[must_use]
    pub fn empty() -> Self {
        Self { cols: 0..0, rows: 0..0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty() || self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cols.len() * self.rows.len()
    }

    #[must_use]
    pub fn contains(&self, col: u32, row: u32) -> bool {
        self.cols.contains(&col) && self.rows.contains(&row)
    }

    /// Iterates `(col, row)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| (col, row)))
    }
}

// =============================================================================
// Camera
// =============================================================================

/// Camera over a grid of `grid_width × grid_height` cells.
#[derive(Debug, Clone)]
pub struct ViewportCamera {
    state: ViewportState,
    grid_width: u32,
    grid_height: u32,
    viewport: Size,
    needs_centering: bool,
    anchor: ZoomAnchor,
}

impl ViewportCamera {
    #[must_use]
    pub fn new(cell_size: CellSize, anchor: ZoomAnchor) -> Self {
        Self {
            state: ViewportState {
                pan: Vector::new(0.0, 0.0),
                cell_size,
            },
            grid_width: 0,
            grid_height: 0,
            viewport: Size::ZERO,
            needs_centering: false,
            anchor,
        }
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub fn cell_size(&self) -> CellSize {
        self.state.cell_size
    }

    #[must_use]
    pub fn pan(&self) -> Vector {
        self.state.pan
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn grid_dimensions(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    pub fn set_anchor(&mut self, anchor: ZoomAnchor) {
        self.anchor = anchor;
    }

    /// Starts a display session for a new grid: the camera re-centers on it,
    /// immediately if the viewport size is known, otherwise on the next
    /// [`Self::set_viewport`].
    pub fn set_grid(&mut self, width: u32, height: u32) {
        self.grid_width = width;
        self.grid_height = height;
        if self.has_viewport() {
            self.center_grid();
        } else {
            self.needs_centering = true;
        }
    }

    /// Records a new viewport size. Pan is kept as is, unless a centering
    /// from [`Self::set_grid`] is still pending.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        if self.needs_centering && self.has_viewport() {
            self.center_grid();
        }
    }

    fn has_viewport(&self) -> bool {
        self.viewport.width > 0.0 && self.viewport.height > 0.0
    }

    // -------------------------------------------------------------------------
    // Transforms
    // -------------------------------------------------------------------------

    /// Top-left screen position of a cell.
    #[must_use]
    pub fn world_to_screen(&self, col: u32, row: u32) -> Point {
        let size = self.state.cell_size.as_f32();
        Point::new(
            col as f32 * size + self.state.pan.x,
            row as f32 * size + self.state.pan.y,
        )
    }

    /// Cell under a screen position, or `None` outside the grid.
    #[must_use]
    pub fn screen_to_grid(&self, position: Point) -> Option<(u32, u32)> {
        let size = self.state.cell_size.as_f32();
        let col = ((position.x - self.state.pan.x) / size).floor();
        let row = ((position.y - self.state.pan.y) / size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as u32, row as u32);
        (col < self.grid_width && row < self.grid_height).then_some((col, row))
    }

    /// Row-major index of the cell under a screen position.
    #[must_use]
    pub fn screen_to_index(&self, position: Point) -> Option<usize> {
        self.screen_to_grid(position)
            .map(|(col, row)| cell_index(col, row, self.grid_width))
    }

    /// Colored part of a cell in screen space (the trailing gap excluded).
    #[must_use]
    pub fn cell_rect(&self, col: u32, row: u32) -> Rectangle {
        let fill = self.state.cell_size.fill() as f32;
        Rectangle::new(self.world_to_screen(col, row), Size::new(fill, fill))
    }

    /// Cells whose pitch rectangle intersects a viewport of the given size.
    #[must_use]
    pub fn visible_cells(&self, viewport: Size) -> CellRange {
        let size = self.state.cell_size.as_f32();
        CellRange {
            cols: visible_span(self.state.pan.x, viewport.width, size, self.grid_width),
            rows: visible_span(self.state.pan.y, viewport.height, size, self.grid_height),
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub fn pan_by(&mut self, delta: Vector) {
        self.state.pan = self.state.pan + delta;
    }

    /// Applies one zoom step, keeping the grid point under the anchor fixed.
    ///
    /// The anchor is `cursor` when the policy is [`ZoomAnchor::Cursor`] and a
    /// cursor is given, the viewport center otherwise. Returns false when the
    /// cell size is already at its bound.
    pub fn zoom(&mut self, direction: ZoomDirection, cursor: Option<Point>) -> bool {
        let old = self.state.cell_size;
        let new = old.step(direction);
        if new == old {
            return false;
        }

        let anchor = match (self.anchor, cursor) {
            (ZoomAnchor::Cursor, Some(cursor)) => cursor,
            _ => self.viewport_center(),
        };
        let scale = new.as_f32() / old.as_f32();
        self.state.pan = Vector::new(
            anchor.x - (anchor.x - self.state.pan.x) * scale,
            anchor.y - (anchor.y - self.state.pan.y) * scale,
        );
        self.state.cell_size = new;
        tracing::debug!(cell_size = new.value(), "zoomed");
        true
    }

    /// Sets pan so that the center of `(col, row)` sits at the center of a
    /// `viewport`-sized surface.
    pub fn center_on(&mut self, col: u32, row: u32, viewport: Size) {
        let size = self.state.cell_size.as_f32();
        let half_fill = self.state.cell_size.fill() as f32 / 2.0;
        self.state.pan = Vector::new(
            viewport.width / 2.0 - (col as f32 * size + half_fill),
            viewport.height / 2.0 - (row as f32 * size + half_fill),
        );
    }

    /// Centers on a cell index using the current viewport. Out-of-range
    /// indices are ignored and return false.
    pub fn center_on_index(&mut self, index: usize) -> bool {
        let count = self.grid_width as usize * self.grid_height as usize;
        if index >= count {
            tracing::debug!(index, count, "ignoring center request outside the grid");
            return false;
        }
        let (col, row) = cell_position(index, self.grid_width);
        self.center_on(col, row, self.viewport);
        true
    }

    /// Centers the whole grid in the viewport.
    pub fn center_grid(&mut self) {
        let size = self.state.cell_size.as_f32();
        let gap = (self.state.cell_size.value() - self.state.cell_size.fill()) as f32;
        let grid_w = self.grid_width as f32 * size - gap;
        let grid_h = self.grid_height as f32 * size - gap;
        self.state.pan = Vector::new(
            (self.viewport.width - grid_w) / 2.0,
            (self.viewport.height - grid_h) / 2.0,
        );
        self.needs_centering = false;
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }
}
