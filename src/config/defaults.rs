// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Grid**: Quantizer output bounds
//! - **Cells**: On-screen cell pitch, gap and zoom step
//! - **Input**: Pointer gesture thresholds
//! - **Inspector**: Tabular view geometry

// ==========================================================================
// Grid Defaults
// ==========================================================================

/// Smallest accepted value for the maximum grid dimension.
pub const MIN_MAX_DIMENSION: u32 = 16;

/// Largest accepted value for the maximum grid dimension.
pub const MAX_MAX_DIMENSION: u32 = 100;

/// Maximum grid dimension used when nothing else is configured.
pub const DEFAULT_MAX_DIMENSION: u32 = 32;

// ==========================================================================
// Cell Defaults
// ==========================================================================

/// Gap between two neighbouring cells, in logical pixels.
/// The cell size always includes this gap.
pub const CELL_GAP: u32 = 1;

/// Smallest cell size (pitch) in logical pixels.
pub const MIN_CELL_SIZE: u32 = 2;

/// Largest cell size (pitch) in logical pixels.
pub const MAX_CELL_SIZE: u32 = 32;

/// Cell size when opening an image: 20px of color plus the gap.
pub const DEFAULT_CELL_SIZE: u32 = 21;

/// Cell size change applied by one zoom step.
pub const CELL_SIZE_STEP: u32 = 2;

/// Largest side, in pixels, allowed for the cached static layer.
pub const MAX_LAYER_SIDE_PX: u32 = 4096;

// ==========================================================================
// Input Defaults
// ==========================================================================

/// Pointer displacement (logical pixels) that turns a press into a drag.
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

// ==========================================================================
// Inspector Defaults
// ==========================================================================

/// Width of one cell in the tabular view.
pub const INSPECTOR_CELL_WIDTH: f32 = 90.0;

/// Height of one cell in the tabular view.
pub const INSPECTOR_CELL_HEIGHT: f32 = 20.0;

/// Label font size in the tabular view.
pub const INSPECTOR_FONT_SIZE: f32 = 12.0;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_MAX_DIMENSION >= 1);
    assert!(MIN_MAX_DIMENSION <= DEFAULT_MAX_DIMENSION);
    assert!(DEFAULT_MAX_DIMENSION <= MAX_MAX_DIMENSION);

    // At least one pixel of color must remain once the gap is removed.
    assert!(MIN_CELL_SIZE > CELL_GAP);
    assert!(MIN_CELL_SIZE <= DEFAULT_CELL_SIZE);
    assert!(DEFAULT_CELL_SIZE <= MAX_CELL_SIZE);
    assert!(CELL_SIZE_STEP > 0);

    // The largest grid at the largest zoom must fit the static layer budget.
    assert!(MAX_MAX_DIMENSION * MAX_CELL_SIZE <= MAX_LAYER_SIDE_PX);

    assert!(DRAG_THRESHOLD_PX > 0.0);
    assert!(INSPECTOR_CELL_WIDTH > 0.0);
    assert!(INSPECTOR_CELL_HEIGHT > 0.0);
};
