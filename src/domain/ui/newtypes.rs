// SPDX-License-Identifier: MPL-2.0
//! UI newtypes.
//!
//! This module provides type-safe wrappers for UI values,
//! ensuring they are always within valid ranges.

use crate::config::defaults::{
    CELL_GAP, CELL_SIZE_STEP, DEFAULT_CELL_SIZE, DEFAULT_MAX_DIMENSION, MAX_CELL_SIZE,
    MAX_MAX_DIMENSION, MIN_CELL_SIZE, MIN_MAX_DIMENSION,
};

// =============================================================================
// MaxDimension
// =============================================================================

/// Longest side of a quantized grid, guaranteed to be within 16–100 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxDimension(u32);

impl MaxDimension {
    /// Creates a new maximum dimension, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_MAX_DIMENSION, MAX_MAX_DIMENSION))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for MaxDimension {
    fn default() -> Self {
        Self(DEFAULT_MAX_DIMENSION)
    }
}

// =============================================================================
// ZoomDirection
// =============================================================================

/// One discrete zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

// =============================================================================
// CellSize
// =============================================================================

/// Pitch of one grid cell on screen, in logical pixels, gap included.
///
/// Always leaves at least one pixel of color after the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize(u32);

impl CellSize {
    /// Creates a new cell size, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE))
    }

    /// Returns the pitch in logical pixels.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the pitch as a float for screen-space math.
    #[must_use]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }

    /// Returns the colored part of the cell (pitch minus gap).
    #[must_use]
    pub fn fill(self) -> u32 {
        self.0 - CELL_GAP
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_CELL_SIZE
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_CELL_SIZE
    }

    /// Applies one zoom step in the given direction.
    #[must_use]
    pub fn step(self, direction: ZoomDirection) -> Self {
        match direction {
            ZoomDirection::In => Self::new(self.0.saturating_add(CELL_SIZE_STEP)),
            ZoomDirection::Out => Self::new(self.0.saturating_sub(CELL_SIZE_STEP)),
        }
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self(DEFAULT_CELL_SIZE)
    }
}
