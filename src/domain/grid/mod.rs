// SPDX-License-Identifier: MPL-2.0
//! Quantized grid data model.
//!
//! A [`GridImage`] is an immutable, row-major sequence of [`Cell`]s. The
//! index ↔ (col, row) mapping defined here is shared by the quantizer, the
//! render culling and pointer hit-testing.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Index mapping
// =============================================================================

/// Returns the row-major index of `(col, row)` in a grid `width` cells wide.
#[must_use]
pub fn cell_index(col: u32, row: u32, width: u32) -> usize {
    row as usize * width as usize + col as usize
}

/// Returns `(col, row)` for a row-major index in a grid `width` cells wide.
///
/// `width` must be non-zero.
#[must_use]
pub fn cell_position(index: usize, width: u32) -> (u32, u32) {
    let width = width.max(1) as usize;
    ((index % width) as u32, (index / width) as u32)
}

// =============================================================================
// QuantizationMode
// =============================================================================

/// Color depth applied to every cell after resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantizationMode {
    /// Black/white threshold.
    Bit1,
    /// Nearest entry of the 16-color palette.
    Bit4,
    /// 3-3-2 bits per channel.
    Bit8,
    /// Passthrough.
    #[default]
    Bit24,
}

impl QuantizationMode {
    pub const ALL: [QuantizationMode; 4] = [
        QuantizationMode::Bit1,
        QuantizationMode::Bit4,
        QuantizationMode::Bit8,
        QuantizationMode::Bit24,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuantizationMode::Bit1 => "bit1",
            QuantizationMode::Bit4 => "bit4",
            QuantizationMode::Bit8 => "bit8",
            QuantizationMode::Bit24 => "bit24",
        }
    }

    /// Human readable label used by the mode picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuantizationMode::Bit1 => "1-bit (mono)",
            QuantizationMode::Bit4 => "4-bit (16 colors)",
            QuantizationMode::Bit8 => "8-bit (256 colors)",
            QuantizationMode::Bit24 => "24-bit (true color)",
        }
    }
}

impl fmt::Display for QuantizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuantizationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bit1" => Ok(QuantizationMode::Bit1),
            "bit4" => Ok(QuantizationMode::Bit4),
            "bit8" => Ok(QuantizationMode::Bit8),
            "bit24" => Ok(QuantizationMode::Bit24),
            other => Err(Error::Config(format!("unknown quantization mode: {other}"))),
        }
    }
}

// =============================================================================
// Cell
// =============================================================================

/// One quantized color sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    hex: String,
}

impl Cell {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            hex: format!("#{r:02X}{g:02X}{b:02X}"),
        }
    }

    /// `#RRGGBB`, uppercase.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Label shown by the tabular view, e.g. `[255,0,0]`.
    #[must_use]
    pub fn rgb_label(&self) -> String {
        format!("[{},{},{}]", self.r, self.g, self.b)
    }

    #[must_use]
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

// =============================================================================
// GridImage
// =============================================================================

/// Process-unique identity of a [`GridImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

impl GridId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// The quantized grid. Immutable; a new image replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct GridImage {
    id: GridId,
    width: u32,
    height: u32,
    mode: QuantizationMode,
    cells: Vec<Cell>,
}

impl GridImage {
    /// Builds a grid from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if a dimension is zero or the cell count
    /// does not match `width * height`.
    pub fn new(width: u32, height: u32, mode: QuantizationMode, cells: Vec<Cell>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Decode(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(Error::Decode(format!(
                "expected {expected} cells for a {width}x{height} grid, got {}",
                cells.len()
            )));
        }
        Ok(Self {
            id: GridId::next(),
            width,
            height,
            mode,
            cells,
        })
    }

    #[must_use]
    pub fn id(&self) -> GridId {
        self.id
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn mode(&self) -> QuantizationMode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(cell_index(col, row, self.width))
    }

    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Returns `(col, row)` of an index, or `None` when out of range.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<(u32, u32)> {
        self.contains_index(index)
            .then(|| cell_position(index, self.width))
    }
}
