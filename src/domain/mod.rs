// SPDX-License-Identifier: MPL-2.0
//! Domain layer - plain data types with no dependency on the UI toolkit.
//!
//! # Modules
//!
//! - [`grid`]: The quantized grid ([`GridImage`], [`Cell`], [`QuantizationMode`])
//!   and the index ↔ (col, row) mapping shared by every consumer.
//! - [`ui`]: UI value objects ([`CellSize`](ui::newtypes::CellSize),
//!   [`MaxDimension`](ui::newtypes::MaxDimension))

pub mod grid;
pub mod ui;

pub use grid::{cell_index, cell_position, Cell, GridId, GridImage, QuantizationMode};
pub use ui::{CellSize, MaxDimension, ZoomDirection};
