// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! Per-view state kept out of the widgets: the grid camera and the pointer
//! gesture used to tell drags from clicks.

pub mod drag;
pub mod viewport;

pub use drag::{DragState, GestureStep};
pub use viewport::{visible_span, CellRange, ViewportCamera, ViewportState};
