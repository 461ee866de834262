// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! owns its state, renders from it, and reports user intent as messages.
//!
//! - [`grid_view`] - Pannable, zoomable canvas over the cell grid
//! - [`inspector`] - Scrollable table listing each cell's color
//! - [`toolbar`] - Source, quantizer and zoom controls
//! - [`state`] - Camera and gesture state shared by the grid view

pub mod grid_view;
pub mod inspector;
pub mod state;
pub mod toolbar;
