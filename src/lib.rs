// SPDX-License-Identifier: MPL-2.0
//! `pixel_lens` turns an image into a small grid of color cells and lets
//! the user explore it.
//!
//! The crate has two cores: the [`quantize`] pipeline, which downsamples an
//! image into a bounded [`domain::GridImage`] at a chosen color depth, and
//! the viewport engine ([`ui::state`], [`render`], [`ui::grid_view`]), which
//! pans, zooms, culls and hit-tests that grid. The [`selection`] broker keeps
//! the grid view and the tabular [`ui::inspector`] in agreement on the
//! active cell.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod quantize;
pub mod render;
pub mod selection;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;
