// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::domain::QuantizationMode;
use crate::error::Error;
use crate::quantize::{LoadTicket, QuantizedImage};
use crate::ui::{grid_view, inspector, toolbar};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Grid(grid_view::Message),
    Inspector(inspector::Message),
    Toolbar(toolbar::Message),
    /// Result from the open file dialog.
    OpenFileDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Raw bytes of a chosen file, or the read error, tagged with the load
    /// generation reserved when the file was chosen.
    SourceRead(u64, Result<Arc<Vec<u8>>, Error>),
    /// A quantization finished; stale tickets are discarded.
    Quantized(LoadTicket, Result<QuantizedImage, Error>),
}

/// Runtime flags passed from `main.rs` into the application.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Optional image path to preload on startup.
    pub file_path: Option<PathBuf>,
    /// Overrides `[grid] max_dimension` for this session.
    pub max_dimension: Option<u32>,
    /// Overrides `[grid] mode` for this session.
    pub mode: Option<QuantizationMode>,
}
