// SPDX-License-Identifier: MPL-2.0
//! Load sessions: which quantization result is allowed to become current.
//!
//! Every submission bumps a generation counter and hands out a
//! [`LoadTicket`]. A result only replaces the current grid when its ticket
//! still carries the latest generation; anything older is discarded when it
//! resolves, so a slow first decode can never overwrite a faster second one.
//!
//! A file read can claim its generation up front with [`GridSession::reserve`],
//! before its bytes exist. Reads that finish out of order then lose to the
//! newer request just like decodes do.

use super::{quantize_async, QuantizedImage};
use crate::domain::{MaxDimension, QuantizationMode};
use crate::error::{Error, Result};
use std::future::Future;
use std::sync::Arc;

/// Handle for one pending quantization.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    source: Arc<Vec<u8>>,
    max_dimension: MaxDimension,
    mode: QuantizationMode,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the future that performs the quantization for this ticket.
    pub fn run(&self) -> impl Future<Output = Result<QuantizedImage>> + Send + 'static {
        quantize_async(Arc::clone(&self.source), self.max_dimension, self.mode)
    }
}

/// What [`GridSession::complete`] did with a result.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The result became the current grid.
    Applied,
    /// The latest request failed; the previous grid is still current.
    Failed(Error),
    /// A newer request was issued meanwhile; the result was dropped.
    Discarded,
}

/// Owns the current quantized image and the request generation.
#[derive(Debug, Clone)]
pub struct GridSession {
    generation: u64,
    pending: bool,
    /// The latest request is a reserved read still waiting for its bytes.
    awaiting_source: bool,
    current: Option<QuantizedImage>,
    /// Bytes behind `current`.
    source: Option<Arc<Vec<u8>>>,
    /// Bytes of the latest submission, re-quantized when the settings change.
    latest_source: Option<Arc<Vec<u8>>>,
    max_dimension: MaxDimension,
    mode: QuantizationMode,
}

impl GridSession {
    #[must_use]
    pub fn new(max_dimension: MaxDimension, mode: QuantizationMode) -> Self {
        Self {
            generation: 0,
            pending: false,
            awaiting_source: false,
            current: None,
            source: None,
            latest_source: None,
            max_dimension,
            mode,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&QuantizedImage> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn max_dimension(&self) -> MaxDimension {
        self.max_dimension
    }

    #[must_use]
    pub fn mode(&self) -> QuantizationMode {
        self.mode
    }

    /// Starts a request for new image bytes with the current settings.
    pub fn begin(&mut self, bytes: Arc<Vec<u8>>) -> LoadTicket {
        self.generation += 1;
        self.pending = true;
        self.submit(bytes)
    }

    /// Claims a generation for bytes that are still being read.
    ///
    /// Pass the returned value to [`Self::begin_reserved`] once the bytes
    /// arrive, or to [`Self::fail_reserved`] if the read fails.
    pub fn reserve(&mut self) -> u64 {
        self.generation += 1;
        self.pending = true;
        self.awaiting_source = true;
        tracing::debug!(generation = self.generation, "read reserved");
        self.generation
    }

    /// Turns a reserved read into a ticket, using the settings in effect now.
    ///
    /// Returns `None` when a newer request was made while the bytes were
    /// being read.
    pub fn begin_reserved(&mut self, generation: u64, bytes: Arc<Vec<u8>>) -> Option<LoadTicket> {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                latest = self.generation,
                "discarding stale read"
            );
            return None;
        }
        Some(self.submit(bytes))
    }

    /// Reports a failed reserved read.
    pub fn fail_reserved(&mut self, generation: u64, err: Error) -> LoadOutcome {
        if generation != self.generation {
            tracing::debug!(stale = generation, latest = self.generation, "discarding stale read error");
            return LoadOutcome::Discarded;
        }
        tracing::warn!(generation, error = %err, "read failed");
        self.settle_failure();
        LoadOutcome::Failed(err)
    }

    fn submit(&mut self, bytes: Arc<Vec<u8>>) -> LoadTicket {
        self.awaiting_source = false;
        self.latest_source = Some(Arc::clone(&bytes));
        tracing::debug!(generation = self.generation, bytes = bytes.len(), "decode submitted");
        LoadTicket {
            generation: self.generation,
            source: bytes,
            max_dimension: self.max_dimension,
            mode: self.mode,
        }
    }

    /// The latest request failed: settings changes go back to the displayed image.
    fn settle_failure(&mut self) {
        self.pending = false;
        self.awaiting_source = false;
        self.latest_source = self.source.clone();
    }

    /// Changes the color depth. Returns a ticket to re-quantize the latest
    /// submitted source if there is one and the mode actually changed.
    ///
    /// While a reserved read is outstanding no ticket is issued; the read
    /// picks up the new setting when its bytes arrive.
    pub fn set_mode(&mut self, mode: QuantizationMode) -> Option<LoadTicket> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        self.requantize()
    }

    /// Changes the maximum dimension. Same contract as [`Self::set_mode`].
    pub fn set_max_dimension(&mut self, max_dimension: MaxDimension) -> Option<LoadTicket> {
        if self.max_dimension == max_dimension {
            return None;
        }
        self.max_dimension = max_dimension;
        self.requantize()
    }

    fn requantize(&mut self) -> Option<LoadTicket> {
        if self.awaiting_source {
            return None;
        }
        let source = self.latest_source.clone()?;
        Some(self.begin(source))
    }

    /// Resolves a ticket.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<QuantizedImage>) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                latest = self.generation,
                "discarding stale decode result"
            );
            return LoadOutcome::Discarded;
        }
        self.pending = false;

        match result {
            Ok(image) => {
                tracing::info!(
                    generation = ticket.generation,
                    width = image.grid.width(),
                    height = image.grid.height(),
                    "grid replaced"
                );
                self.current = Some(image);
                self.source = Some(ticket.source);
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(generation = ticket.generation, error = %err, "decode failed");
                self.settle_failure();
                LoadOutcome::Failed(err)
            }
        }
    }
}
