// SPDX-License-Identifier: MPL-2.0
//! Message handling for [`App`].

use super::{App, Message};
use crate::config;
use crate::domain::{MaxDimension, ZoomDirection};
use crate::error::Error;
use crate::quantize::{self, LoadOutcome, LoadTicket};
use crate::ui::grid_view::{self, input};
use crate::ui::toolbar;
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;

/// Extensions offered by the open dialog.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "svg",
];

impl App {
    pub(super) fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Grid(msg) => {
                self.handle_grid(msg);
                Task::none()
            }
            Message::Inspector(msg) => {
                self.inspector.handle(msg, &self.selection);
                Task::none()
            }
            Message::Toolbar(msg) => self.handle_toolbar(msg),
            Message::OpenFileDialogResult(Some(path)) | Message::FileDropped(path) => {
                self.open(path)
            }
            Message::OpenFileDialogResult(None) => Task::none(),
            Message::SourceRead(generation, Ok(bytes)) => self
                .session
                .begin_reserved(generation, bytes)
                .map_or_else(Task::none, spawn),
            Message::SourceRead(generation, Err(err)) => {
                if let LoadOutcome::Failed(err) = self.session.fail_reserved(generation, err) {
                    self.status = Some(err.to_string());
                }
                Task::none()
            }
            Message::Quantized(ticket, result) => {
                self.handle_quantized(ticket, result);
                Task::none()
            }
        };

        // Both views observe the broker; apply its one-shot command and
        // refresh the table's view of it after every state change.
        if input::consume_center_request(&mut self.camera, &self.selection) {
            tracing::debug!(pan = ?self.camera.pan(), "grid centered on request");
        }
        self.inspector.sync();

        task
    }

    fn handle_grid(&mut self, msg: grid_view::Message) {
        match msg {
            grid_view::Message::Resized(size) => self.camera.set_viewport(size),
            grid_view::Message::Input { viewport, event } => {
                self.camera.set_viewport(viewport);
                let effect = self.input.handle(event, &mut self.camera, &self.selection);
                if effect == input::Effect::Zoomed {
                    self.refresh_layer();
                }
            }
        }
    }

    fn handle_toolbar(&mut self, msg: toolbar::Message) -> Task<Message> {
        match msg {
            toolbar::Message::Open => open_file_dialog(),
            toolbar::Message::LoadSample => match quantize::sample_png() {
                Ok(bytes) => self.submit(Arc::new(bytes)),
                Err(err) => {
                    self.status = Some(err.to_string());
                    Task::none()
                }
            },
            toolbar::Message::ModeSelected(mode) => {
                self.config.grid.mode = Some(mode);
                self.persist_config();
                self.session.set_mode(mode).map_or_else(Task::none, spawn)
            }
            toolbar::Message::MaxDimensionChanged(value) => {
                self.max_dimension_draft = Some(MaxDimension::new(value));
                Task::none()
            }
            toolbar::Message::MaxDimensionReleased => {
                let Some(max) = self.max_dimension_draft.take() else {
                    return Task::none();
                };
                if max == self.session.max_dimension() {
                    return Task::none();
                }
                self.config.grid.max_dimension = Some(max.value());
                self.persist_config();
                self.session
                    .set_max_dimension(max)
                    .map_or_else(Task::none, spawn)
            }
            toolbar::Message::ZoomIn => {
                self.zoom(ZoomDirection::In);
                Task::none()
            }
            toolbar::Message::ZoomOut => {
                self.zoom(ZoomDirection::Out);
                Task::none()
            }
        }
    }

    fn zoom(&mut self, direction: ZoomDirection) {
        if self.session.current().is_some() && self.camera.zoom(direction, None) {
            self.refresh_layer();
        }
    }

    /// Reads `path` under a freshly reserved load generation.
    pub(super) fn open(&mut self, path: PathBuf) -> Task<Message> {
        let generation = self.session.reserve();
        read_source(path, generation)
    }

    /// Starts quantizing new source bytes.
    fn submit(&mut self, bytes: Arc<Vec<u8>>) -> Task<Message> {
        spawn(self.session.begin(bytes))
    }

    fn handle_quantized(
        &mut self,
        ticket: LoadTicket,
        result: Result<quantize::QuantizedImage, Error>,
    ) {
        match self.session.complete(ticket, result) {
            LoadOutcome::Applied => {
                let Some((width, height)) = self
                    .session
                    .current()
                    .map(|image| (image.grid.width(), image.grid.height()))
                else {
                    return;
                };
                self.camera.set_grid(width, height);
                self.selection.clear();
                self.input = input::State::default();
                self.inspector.grid_replaced();
                self.status = None;
                self.refresh_layer();
            }
            LoadOutcome::Failed(err) => {
                self.status = Some(err.to_string());
            }
            LoadOutcome::Discarded => {}
        }
    }

    /// Rebuilds the static layer if the grid or cell size changed.
    fn refresh_layer(&mut self) {
        let Some(image) = self.session.current() else {
            self.engine.invalidate();
            return;
        };
        if let Err(err) = self.engine.prepare(&image.grid, self.camera.cell_size()) {
            // Frames fall back to drawing visible cells directly.
            tracing::warn!(error = %err, "static layer unavailable");
            self.engine.invalidate();
        }
    }

    fn persist_config(&self) {
        if let Err(err) = config::save(&self.config) {
            tracing::warn!(error = %err, "could not save settings");
        }
    }
}

fn spawn(ticket: LoadTicket) -> Task<Message> {
    let future = ticket.run();
    Task::perform(future, move |result| Message::Quantized(ticket, result))
}

/// Reads a file in the background.
fn read_source(path: PathBuf, generation: u64) -> Task<Message> {
    tracing::info!(path = %path.display(), generation, "loading image");
    Task::perform(
        async move {
            tokio::fs::read(&path)
                .await
                .map(Arc::new)
                .map_err(Error::from)
        },
        move |result| Message::SourceRead(generation, result),
    )
}

fn open_file_dialog() -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .set_title("Open Image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}
