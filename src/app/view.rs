// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Lays out the toolbar, the grid canvas next to the tabular inspector, and
//! a one-line status bar.

use super::{subscription, App, Message};
use crate::quantize::QuantizedImage;
use crate::ui::grid_view::GridCanvas;
use crate::ui::toolbar::{self, ViewContext as ToolbarViewContext};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{Column, Container, Row, Text};
use iced::{Element, Length, Subscription};

const STATUS_PADDING: f32 = 6.0;
const STATUS_TEXT_SIZE: f32 = 13.0;
const PANE_SPACING: f32 = 4.0;
const GRID_PORTION: u16 = 3;
const INSPECTOR_PORTION: u16 = 2;

impl App {
    pub(super) fn view(&self) -> Element<'_, Message> {
        let toolbar = toolbar::view(ToolbarViewContext {
            mode: self.session.mode(),
            max_dimension: self
                .max_dimension_draft
                .unwrap_or_else(|| self.session.max_dimension()),
            cell_size: self.camera.cell_size(),
            has_grid: self.session.current().is_some(),
            loading: self.session.is_loading(),
        })
        .map(Message::Toolbar);

        let body: Element<'_, Message> = match self.session.current() {
            Some(image) => self.view_panes(image),
            None => view_placeholder(),
        };

        Column::new()
            .push(toolbar)
            .push(
                Container::new(body)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .push(self.view_status())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_panes<'a>(&'a self, image: &'a QuantizedImage) -> Element<'a, Message> {
        let grid = GridCanvas {
            engine: &self.engine,
            grid: Some(&*image.grid),
            camera: &self.camera,
            selection: self.selection.snapshot(),
        }
        .view()
        .map(Message::Grid);

        let inspector = self.inspector.view(&image.grid).map(Message::Inspector);

        Row::new()
            .push(
                Container::new(grid)
                    .width(Length::FillPortion(GRID_PORTION))
                    .height(Length::Fill),
            )
            .push(
                Container::new(inspector)
                    .width(Length::FillPortion(INSPECTOR_PORTION))
                    .height(Length::Fill),
            )
            .spacing(PANE_SPACING)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn view_status(&self) -> Element<'_, Message> {
        let line = match (&self.status, self.session.current()) {
            (Some(error), _) => error.clone(),
            (None, Some(image)) => status_line(image, self.selection.active_index()),
            (None, None) => "Open an image or load the sample to begin.".to_string(),
        };
        Container::new(Text::new(line).size(STATUS_TEXT_SIZE))
            .padding(STATUS_PADDING)
            .width(Length::Fill)
            .into()
    }

    pub(super) fn subscription(&self) -> Subscription<Message> {
        subscription::create_event_subscription()
    }
}

fn view_placeholder<'a>() -> Element<'a, Message> {
    Container::new(Text::new("No image loaded"))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
}

/// Summary of the loaded image and, when a cell is selected, its color.
fn status_line(image: &QuantizedImage, active: Option<usize>) -> String {
    let grid = &image.grid;
    let mut line = format!(
        "source {}x{} → grid {}x{} · {}",
        image.original.width(),
        image.original.height(),
        grid.width(),
        grid.height(),
        grid.mode().label()
    );
    if let Some((index, cell)) = active.and_then(|i| grid.cell_at(i).map(|cell| (i, cell))) {
        let (col, row) = crate::domain::cell_position(index, grid.width());
        line.push_str(&format!(
            " · cell ({col}, {row}) {} {}",
            cell.hex(),
            cell.rgb_label()
        ));
    }
    line
}
