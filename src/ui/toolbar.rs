// SPDX-License-Identifier: MPL-2.0
//! Toolbar above the grid: image source, quantizer settings and zoom.

use crate::config::defaults::{MAX_MAX_DIMENSION, MIN_MAX_DIMENSION};
use crate::domain::{CellSize, MaxDimension, QuantizationMode};
use iced::alignment::Vertical;
use iced::widget::{button, pick_list, slider, Container, Row, Text};
use iced::{Element, Length};

const SPACING: f32 = 8.0;
const PADDING: f32 = 8.0;
const SLIDER_WIDTH: f32 = 160.0;

/// Contextual data needed to render the toolbar.
pub struct ViewContext {
    pub mode: QuantizationMode,
    pub max_dimension: MaxDimension,
    pub cell_size: CellSize,
    pub has_grid: bool,
    pub loading: bool,
}

/// Messages emitted by the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Open,
    LoadSample,
    ModeSelected(QuantizationMode),
    /// The slider moved; only the readout follows.
    MaxDimensionChanged(u32),
    /// The slider was released; the grid is rebuilt at the shown value.
    MaxDimensionReleased,
    ZoomIn,
    ZoomOut,
}

/// Render the toolbar.
pub fn view<'a>(ctx: ViewContext) -> Element<'a, Message> {
    let open = button(Text::new("Open…")).on_press(Message::Open);
    let sample = button(Text::new("Load sample")).on_press(Message::LoadSample);

    let mode = pick_list(QuantizationMode::ALL, Some(ctx.mode), Message::ModeSelected);

    let max = ctx.max_dimension.value();
    let max_slider = slider(
        MIN_MAX_DIMENSION..=MAX_MAX_DIMENSION,
        max,
        Message::MaxDimensionChanged,
    )
    .step(1u32)
    .on_release(Message::MaxDimensionReleased)
    .width(Length::Fixed(SLIDER_WIDTH));

    let zoom_out = button(Text::new("−"));
    let zoom_out = if ctx.has_grid && !ctx.cell_size.is_min() {
        zoom_out.on_press(Message::ZoomOut)
    } else {
        zoom_out
    };
    let zoom_in = button(Text::new("+"));
    let zoom_in = if ctx.has_grid && !ctx.cell_size.is_max() {
        zoom_in.on_press(Message::ZoomIn)
    } else {
        zoom_in
    };

    let mut row = Row::new()
        .spacing(SPACING)
        .padding(PADDING)
        .align_y(Vertical::Center)
        .push(open)
        .push(sample)
        .push(mode)
        .push(Text::new(format!("Max {max}")))
        .push(max_slider)
        .push(zoom_out)
        .push(Text::new(format!("{} px", ctx.cell_size.value())))
        .push(zoom_in);

    if ctx.loading {
        row = row.push(Text::new("Quantizing…"));
    }

    Container::new(row).width(Length::Fill).into()
}
