// SPDX-License-Identifier: MPL-2.0
//! Tabular view of the grid ("data inspector").
//!
//! One fixed-size table cell per grid cell, labelled `[r,g,b]`, inside a
//! scrollable that moves independently of the grid view. Only the rows and
//! columns intersecting the scroll viewport are drawn. The table observes the
//! [`SelectionBroker`] through a watch receiver and redraws when it changes.

use crate::config::defaults::{INSPECTOR_CELL_HEIGHT, INSPECTOR_CELL_WIDTH, INSPECTOR_FONT_SIZE};
use crate::domain::{cell_index, GridImage};
use crate::selection::{SelectionBroker, SelectionState};
use crate::ui::state::{visible_span, CellRange};
use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Path, Stroke, Text};
use iced::widget::scrollable::{AbsoluteOffset, Direction, Scrollbar, Viewport};
use iced::widget::{responsive, Action, Scrollable};
use iced::{Color, Element, Event, Length, Point, Rectangle, Size};
use std::cell::Cell;
use tokio::sync::watch;

const CELL_BACKGROUND: Color = Color::from_rgb(0.12, 0.12, 0.12);
const HOVER_BACKGROUND: Color = Color::from_rgb(0.22, 0.22, 0.22);
const ACTIVE_BACKGROUND: Color = Color::from_rgb(0.04, 0.24, 0.04);
const ACTIVE_BORDER: Color = Color::from_rgb(0.0, 1.0, 0.0);
const GRID_LINE: Color = Color::from_rgb(0.2, 0.2, 0.2);
const LABEL: Color = Color::from_rgb(0.8, 0.8, 0.8);
const SWATCH_SIZE: f32 = 10.0;
const PADDING: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Scrolled(AbsoluteOffset),
    Hovered(Option<usize>),
    Clicked(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The selection was changed from the table.
    SelectionChanged,
}

/// Table-side state: scroll offset, cached geometry and the selection view.
#[derive(Debug)]
pub struct State {
    offset: AbsoluteOffset,
    selection: SelectionState,
    receiver: watch::Receiver<SelectionState>,
    cache: Cache,
    cached_viewport: Cell<Size>,
}

impl State {
    #[must_use]
    pub fn new(receiver: watch::Receiver<SelectionState>) -> Self {
        let selection = *receiver.borrow();
        Self {
            offset: AbsoluteOffset { x: 0.0, y: 0.0 },
            selection,
            receiver,
            cache: Cache::new(),
            cached_viewport: Cell::new(Size::ZERO),
        }
    }

    #[must_use]
    pub fn offset(&self) -> AbsoluteOffset {
        self.offset
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Pulls the latest selection if the broker reported a change.
    ///
    /// Returns true when the table has to be redrawn.
    pub fn sync(&mut self) -> bool {
        if !self.receiver.has_changed().unwrap_or(false) {
            return false;
        }
        let latest = *self.receiver.borrow_and_update();
        let redraw = latest.active_index != self.selection.active_index
            || latest.hover_index != self.selection.hover_index;
        self.selection = latest;
        if redraw {
            self.cache.clear();
        }
        redraw
    }

    /// Called when a new grid replaces the old one.
    pub fn grid_replaced(&mut self) {
        self.cache.clear();
    }

    pub fn handle(&mut self, msg: Message, broker: &SelectionBroker) -> Effect {
        match msg {
            Message::Scrolled(offset) => {
                if offset != self.offset {
                    self.offset = offset;
                    self.cache.clear();
                }
                Effect::None
            }
            Message::Hovered(index) => {
                if broker.set_hover(index) {
                    Effect::SelectionChanged
                } else {
                    Effect::None
                }
            }
            Message::Clicked(index) => {
                broker.set_active(Some(index));
                broker.request_center(index);
                Effect::SelectionChanged
            }
        }
    }

    /// Table cells intersecting a scroll viewport of `viewport` size.
    #[must_use]
    pub fn visible_cells(&self, grid: &GridImage, viewport: Size) -> CellRange {
        CellRange {
            cols: visible_span(-self.offset.x, viewport.width, INSPECTOR_CELL_WIDTH, grid.width()),
            rows: visible_span(-self.offset.y, viewport.height, INSPECTOR_CELL_HEIGHT, grid.height()),
        }
    }

    pub fn view<'a>(&'a self, grid: &'a GridImage) -> Element<'a, Message> {
        responsive(move |viewport: Size| {
            let content = Canvas::new(Table {
                grid,
                state: self,
                viewport,
            })
            .width(Length::Fixed(grid.width() as f32 * INSPECTOR_CELL_WIDTH))
            .height(Length::Fixed(grid.height() as f32 * INSPECTOR_CELL_HEIGHT));

            Scrollable::new(content)
                .width(Length::Fill)
                .height(Length::Fill)
                .direction(Direction::Both {
                    vertical: Scrollbar::new(),
                    horizontal: Scrollbar::new(),
                })
                .on_scroll(|viewport: Viewport| Message::Scrolled(viewport.absolute_offset()))
                .into()
        })
        .into()
    }
}

/// Table index under a content-space position.
#[must_use]
pub fn index_at(grid: &GridImage, position: Point) -> Option<usize> {
    if position.x < 0.0 || position.y < 0.0 {
        return None;
    }
    let col = (position.x / INSPECTOR_CELL_WIDTH).floor() as u32;
    let row = (position.y / INSPECTOR_CELL_HEIGHT).floor() as u32;
    (col < grid.width() && row < grid.height()).then(|| cell_index(col, row, grid.width()))
}

struct Table<'a> {
    grid: &'a GridImage,
    state: &'a State,
    viewport: Size,
}

/// Pointer tracking inside the table canvas.
#[derive(Debug, Default)]
struct TableCursor {
    hovered: Option<usize>,
}

impl canvas::Program<Message> for Table<'_> {
    type State = TableCursor;

    fn update(
        &self,
        cursor_state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. } | mouse::Event::CursorLeft) => {
                let index = cursor
                    .position_in(bounds)
                    .and_then(|p| index_at(self.grid, p));
                if index == cursor_state.hovered {
                    return None;
                }
                cursor_state.hovered = index;
                Some(Action::publish(Message::Hovered(index)))
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let index = index_at(self.grid, cursor.position_in(bounds)?)?;
                Some(Action::publish(Message::Clicked(index)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _cursor_state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        if self.state.cached_viewport.replace(self.viewport) != self.viewport {
            self.state.cache.clear();
        }
        let geometry = self.state.cache.draw(renderer, bounds.size(), |frame| {
            draw_table(frame, self.grid, self.state, self.viewport);
        });
        vec![geometry]
    }

    fn mouse_interaction(
        &self,
        _cursor_state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

fn draw_table(frame: &mut Frame, grid: &GridImage, state: &State, viewport: Size) {
    let selection = state.selection;
    let cell_size = Size::new(INSPECTOR_CELL_WIDTH, INSPECTOR_CELL_HEIGHT);

    for (col, row) in state.visible_cells(grid, viewport).iter() {
        let index = cell_index(col, row, grid.width());
        let Some(cell) = grid.cell_at(index) else {
            continue;
        };
        let origin = Point::new(col as f32 * cell_size.width, row as f32 * cell_size.height);
        let is_active = selection.active_index == Some(index);

        let background = if is_active {
            ACTIVE_BACKGROUND
        } else if selection.hover_index == Some(index) {
            HOVER_BACKGROUND
        } else {
            CELL_BACKGROUND
        };
        frame.fill_rectangle(origin, cell_size, background);

        let swatch_origin = Point::new(
            origin.x + PADDING,
            origin.y + (cell_size.height - SWATCH_SIZE) / 2.0,
        );
        frame.fill_rectangle(
            swatch_origin,
            Size::new(SWATCH_SIZE, SWATCH_SIZE),
            crate::render::cell_color(cell),
        );

        frame.fill_text(Text {
            content: cell.rgb_label(),
            position: Point::new(
                swatch_origin.x + SWATCH_SIZE + PADDING,
                origin.y + (cell_size.height - INSPECTOR_FONT_SIZE) / 2.0,
            ),
            color: if is_active { Color::WHITE } else { LABEL },
            size: INSPECTOR_FONT_SIZE.into(),
            ..Text::default()
        });

        let (border, width) = if is_active {
            (ACTIVE_BORDER, 2.0)
        } else {
            (GRID_LINE, 1.0)
        };
        frame.stroke(
            &Path::rectangle(origin, cell_size),
            Stroke::default().with_width(width).with_color(border),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cell, QuantizationMode};

    fn grid(width: u32, height: u32) -> GridImage {
        let cells = (0..width * height).map(|_| Cell::new(1, 2, 3, 255)).collect();
        GridImage::new(width, height, QuantizationMode::Bit24, cells).expect("valid grid")
    }

    #[test]
    fn index_at_uses_table_geometry() {
        let grid = grid(4, 3);
        assert_eq!(index_at(&grid, Point::new(0.0, 0.0)), Some(0));
        assert_eq!(index_at(&grid, Point::new(95.0, 25.0)), Some(5));
        assert_eq!(index_at(&grid, Point::new(359.0, 59.0)), Some(11));
        assert_eq!(index_at(&grid, Point::new(360.0, 10.0)), None);
        assert_eq!(index_at(&grid, Point::new(10.0, -1.0)), None);
    }

    #[test]
    fn visible_cells_follow_scroll_offset() {
        let broker = SelectionBroker::new();
        let mut state = State::new(broker.subscribe());
        let grid = grid(100, 100);

        let range = state.visible_cells(&grid, Size::new(300.0, 100.0));
        assert_eq!(range.cols, 0..4);
        assert_eq!(range.rows, 0..5);

        state.handle(Message::Scrolled(AbsoluteOffset { x: 200.0, y: 45.0 }), &broker);
        let range = state.visible_cells(&grid, Size::new(300.0, 100.0));
        assert_eq!(range.cols, 2..6);
        assert_eq!(range.rows, 2..8);
    }

    #[test]
    fn click_sets_active_and_requests_center() {
        let broker = SelectionBroker::new();
        let mut state = State::new(broker.subscribe());

        let effect = state.handle(Message::Clicked(7), &broker);
        assert_eq!(effect, Effect::SelectionChanged);
        assert_eq!(broker.active_index(), Some(7));
        assert_eq!(broker.take_center_request(), Some(7));
    }

    #[test]
    fn hover_round_trips_through_broker() {
        let broker = SelectionBroker::new();
        let mut state = State::new(broker.subscribe());

        assert_eq!(state.handle(Message::Hovered(Some(3)), &broker), Effect::SelectionChanged);
        assert_eq!(state.handle(Message::Hovered(Some(3)), &broker), Effect::None);
        assert!(state.sync());
        assert_eq!(state.selection().hover_index, Some(3));

        assert_eq!(state.handle(Message::Hovered(None), &broker), Effect::SelectionChanged);
        assert!(state.sync());
        assert_eq!(state.selection().hover_index, None);
    }

    #[test]
    fn sync_sees_changes_made_by_the_grid_view() {
        let broker = SelectionBroker::new();
        let mut state = State::new(broker.subscribe());
        assert!(!state.sync());

        broker.set_active(Some(12));
        assert!(state.sync());
        assert_eq!(state.selection().active_index, Some(12));
        assert!(!state.sync());

        // A bare center request does not change what the table shows.
        broker.request_center(12);
        assert!(!state.sync());
    }
}
