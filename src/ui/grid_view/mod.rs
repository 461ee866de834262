// SPDX-License-Identifier: MPL-2.0
//! Interactive grid view.
//!
//! [`GridCanvas`] is an iced canvas program: it turns raw mouse and keyboard
//! events into [`input::Message`]s for the application and draws each frame
//! through the [`RenderEngine`] onto a [`FrameSurface`].

pub mod input;

use crate::domain::GridImage;
use crate::render::{RenderEngine, StaticLayer, Surface};
use crate::selection::SelectionState;
use crate::ui::state::ViewportCamera;
use iced::mouse;
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::widget::image::FilterMethod;
use iced::widget::{Action, Canvas};
use iced::{keyboard, Color, Element, Event, Length, Point, Rectangle, Size};

/// Messages published by the grid canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A pointer event together with the surface size it happened on.
    Input { viewport: Size, event: input::Message },
    /// The surface was laid out at a new size.
    Resized(Size),
}

/// Widget-local state kept by iced between events.
#[derive(Debug, Default)]
pub struct CanvasState {
    modifiers: keyboard::Modifiers,
    inside: bool,
    pressed: bool,
    last_size: Option<Size>,
}

/// Canvas program drawing the current grid.
pub struct GridCanvas<'a> {
    pub engine: &'a RenderEngine,
    pub grid: Option<&'a GridImage>,
    pub camera: &'a ViewportCamera,
    pub selection: SelectionState,
}

impl<'a> GridCanvas<'a> {
    pub fn view(self) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn scroll_steps(delta: &mouse::ScrollDelta) -> f32 {
    match delta {
        mouse::ScrollDelta::Lines { y, .. } => *y,
        mouse::ScrollDelta::Pixels { y, .. } => *y / 120.0,
    }
}

impl canvas::Program<Message> for GridCanvas<'_> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let viewport = bounds.size();
        let publish = |event: input::Message| Action::publish(Message::Input { viewport, event });

        match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
                None
            }
            Event::Window(iced::window::Event::RedrawRequested(_)) => {
                if state.last_size == Some(viewport) {
                    return None;
                }
                state.last_size = Some(viewport);
                Some(Action::publish(Message::Resized(viewport)))
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.pressed = true;
                Some(publish(input::Message::PointerDown(position)).and_capture())
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !state.pressed {
                    return None;
                }
                state.pressed = false;
                let position = cursor.position_in(bounds)?;
                Some(publish(input::Message::PointerUp(position)).and_capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => match cursor.position_in(bounds) {
                Some(position) => {
                    state.inside = true;
                    Some(publish(input::Message::PointerMoved(position)))
                }
                None if state.inside => {
                    state.inside = false;
                    state.pressed = false;
                    Some(publish(input::Message::PointerLeft))
                }
                None => None,
            },
            Event::Mouse(mouse::Event::CursorLeft) if state.inside => {
                state.inside = false;
                state.pressed = false;
                Some(publish(input::Message::PointerLeft))
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let zoom_modifier = state.modifiers.command();
                let action = publish(input::Message::Wheel {
                    position,
                    delta_y: scroll_steps(delta),
                    zoom_modifier,
                });
                // Plain scrolling is left to the surrounding layout.
                Some(if zoom_modifier { action.and_capture() } else { action })
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let mut surface = FrameSurface { frame: &mut frame };
        self.engine
            .render_frame(&mut surface, self.grid, self.camera, &self.selection);
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.pressed {
            mouse::Interaction::Grabbing
        } else if self.grid.is_some() && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// [`Surface`] over an iced canvas frame.
///
/// The frame already works in logical pixels and the renderer applies the
/// window scale factor, so the transform reset is a no-op.
pub struct FrameSurface<'f> {
    frame: &'f mut Frame,
}

impl Surface for FrameSurface<'_> {
    fn logical_size(&self) -> Size {
        self.frame.size()
    }

    fn reset_transform(&mut self) {}

    fn clear(&mut self, color: Color) {
        let size = self.frame.size();
        self.frame.fill_rectangle(Point::ORIGIN, size, color);
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        self.frame
            .fill_rectangle(rect.position(), rect.size(), color);
    }

    fn stroke_rect(&mut self, rect: Rectangle, color: Color, width: f32) {
        self.frame.stroke(
            &Path::rectangle(rect.position(), rect.size()),
            Stroke::default().with_width(width).with_color(color),
        );
    }

    fn blit_layer(&mut self, layer: &StaticLayer, origin: Point) {
        let bounds = Rectangle::new(
            origin,
            Size::new(layer.width() as f32, layer.height() as f32),
        );
        self.frame.draw_image(
            bounds,
            canvas::Image::new(layer.handle().clone()).filter_method(FilterMethod::Nearest),
        );
    }
}
