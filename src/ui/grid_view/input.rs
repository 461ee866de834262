// SPDX-License-Identifier: MPL-2.0
//! Pointer and wheel handling for the grid view.
//!
//! Maps surface-relative pointer events to camera pans and zooms, and to
//! hover/active updates on the [`SelectionBroker`]. Drag and click are told
//! apart by [`DragState`].

use crate::domain::ZoomDirection;
use crate::selection::SelectionBroker;
use crate::ui::state::{DragState, GestureStep, ViewportCamera};
use iced::Point;

/// Input controller state.
#[derive(Debug, Clone, Default)]
pub struct State {
    gesture: DragState,
    cursor: Option<Point>,
}

/// Pointer events, positions relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    PointerDown(Point),
    PointerMoved(Point),
    PointerUp(Point),
    PointerLeft,
    /// Wheel step; `delta_y > 0` scrolls up.
    Wheel {
        position: Point,
        delta_y: f32,
        zoom_modifier: bool,
    },
}

/// What the host should know about after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Panned,
    HoverChanged(Option<usize>),
    Selected(usize),
    Zoomed,
    /// The event is not ours (plain wheel scroll); let the container have it.
    Ignored,
}

impl State {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        !self.gesture.is_idle()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Handles one event against the camera and the shared selection.
    pub fn handle(
        &mut self,
        msg: Message,
        camera: &mut ViewportCamera,
        selection: &SelectionBroker,
    ) -> Effect {
        match msg {
            Message::PointerDown(position) => {
                self.cursor = Some(position);
                self.gesture.press(position);
                Effect::None
            }
            Message::PointerMoved(position) => {
                self.cursor = Some(position);
                if self.gesture.is_idle() {
                    return update_hover(camera.screen_to_index(position), selection);
                }
                match self.gesture.motion(position) {
                    GestureStep::Pan(delta) => {
                        camera.pan_by(delta);
                        Effect::Panned
                    }
                    _ => Effect::None,
                }
            }
            Message::PointerUp(position) => {
                self.cursor = Some(position);
                match self.gesture.release(position) {
                    GestureStep::Click(at) => match camera.screen_to_index(at) {
                        Some(index) => {
                            selection.set_active(Some(index));
                            Effect::Selected(index)
                        }
                        None => Effect::None,
                    },
                    GestureStep::Pan(delta) => {
                        camera.pan_by(delta);
                        Effect::Panned
                    }
                    GestureStep::Pending | GestureStep::DragEnded => Effect::None,
                }
            }
            Message::PointerLeft => {
                self.cursor = None;
                self.gesture.cancel();
                update_hover(None, selection)
            }
            Message::Wheel {
                position,
                delta_y,
                zoom_modifier,
            } => {
                if !zoom_modifier {
                    return Effect::Ignored;
                }
                if delta_y.abs() < f32::EPSILON {
                    return Effect::None;
                }
                let direction = if delta_y > 0.0 {
                    ZoomDirection::In
                } else {
                    ZoomDirection::Out
                };
                if camera.zoom(direction, Some(position)) {
                    Effect::Zoomed
                } else {
                    Effect::None
                }
            }
        }
    }
}

fn update_hover(index: Option<usize>, selection: &SelectionBroker) -> Effect {
    if selection.hover_index() == index {
        return Effect::None;
    }
    selection.set_hover(index);
    Effect::HoverChanged(index)
}

/// Applies a pending center request from the broker once.
///
/// Returns true if the camera moved.
pub fn consume_center_request(camera: &mut ViewportCamera, selection: &SelectionBroker) -> bool {
    selection
        .take_center_request()
        .is_some_and(|index| camera.center_on_index(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoomAnchor;
    use crate::domain::CellSize;
    use iced::{Size, Vector};

    /// 10×10 grid, 10px cells, no pan, 100×100 viewport.
    fn setup() -> (State, ViewportCamera, SelectionBroker) {
        let mut camera = ViewportCamera::new(CellSize::new(10), ZoomAnchor::Cursor);
        camera.set_viewport(Size::new(100.0, 100.0));
        camera.set_grid(10, 10);
        let pan = camera.pan();
        camera.pan_by(Vector::new(-pan.x, -pan.y));
        (State::default(), camera, SelectionBroker::new())
    }

    #[test]
    fn click_selects_cell_under_release_point() {
        let (mut input, mut camera, selection) = setup();
        input.handle(Message::PointerDown(Point::new(35.0, 12.0)), &mut camera, &selection);
        input.handle(Message::PointerMoved(Point::new(37.0, 14.0)), &mut camera, &selection);
        let effect = input.handle(Message::PointerUp(Point::new(37.0, 14.0)), &mut camera, &selection);

        assert_eq!(effect, Effect::Selected(13));
        assert_eq!(selection.active_index(), Some(13));
        assert_eq!(camera.pan(), Vector::new(0.0, 0.0));
    }

    #[test]
    fn drag_pans_and_suppresses_click() {
        let (mut input, mut camera, selection) = setup();
        input.handle(Message::PointerDown(Point::new(50.0, 50.0)), &mut camera, &selection);
        assert_eq!(
            input.handle(Message::PointerMoved(Point::new(56.0, 50.0)), &mut camera, &selection),
            Effect::Panned
        );
        assert_eq!(camera.pan(), Vector::new(6.0, 0.0));

        input.handle(Message::PointerMoved(Point::new(60.0, 45.0)), &mut camera, &selection);
        assert_eq!(camera.pan(), Vector::new(10.0, -5.0));

        let effect = input.handle(Message::PointerUp(Point::new(60.0, 45.0)), &mut camera, &selection);
        assert_eq!(effect, Effect::None);
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn far_release_without_motion_pans() {
        let (mut input, mut camera, selection) = setup();
        input.handle(Message::PointerDown(Point::new(20.0, 20.0)), &mut camera, &selection);
        let effect = input.handle(Message::PointerUp(Point::new(20.0, 28.0)), &mut camera, &selection);
        assert_eq!(effect, Effect::Panned);
        assert_eq!(camera.pan(), Vector::new(0.0, 8.0));
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn click_outside_grid_is_ignored() {
        let (mut input, mut camera, selection) = setup();
        selection.set_active(Some(3));
        input.handle(Message::PointerDown(Point::new(-5.0, 5.0)), &mut camera, &selection);
        let effect = input.handle(Message::PointerUp(Point::new(-5.0, 5.0)), &mut camera, &selection);
        assert_eq!(effect, Effect::None);
        assert_eq!(selection.active_index(), Some(3));
    }

    #[test]
    fn hover_only_notifies_on_change() {
        let (mut input, mut camera, selection) = setup();
        assert_eq!(
            input.handle(Message::PointerMoved(Point::new(1.0, 1.0)), &mut camera, &selection),
            Effect::HoverChanged(Some(0))
        );
        assert_eq!(
            input.handle(Message::PointerMoved(Point::new(8.0, 8.0)), &mut camera, &selection),
            Effect::None
        );
        assert_eq!(
            input.handle(Message::PointerMoved(Point::new(150.0, 8.0)), &mut camera, &selection),
            Effect::HoverChanged(None)
        );
    }

    #[test]
    fn hover_is_frozen_while_button_held() {
        let (mut input, mut camera, selection) = setup();
        input.handle(Message::PointerMoved(Point::new(1.0, 1.0)), &mut camera, &selection);
        input.handle(Message::PointerDown(Point::new(1.0, 1.0)), &mut camera, &selection);
        input.handle(Message::PointerMoved(Point::new(3.0, 1.0)), &mut camera, &selection);
        assert_eq!(selection.hover_index(), Some(0));
    }

    #[test]
    fn leaving_clears_hover_and_cancels_gesture() {
        let (mut input, mut camera, selection) = setup();
        input.handle(Message::PointerMoved(Point::new(15.0, 5.0)), &mut camera, &selection);
        input.handle(Message::PointerDown(Point::new(15.0, 5.0)), &mut camera, &selection);

        let effect = input.handle(Message::PointerLeft, &mut camera, &selection);
        assert_eq!(effect, Effect::HoverChanged(None));
        assert!(!input.is_pressed());
        assert!(input.cursor().is_none());

        let effect = input.handle(Message::PointerUp(Point::new(15.0, 5.0)), &mut camera, &selection);
        assert_eq!(effect, Effect::None);
        assert_eq!(selection.active_index(), None);
    }

    #[test]
    fn wheel_zooms_only_with_modifier() {
        let (mut input, mut camera, selection) = setup();
        let wheel = |zoom_modifier, delta_y| Message::Wheel {
            position: Point::new(50.0, 50.0),
            delta_y,
            zoom_modifier,
        };

        assert_eq!(input.handle(wheel(false, 1.0), &mut camera, &selection), Effect::Ignored);
        assert_eq!(camera.cell_size().value(), 10);

        assert_eq!(input.handle(wheel(true, 1.0), &mut camera, &selection), Effect::Zoomed);
        assert_eq!(camera.cell_size().value(), 12);

        assert_eq!(input.handle(wheel(true, -1.0), &mut camera, &selection), Effect::Zoomed);
        assert_eq!(camera.cell_size().value(), 10);
    }

    #[test]
    fn center_request_is_applied_once() {
        let (_, mut camera, selection) = setup();
        selection.request_center(55);
        assert!(consume_center_request(&mut camera, &selection));
        let rect = camera.cell_rect(5, 5);
        assert_eq!(rect.center_x(), 50.0);
        assert_eq!(rect.center_y(), 50.0);

        camera.pan_by(Vector::new(3.0, 0.0));
        assert!(!consume_center_request(&mut camera, &selection));
        assert_eq!(camera.cell_rect(5, 5).center_x(), 53.0);
    }

    #[test]
    fn center_request_outside_grid_is_dropped() {
        let (_, mut camera, selection) = setup();
        let pan = camera.pan();
        selection.request_center(100);
        assert!(!consume_center_request(&mut camera, &selection));
        assert_eq!(camera.pan(), pan);
        assert!(selection.take_center_request().is_none());
    }
}
