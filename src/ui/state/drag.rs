// SPDX-License-Identifier: MPL-2.0
//! Pointer gesture state
//!
//! Tells a drag-pan apart from a click. A press stays speculative until the
//! pointer has moved at least the drag threshold away from where it went
//! down; releasing before that is a click.

use crate::config::defaults::DRAG_THRESHOLD_PX;
use iced::{Point, Vector};

/// Where a pointer gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Button held, not yet committed to a drag.
    Pressed { origin: Point },
    /// Committed drag; `last` is the position of the previous move.
    Dragging { last: Point },
}

/// Result of feeding one event to [`DragState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureStep {
    /// Nothing for the camera to do.
    Pending,
    /// Pan the camera by this delta.
    Pan(Vector),
    /// The gesture ended as a click at this position.
    Click(Point),
    /// The gesture ended as a drag; the click is suppressed.
    DragEnded,
}

impl DragState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Button pressed at `position`.
    pub fn press(&mut self, position: Point) {
        *self = DragState::Pressed { origin: position };
    }

    /// Pointer moved while a button may be held.
    pub fn motion(&mut self, position: Point) -> GestureStep {
        match *self {
            DragState::Idle => GestureStep::Pending,
            DragState::Pressed { origin } => {
                let displacement = position - origin;
                if displacement.x.hypot(displacement.y) >= DRAG_THRESHOLD_PX {
                    *self = DragState::Dragging { last: position };
                    // Catch up with the distance covered while undecided.
                    GestureStep::Pan(displacement)
                } else {
                    GestureStep::Pending
                }
            }
            DragState::Dragging { last } => {
                *self = DragState::Dragging { last: position };
                GestureStep::Pan(position - last)
            }
        }
    }

    /// Button released at `position`.
    ///
    /// A release at or beyond the threshold with no motion seen in between
    /// still counts as a drag and yields the whole displacement as a pan.
    pub fn release(&mut self, position: Point) -> GestureStep {
        let step = match *self {
            DragState::Idle => GestureStep::Pending,
            DragState::Pressed { origin } => {
                let displacement = position - origin;
                if displacement.x.hypot(displacement.y) >= DRAG_THRESHOLD_PX {
                    GestureStep::Pan(displacement)
                } else {
                    GestureStep::Click(position)
                }
            }
            DragState::Dragging { last } if last != position => GestureStep::Pan(position - last),
            DragState::Dragging { .. } => GestureStep::DragEnded,
        };
        *self = DragState::Idle;
        step
    }

    /// Abandons the gesture (pointer left the surface).
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }
}
