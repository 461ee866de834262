// SPDX-License-Identifier: MPL-2.0
//! Shared selection state observed by the grid view and the tabular view.
//!
//! [`SelectionBroker`] is the single source of truth for the active cell,
//! the hovered cell and the one-shot "center on index" command. It wraps a
//! [`tokio::sync::watch`] channel: writers only notify observers when a value
//! actually changes, and any number of views can [`subscribe`](SelectionBroker::subscribe).

use tokio::sync::watch;

/// Snapshot of the shared selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub active_index: Option<usize>,
    pub hover_index: Option<usize>,
    /// Pending request for the grid camera to reveal a cell.
    pub center_request: Option<usize>,
}

#[derive(Debug)]
pub struct SelectionBroker {
    sender: watch::Sender<SelectionState>,
}

impl Default for SelectionBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionBroker {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(SelectionState::default());
        Self { sender }
    }

    /// Returns a receiver that is marked changed on every effective update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SelectionState {
        *self.sender.borrow()
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.sender.borrow().active_index
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        self.sender.borrow().hover_index
    }

    /// Sets the active cell. Returns true if it changed.
    pub fn set_active(&self, index: Option<usize>) -> bool {
        self.sender.send_if_modified(|state| {
            let changed = state.active_index != index;
            state.active_index = index;
            changed
        })
    }

    /// Sets the hovered cell. Returns true if it changed.
    pub fn set_hover(&self, index: Option<usize>) -> bool {
        self.sender.send_if_modified(|state| {
            let changed = state.hover_index != index;
            state.hover_index = index;
            changed
        })
    }

    /// Asks the grid view to center on `index` once.
    pub fn request_center(&self, index: usize) {
        tracing::debug!(index, "center requested");
        self.sender.send_modify(|state| state.center_request = Some(index));
    }

    /// Consumes the pending center request, if any.
    ///
    /// Clearing the request is not a visible change, so observers are not
    /// notified.
    pub fn take_center_request(&self) -> Option<usize> {
        let mut taken = None;
        self.sender.send_if_modified(|state| {
            taken = state.center_request.take();
            false
        });
        taken
    }

    /// Drops active, hover and pending center request.
    pub fn clear(&self) -> bool {
        self.sender.send_if_modified(|state| {
            let changed = *state != SelectionState::default();
            *state = SelectionState::default();
            changed
        })
    }
}
