// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Routes window-level events that no widget handles: dropped files and the
//! keyboard shortcuts mirroring the toolbar.

use super::Message;
use crate::ui::toolbar;
use iced::keyboard::{self, Key};
use iced::{event, Subscription};

/// Creates the application-wide event subscription.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| {
        if let event::Event::Window(iced::window::Event::FileDropped(path)) = &event {
            return Some(Message::FileDropped(path.clone()));
        }

        if status == event::Status::Captured {
            return None;
        }

        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
                if modifiers.command() =>
            {
                shortcut(&key).map(Message::Toolbar)
            }
            _ => None,
        }
    })
}

/// Maps a key pressed together with the command modifier to a toolbar action.
fn shortcut(key: &Key) -> Option<toolbar::Message> {
    match key.as_ref() {
        Key::Character("o") => Some(toolbar::Message::Open),
        Key::Character("=" | "+") => Some(toolbar::Message::ZoomIn),
        Key::Character("-") => Some(toolbar::Message::ZoomOut),
        _ => None,
    }
}
