//! Maps raw key presses onto what the chat loop should do with them.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMove {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Send the input box contents.
    Submit,
    InsertNewline,
    Dispatch(AppAction),
    Scroll(ScrollMove),
    /// Hand the key to the input box editor.
    Edit,
}

pub fn resolve_key(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' => KeyAction::Dispatch(AppAction::Quit),
            'l' => KeyAction::Dispatch(AppAction::ClearConversation),
            's' => KeyAction::Dispatch(AppAction::ToggleCachePanel),
            'r' => KeyAction::Dispatch(AppAction::RetryHealth),
            'e' => KeyAction::Dispatch(AppAction::CycleExample),
            // Some terminals report Alt+Enter as Ctrl+J.
            'j' => KeyAction::InsertNewline,
            _ => KeyAction::Edit,
        },
        KeyCode::Esc => KeyAction::Dispatch(AppAction::DismissOverlay),
        KeyCode::F(1) => KeyAction::Dispatch(AppAction::ShowHelp),
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            KeyAction::InsertNewline
        }
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Up => KeyAction::Scroll(ScrollMove::LineUp),
        KeyCode::Down => KeyAction::Scroll(ScrollMove::LineDown),
        KeyCode::PageUp => KeyAction::Scroll(ScrollMove::PageUp),
        KeyCode::PageDown => KeyAction::Scroll(ScrollMove::PageDown),
        _ => KeyAction::Edit,
    }
}
