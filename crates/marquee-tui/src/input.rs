use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    FocusNext,
    FocusPrev,
    /// Copy, follow an anchor or open a link, depending on what has focus
    Activate,
    /// Jump to the nth navbar link
    NavLink(usize),
    RestartTypewriter,
    ClearFocus,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,

        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::PageDown, _) => Action::ScrollHalfPageDown,
        (KeyCode::PageUp, _) => Action::ScrollHalfPageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            // gg requires double press
            if app.pending_key == Some('g') {
                Action::JumpToTop
            } else {
                Action::PendingG
            }
        }
        (KeyCode::Char('G'), KeyModifiers::SHIFT) | (KeyCode::Char('G'), KeyModifiers::NONE) => {
            Action::JumpToBottom
        }
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Tab, KeyModifiers::NONE) => Action::FocusNext,
        (KeyCode::BackTab, _) => Action::FocusPrev,
        (KeyCode::Enter, KeyModifiers::NONE) => Action::Activate,
        (KeyCode::Esc, KeyModifiers::NONE) => Action::ClearFocus,

        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::NavLink(c as usize - '1' as usize)
        }

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::RestartTypewriter,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::AppConfig;
    use std::sync::Arc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_scroll_and_quit_keys() {
        let app = App::new(Arc::new(AppConfig::default()));
        assert_eq!(handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), &app), Action::ScrollDown);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL), &app),
            Action::ScrollHalfPageDown
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE), &app), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE), &app), Action::None);
    }

    #[test]
    fn test_double_g_jumps_to_top() {
        let mut app = App::new(Arc::new(AppConfig::default()));
        let g = key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(g, &app), Action::PendingG);
        app.pending_key = Some('g');
        assert_eq!(handle_key_event(g, &app), Action::JumpToTop);
    }

    #[test]
    fn test_focus_and_nav_keys() {
        let app = App::new(Arc::new(AppConfig::default()));
        assert_eq!(handle_key_event(key(KeyCode::Tab, KeyModifiers::NONE), &app), Action::FocusNext);
        assert_eq!(handle_key_event(key(KeyCode::BackTab, KeyModifiers::SHIFT), &app), Action::FocusPrev);
        assert_eq!(handle_key_event(key(KeyCode::Char('2'), KeyModifiers::NONE), &app), Action::NavLink(1));
        assert_eq!(
            handle_key_event(key(KeyCode::Char('r'), KeyModifiers::NONE), &app),
            Action::RestartTypewriter
        );
    }
}
