//! Key bindings
//!
//! Maps crossterm key events to semantic actions. While the feedback prompt
//! is open it captures the keyboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use empower_domain::Rating;

/// User action derived from a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    InsertChar(char),
    DeleteChar,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    Submit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    OpenFeedback,
    Rate(Rating),
    DismissOverlay,
    None,
}

/// Map a key event to an action
pub fn handle_key_event(feedback_open: bool, key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('f') if !feedback_open => KeyAction::OpenFeedback,
            _ => KeyAction::None,
        };
    }

    if feedback_open {
        return match key.code {
            KeyCode::Char('g') | KeyCode::Char('G') => KeyAction::Rate(Rating::Good),
            KeyCode::Char('b') | KeyCode::Char('B') => KeyAction::Rate(Rating::Bad),
            KeyCode::Esc => KeyAction::DismissOverlay,
            _ => KeyAction::None,
        };
    }

    match key.code {
        // Shift+Enter does not send
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => KeyAction::None,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Char(c) => KeyAction::InsertChar(c),
        KeyCode::Backspace => KeyAction::DeleteChar,
        KeyCode::Left => KeyAction::CursorLeft,
        KeyCode::Right => KeyAction::CursorRight,
        KeyCode::Home => KeyAction::CursorHome,
        KeyCode::End => KeyAction::CursorEnd,
        KeyCode::Up => KeyAction::ScrollUp,
        KeyCode::Down => KeyAction::ScrollDown,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_enter_submits_but_shift_enter_does_not() {
        assert_eq!(handle_key_event(false, key(KeyCode::Enter)), KeyAction::Submit);
        assert_eq!(
            handle_key_event(false, key_with(KeyCode::Enter, KeyModifiers::SHIFT)),
            KeyAction::None
        );
    }

    #[test]
    fn test_typing() {
        assert_eq!(
            handle_key_event(false, key(KeyCode::Char('g'))),
            KeyAction::InsertChar('g')
        );
        assert_eq!(
            handle_key_event(false, key_with(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            KeyAction::InsertChar('G')
        );
    }

    #[test]
    fn test_feedback_prompt_captures_keys() {
        assert_eq!(
            handle_key_event(true, key(KeyCode::Char('g'))),
            KeyAction::Rate(Rating::Good)
        );
        assert_eq!(
            handle_key_event(true, key(KeyCode::Char('b'))),
            KeyAction::Rate(Rating::Bad)
        );
        assert_eq!(handle_key_event(true, key(KeyCode::Esc)), KeyAction::DismissOverlay);
        assert_eq!(handle_key_event(true, key(KeyCode::Enter)), KeyAction::None);
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            handle_key_event(false, key_with(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            KeyAction::OpenFeedback
        );
        assert_eq!(
            handle_key_event(true, key_with(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            KeyAction::None
        );
        assert_eq!(
            handle_key_event(true, key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut event = key(KeyCode::Enter);
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key_event(false, event), KeyAction::None);
    }
}
