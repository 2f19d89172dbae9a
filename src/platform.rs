//! Platform-specific key bindings and their display strings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Modifier for the app's letter shortcuts. Terminals on every platform
/// deliver Ctrl combinations; Cmd rarely reaches the program.
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

pub const SWITCH_VIEW_SHORTCUT: &str = "Ctrl+T";
pub const RESET_SHORTCUT: &str = "Ctrl+R";
pub const REVEAL_SHORTCUT: &str = "Ctrl+V";
pub const QUIT_SHORTCUT: &str = "Ctrl+C";

/// True for `SHORTCUT_MODIFIER` + `letter`
pub fn is_shortcut(key: &KeyEvent, letter: char) -> bool {
    key.modifiers.contains(SHORTCUT_MODIFIER) && key.code == KeyCode::Char(letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_shortcut() {
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(is_shortcut(&ctrl_t, 't'));
        assert!(!is_shortcut(&ctrl_t, 'r'));

        let plain_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        assert!(!is_shortcut(&plain_t, 't'));
    }
}
