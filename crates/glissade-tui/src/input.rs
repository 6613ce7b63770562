use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollLeft,
    ScrollRight,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    GlideDown,
    GlideUp,
    Stop,
    /// Instant jump to the top, bypassing the animation
    JumpHome,
    PendingG, // First 'g' press, waiting for second 'g'
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);

    if app.pending_key == Some('g') && keymap.is_g_prefix(&binding) {
        return keymap
            .get_pending_g_action()
            .cloned()
            .unwrap_or(Action::None);
    }

    if let Some(action) = keymap.get(&binding) {
        return action.clone();
    }

    // Some terminals report uppercase letters without the Shift modifier
    if let KeyCode::Char(c) = key.code {
        if c.is_ascii_uppercase() && key.modifiers == KeyModifiers::NONE {
            if let Some(action) = keymap.get(&KeyBinding::shift(key.code)) {
                return action.clone();
            }
        }
    }

    if keymap.is_g_prefix(&binding) {
        return Action::PendingG;
    }

    Action::None
}
