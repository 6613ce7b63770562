use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use glissade_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// A key press as the keymap sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action for the "gg" sequence, if configured
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Build the keymap from configuration
    ///
    /// A key claimed twice keeps its first action. Arrow and page keys
    /// are added as fallbacks unless the configuration uses them.
    pub fn from_config(config: &KeymapConfig) -> Self {
        let configured = [
            (&config.quit, Action::Quit),
            (&config.scroll_down, Action::ScrollDown),
            (&config.scroll_up, Action::ScrollUp),
            (&config.scroll_left, Action::ScrollLeft),
            (&config.scroll_right, Action::ScrollRight),
            (&config.half_page_down, Action::HalfPageDown),
            (&config.half_page_up, Action::HalfPageUp),
            (&config.page_down, Action::PageDown),
            (&config.page_up, Action::PageUp),
            (&config.jump_to_top, Action::JumpToTop),
            (&config.jump_to_bottom, Action::JumpToBottom),
            (&config.glide_down, Action::GlideDown),
            (&config.glide_up, Action::GlideUp),
            (&config.stop, Action::Stop),
            (&config.jump_home, Action::JumpHome),
        ];

        let mut keymap = Self {
            bindings: HashMap::new(),
            pending_g_action: None,
        };
        for (notation, action) in configured {
            keymap.bind(notation, action);
        }

        keymap
            .bindings
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        let fallbacks = [
            (KeyCode::Down, Action::ScrollDown),
            (KeyCode::Up, Action::ScrollUp),
            (KeyCode::Left, Action::ScrollLeft),
            (KeyCode::Right, Action::ScrollRight),
            (KeyCode::PageDown, Action::PageDown),
            (KeyCode::PageUp, Action::PageUp),
        ];
        for (code, action) in fallbacks {
            keymap.bindings.entry(KeyBinding::plain(code)).or_insert(action);
        }
        keymap
    }

    fn bind(&mut self, notation: &str, action: Action) {
        if notation == "gg" {
            self.pending_g_action = Some(action);
            return;
        }
        let Some(binding) = parse_key_binding(notation) else {
            warn!("Invalid key binding: '{}', ignoring", notation);
            return;
        };
        match self.bindings.get(&binding) {
            Some(existing) => warn!(
                "Key '{}' already bound to {:?}, ignoring {:?}",
                notation, existing, action
            ),
            None => {
                self.bindings.insert(binding, action);
            }
        }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Get the action for completed "gg" sequence
    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// Check if a single 'g' press should start a pending sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Names accepted inside `<...>`, lowercase
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("space", KeyCode::Char(' ')),
    ("cr", KeyCode::Enter),
    ("enter", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
];

/// Parse a vim-style key: `j`, `G` (Shift), `<C-d>`, `<S-Tab>`, `<Space>`, `<Home>`
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();
    match s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        Some(inner) if !inner.is_empty() => parse_bracketed(inner),
        _ => {
            let c = single_char(s)?;
            let modifiers = if c.is_ascii_uppercase() {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::NONE
            };
            Some(KeyBinding::new(KeyCode::Char(c), modifiers))
        }
    }
}

/// `C-` and `S-` prefixes followed by a key name or a single character
fn parse_bracketed(inner: &str) -> Option<KeyBinding> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = inner;
    loop {
        if let Some(tail) = rest.strip_prefix("C-") {
            modifiers |= KeyModifiers::CONTROL;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("S-") {
            modifiers |= KeyModifiers::SHIFT;
            rest = tail;
        } else {
            break;
        }
    }

    let lower = rest.to_ascii_lowercase();
    let code = NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| *code)
        .or_else(|| single_char(&lower).map(KeyCode::Char))?;
    Some(KeyBinding::new(code, modifiers))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        assert_eq!(
            parse_key_binding("j"),
            Some(KeyBinding::plain(KeyCode::Char('j')))
        );
        assert_eq!(
            parse_key_binding("G"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
        assert_eq!(parse_key_binding("jj"), None);
        assert_eq!(parse_key_binding(""), None);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(
            parse_key_binding("<C-d>"),
            Some(KeyBinding::ctrl(KeyCode::Char('d')))
        );
        assert_eq!(
            parse_key_binding("<Space>"),
            Some(KeyBinding::plain(KeyCode::Char(' ')))
        );
        assert_eq!(
            parse_key_binding("<Home>"),
            Some(KeyBinding::plain(KeyCode::Home))
        );
        assert_eq!(
            parse_key_binding("<S-Tab>"),
            Some(KeyBinding::shift(KeyCode::Tab))
        );
        assert_eq!(
            parse_key_binding("<C-S-x>"),
            Some(KeyBinding::new(
                KeyCode::Char('x'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            ))
        );
        assert_eq!(parse_key_binding("<Hyper-x>"), None);
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::from_config(&KeymapConfig::default());

        assert_eq!(
            keymap.get(&KeyBinding::plain(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('d'))),
            Some(&Action::HalfPageDown)
        );
        assert_eq!(
            keymap.get(&KeyBinding::shift(KeyCode::Char('J'))),
            Some(&Action::GlideDown)
        );
        assert_eq!(
            keymap.get(&KeyBinding::plain(KeyCode::Down)),
            Some(&Action::ScrollDown)
        );
        assert_eq!(keymap.get_pending_g_action(), Some(&Action::JumpToTop));
        assert!(keymap.is_g_prefix(&KeyBinding::plain(KeyCode::Char('g'))));
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            stop: "j".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::plain(KeyCode::Char('j'))),
            Some(&Action::ScrollDown)
        );
    }
}
