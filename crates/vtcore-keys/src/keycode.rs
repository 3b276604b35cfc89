//! Key identity and modifier types.
//!
//! A trimmed `KeyCode`, grounded on the teacher's
//! `vtio::event::keyboard::KeyCode`: the function-key, navigation and
//! character variants survive unchanged; the kitty-keyboard-protocol-only
//! variants (`CapsLock`, `Media`, `Modifier`, ...) are dropped since this
//! crate has no enhancement-flag negotiation to report them under.

use bitflags::bitflags;

/// Identifies a key independent of any modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    BackTab,
    Delete,
    Insert,
    /// `KeyCode::F(1)` is F1, etc.
    F(u8),
    /// `KeyCode::Char('c')` is the `c` character key.
    Char(char),
    Esc,
}

bitflags! {
    /// Key modifiers, encoded the same way xterm's modifyOtherKeys
    /// parameter packs them (`1 + shift*1 + alt*2 + ctrl*4`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT = 0b0000_0010;
        const CONTROL = 0b0000_0100;
    }
}

impl Default for KeyModifiers {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycode_equality_is_by_value() {
        assert_eq!(KeyCode::Char('a'), KeyCode::Char('a'));
        assert_ne!(KeyCode::Char('a'), KeyCode::Char('b'));
        assert_ne!(KeyCode::F(1), KeyCode::F(2));
    }

    #[test]
    fn modifiers_default_to_none() {
        assert!(KeyModifiers::default().is_empty());
    }
}
