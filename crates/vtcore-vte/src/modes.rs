//! Parser-observable modes a keyboard mapper needs to see.
//!
//! `vtcore-keys` has no parser of its own; a host wires these flags from
//! [`crate::Vte::modes`] into its keyboard mapper calls each time a key
//! event arrives.

/// Snapshot of the DEC private modes that change how a keyboard mapper
/// should encode key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VteModes {
    /// DECCKM: arrow keys send `ESC O` instead of `ESC [`.
    pub app_cursor_keys: bool,
    /// DECPAM/DECPNM: keypad keys send application sequences.
    pub app_keypad: bool,
    /// Mode 2004: pasted text is wrapped in `ESC [200~` / `ESC [201~`.
    pub bracketed_paste: bool,
}
