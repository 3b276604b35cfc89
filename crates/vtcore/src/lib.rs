//! Headless terminal emulator core.
//!
//! This is the facade crate: the public API most host applications
//! depend on directly, re-exporting the pieces assembled by the
//! `vtcore-*` workspace members (parsing, screen model, character sets,
//! symbol table, keyboard mapping). It does not install a global
//! `tracing` subscriber — that is the host's decision, matching the
//! teacher workspace's library-not-binary posture.
//!
//! ```
//! use vtcore::{Vte, VteOpts};
//!
//! let mut vte = VteOpts::new(80, 24).build();
//! let mut reply = Vec::new();
//! vte.feed(b"hello, world\r\n", &mut reply);
//! assert_eq!(vte.screen().cursor_y(), 1);
//! ```

#![warn(clippy::pedantic)]

mod config;

pub use config::VteOpts;
pub use vtcore_charset::{Charset, CharsetState, Register};
pub use vtcore_keys::{encode_key, KeyCode, KeyModifiers};
pub use vtcore_screen::{Attributes, Cell, Line, MarginsError, ResizeError, Screen, ScreenDrawHandler, ScreenOpts};
pub use vtcore_symbols::{Ucs4, Utf8Machine, Utf8State};
pub use vtcore_vte::{Palette, Vte, VteModes};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_round_trips_a_key_press_into_a_screen_write() {
        let mut vte = VteOpts::new(10, 1).build();
        let bytes = encode_key(KeyCode::Char('a'), KeyModifiers::empty(), vte.modes(), None).unwrap();
        let mut reply = Vec::new();
        vte.feed(&bytes, &mut reply);
        assert_eq!(vte.screen().cursor_x(), 1);
        assert!(reply.is_empty());
    }

    #[test]
    fn facade_reexports_resize_error_for_zero_sized_resize_attempts() {
        let mut vte = VteOpts::new(10, 10).build();
        let err = vte.screen_mut().resize(0, 10);
        assert!(matches!(err, Err(ResizeError::ZeroSize)));
    }
}
