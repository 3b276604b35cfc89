//! Keyboard-to-bytes mapper: the reverse of `vtcore-vte`, turning host
//! key events back into the byte sequence a real terminal would write to
//! the pty.

#![warn(clippy::pedantic)]

mod encode;
mod keycode;

pub use encode::encode_key;
pub use keycode::{KeyCode, KeyModifiers};
