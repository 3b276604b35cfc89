//! Encodes a key event into the byte sequence a host must write to the pty.
//!
//! Grounded on the teacher's `impl AnsiEncode2 for KeyEvent` in
//! `vtio::event::keyboard`, which matches on `KeyCode` and the xterm
//! modifier parameter (`1 + shift + alt*2 + ctrl*4`) to pick CSI/SS3
//! forms. The signature here is reshaped after libtsm's
//! `tsm_vte_handle_keyboard(vte, keysym, ascii, mods, unicode)`: instead
//! of a window-system keysym plus a boolean "handled" return, callers
//! pass a typed [`KeyCode`] plus an ASCII fallback byte for keys this
//! mapper does not recognize, and get back `None` when nothing should be
//! written to the pty.

use vtcore_encode::write_csi;
use vtcore_vte::VteModes;

use crate::keycode::{KeyCode, KeyModifiers};

/// Map `code`/`mods` to the bytes a host should write to the pty.
///
/// `ascii_fallback` is written verbatim when `code` is not one of the
/// keys this mapper recognizes (mirroring libtsm's behavior of passing
/// the raw ASCII byte through when no keysym mapping applies). Returns
/// `None` when the key produces no terminal output at all.
#[must_use]
pub fn encode_key(
    code: KeyCode,
    mods: KeyModifiers,
    modes: VteModes,
    ascii_fallback: Option<u8>,
) -> Option<Vec<u8>> {
    let mod_param: u16 = 1
        + u16::from(mods.contains(KeyModifiers::SHIFT))
        + if mods.contains(KeyModifiers::ALT) { 2 } else { 0 }
        + if mods.contains(KeyModifiers::CONTROL) { 4 } else { 0 };
    let alt_prefix = mods.contains(KeyModifiers::ALT);
    let mut buf = Vec::new();

    match code {
        KeyCode::Char(c) => {
            if mods.contains(KeyModifiers::CONTROL) {
                if alt_prefix {
                    buf.push(0x1b);
                }
                buf.push(control_code_for(c));
                return Some(buf);
            }
            if alt_prefix {
                buf.push(0x1b);
            }
            let mut tmp = [0u8; 4];
            buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        }

        KeyCode::Enter => {
            if mod_param > 1 {
                let _ = write_csi!(&mut buf; "13;", mod_param, "u");
            } else if alt_prefix {
                buf.extend_from_slice(b"\x1b\r");
            } else {
                buf.push(b'\r');
            }
        }

        KeyCode::Backspace => buf.push(0x7f),

        KeyCode::Tab => {
            if mods.contains(KeyModifiers::SHIFT) {
                let _ = write_csi!(&mut buf; "Z");
            } else {
                buf.push(b'\t');
            }
        }
        KeyCode::BackTab => {
            let _ = write_csi!(&mut buf; "Z");
        }

        KeyCode::Esc => buf.push(0x1b),

        KeyCode::Up | KeyCode::Down | KeyCode::Right | KeyCode::Left | KeyCode::Home | KeyCode::End => {
            let final_byte = match code {
                KeyCode::Up => b'A',
                KeyCode::Down => b'B',
                KeyCode::Right => b'C',
                KeyCode::Left => b'D',
                KeyCode::Home => b'H',
                KeyCode::End => b'F',
                _ => unreachable!(),
            };
            if mod_param == 1 {
                buf.push(0x1b);
                buf.push(if modes.app_cursor_keys { b'O' } else { b'[' });
                buf.push(final_byte);
            } else {
                let _ = write_csi!(&mut buf; "1;", mod_param, final_byte as char);
            }
        }

        KeyCode::Insert => {
            if mod_param == 1 {
                let _ = write_csi!(&mut buf; "2~");
            } else {
                let _ = write_csi!(&mut buf; "2;", mod_param, "~");
            }
        }
        KeyCode::Delete => {
            if mod_param == 1 {
                let _ = write_csi!(&mut buf; "3~");
            } else {
                let _ = write_csi!(&mut buf; "3;", mod_param, "~");
            }
        }
        KeyCode::PageUp => {
            if mod_param == 1 {
                let _ = write_csi!(&mut buf; "5~");
            } else {
                let _ = write_csi!(&mut buf; "5;", mod_param, "~");
            }
        }
        KeyCode::PageDown => {
            if mod_param == 1 {
                let _ = write_csi!(&mut buf; "6~");
            } else {
                let _ = write_csi!(&mut buf; "6;", mod_param, "~");
            }
        }

        KeyCode::F(n @ 1..=4) => {
            let letter = match n {
                1 => b'P',
                2 => b'Q',
                3 => b'R',
                4 => b'S',
                _ => unreachable!(),
            };
            if mod_param == 1 {
                buf.extend_from_slice(&[0x1b, b'O', letter]);
            } else {
                let _ = write_csi!(&mut buf; "1;", mod_param, letter as char);
            }
        }
        KeyCode::F(n) => {
            let code = match n {
                5 => 15,
                6 => 17,
                7 => 18,
                8 => 19,
                9 => 20,
                10 => 21,
                11 => 23,
                12 => 24,
                13 => 25,
                14 => 26,
                15 => 28,
                16 => 29,
                17 => 31,
                18 => 32,
                19 => 33,
                20 => 34,
                _ => return ascii_fallback.map(|b| vec![b]),
            };
            if mod_param == 1 {
                let _ = write_csi!(&mut buf; code, "~");
            } else {
                let _ = write_csi!(&mut buf; code, ";", mod_param, "~");
            }
        }
    }

    Some(buf)
}

/// Map Ctrl+<char> to its ASCII control code.
fn control_code_for(c: char) -> u8 {
    match c {
        '@' | ' ' => 0x00,
        'a'..='z' | 'A'..='Z' => (c as u8 | 0x20) & 0x1f,
        '[' => 0x1b,
        '\\' => 0x1c,
        ']' => 0x1d,
        '^' => 0x1e,
        '_' => 0x1f,
        '?' => 0x7f,
        _ => c as u8 & 0x1f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(app_cursor_keys: bool) -> VteModes {
        VteModes { app_cursor_keys, ..VteModes::default() }
    }

    #[test]
    fn plain_char_passes_through_utf8() {
        let bytes = encode_key(KeyCode::Char('a'), KeyModifiers::empty(), modes(false), None).unwrap();
        assert_eq!(bytes, b"a");
    }

    #[test]
    fn ctrl_c_sends_control_code() {
        let bytes = encode_key(KeyCode::Char('c'), KeyModifiers::CONTROL, modes(false), None).unwrap();
        assert_eq!(bytes, [0x03]);
    }

    #[test]
    fn arrow_keys_respect_app_cursor_mode() {
        let normal = encode_key(KeyCode::Up, KeyModifiers::empty(), modes(false), None).unwrap();
        assert_eq!(normal, b"\x1b[A");
        let app = encode_key(KeyCode::Up, KeyModifiers::empty(), modes(true), None).unwrap();
        assert_eq!(app, b"\x1bOA");
    }

    #[test]
    fn modified_arrow_key_uses_csi_one_semicolon_form() {
        let bytes = encode_key(KeyCode::Right, KeyModifiers::SHIFT, modes(true), None).unwrap();
        assert_eq!(bytes, b"\x1b[1;2C");
    }

    #[test]
    fn enter_sends_carriage_return() {
        let bytes = encode_key(KeyCode::Enter, KeyModifiers::empty(), modes(false), None).unwrap();
        assert_eq!(bytes, b"\r");
    }

    #[test]
    fn alt_enter_prefixes_escape() {
        let bytes = encode_key(KeyCode::Enter, KeyModifiers::ALT, modes(false), None).unwrap();
        assert_eq!(bytes, b"\x1b\r");
    }

    #[test]
    fn function_key_beyond_f4_uses_tilde_form() {
        let bytes = encode_key(KeyCode::F(5), KeyModifiers::empty(), modes(false), None).unwrap();
        assert_eq!(bytes, b"\x1b[15~");
    }

    #[test]
    fn backspace_sends_del() {
        let bytes = encode_key(KeyCode::Backspace, KeyModifiers::empty(), modes(false), None).unwrap();
        assert_eq!(bytes, [0x7f]);
    }

    #[test]
    fn shift_tab_sends_back_tab_sequence() {
        let bytes = encode_key(KeyCode::Tab, KeyModifiers::SHIFT, modes(false), None).unwrap();
        assert_eq!(bytes, b"\x1b[Z");
    }
}
