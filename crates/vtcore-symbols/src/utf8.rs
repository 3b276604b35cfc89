//! UTF-8 decode state machine.
//!
//! Drives one byte at a time rather than requiring a complete buffer, so the
//! VTE parser can feed it bytes as they arrive from the host without
//! buffering partial multi-byte sequences itself.

use crate::ucs4::{self, Ucs4};

/// Current state of a [`Utf8Machine`].
///
/// `Expect1`/`Expect2`/`Expect3` count down the remaining continuation
/// bytes of a multi-byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8State {
    Start,
    Accept,
    Reject,
    Expect1,
    Expect2,
    Expect3,
}

/// Byte-at-a-time UTF-8 decoder.
///
/// On an invalid lead byte or a stray continuation byte, [`Utf8Machine::feed`]
/// returns [`Utf8State::Reject`] and the machine is left in `Start`. On an
/// invalid continuation byte in the middle of a multi-byte sequence, the
/// machine resets to `Start` and reprocesses the same byte as if it had just
/// arrived — so a cut-off sequence immediately followed by an ASCII byte
/// yields `Accept` for that byte rather than a spurious second `Reject`.
#[derive(Debug, Clone, Copy)]
pub struct Utf8Machine {
    state: Utf8State,
    codepoint: u32,
    /// Valid range for the next continuation byte. Restricted to exclude
    /// overlong encodings, UTF-16 surrogates, and code points past U+10FFFF
    /// right after a lead byte that needs it (0xE0, 0xED, 0xF0, 0xF4); reset
    /// to the full 0x80..=0xBF range once that first continuation clears.
    lo: u8,
    hi: u8,
}

impl Default for Utf8Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8Machine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Utf8State::Start,
            codepoint: 0,
            lo: 0x80,
            hi: 0xbf,
        }
    }

    /// Feed one byte into the machine, returning its new state.
    pub fn feed(&mut self, byte: u8) -> Utf8State {
        match self.state {
            Utf8State::Start | Utf8State::Accept | Utf8State::Reject => {
                self.feed_lead(byte)
            }
            Utf8State::Expect1 => self.feed_continuation(byte, Utf8State::Accept),
            Utf8State::Expect2 => self.feed_continuation(byte, Utf8State::Expect1),
            Utf8State::Expect3 => self.feed_continuation(byte, Utf8State::Expect2),
        }
    }

    fn feed_lead(&mut self, byte: u8) -> Utf8State {
        self.lo = 0x80;
        self.hi = 0xbf;
        self.state = if byte & 0x80 == 0 {
            self.codepoint = u32::from(byte);
            Utf8State::Accept
        } else if byte == 0xc0 || byte == 0xc1 || byte >= 0xf5 {
            Utf8State::Reject
        } else if byte & 0xe0 == 0xc0 {
            self.codepoint = u32::from(byte & 0x1f);
            Utf8State::Expect1
        } else if byte & 0xf0 == 0xe0 {
            self.codepoint = u32::from(byte & 0x0f);
            if byte == 0xe0 {
                self.lo = 0xa0;
            } else if byte == 0xed {
                self.hi = 0x9f;
            }
            Utf8State::Expect2
        } else if byte & 0xf8 == 0xf0 {
            self.codepoint = u32::from(byte & 0x07);
            if byte == 0xf0 {
                self.lo = 0x90;
            } else if byte == 0xf4 {
                self.hi = 0x8f;
            }
            Utf8State::Expect3
        } else {
            Utf8State::Reject
        };
        self.state
    }

    fn feed_continuation(&mut self, byte: u8, next: Utf8State) -> Utf8State {
        if byte >= self.lo && byte <= self.hi {
            self.codepoint = (self.codepoint << 6) | u32::from(byte & 0x3f);
            self.lo = 0x80;
            self.hi = 0xbf;
            self.state = next;
            self.state
        } else {
            self.state = Utf8State::Start;
            self.feed(byte)
        }
    }

    /// Return the decoded code point. Only meaningful immediately after a
    /// call to [`Utf8Machine::feed`] returned [`Utf8State::Accept`]; returns
    /// [`ucs4::REPLACEMENT`] otherwise.
    #[must_use]
    pub fn get(&self) -> Ucs4 {
        if self.state == Utf8State::Accept {
            self.codepoint
        } else {
            ucs4::REPLACEMENT
        }
    }

    pub fn reset(&mut self) {
        self.state = Utf8State::Start;
        self.codepoint = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(bytes: &[u8]) -> (Utf8State, Ucs4) {
        let mut mach = Utf8Machine::new();
        let mut last = Utf8State::Start;
        for &b in bytes {
            last = mach.feed(b);
        }
        (last, mach.get())
    }

    #[test]
    fn accepts_ascii() {
        assert_eq!(decode_one(b"A"), (Utf8State::Accept, u32::from(b'A')));
    }

    #[test]
    fn accepts_two_byte_sequence() {
        // U+00E9 'é' = 0xC3 0xA9
        assert_eq!(decode_one(&[0xc3, 0xa9]), (Utf8State::Accept, 0xe9));
    }

    #[test]
    fn accepts_three_byte_sequence() {
        // U+20AC '€' = 0xE2 0x82 0xAC
        assert_eq!(decode_one(&[0xe2, 0x82, 0xac]), (Utf8State::Accept, 0x20ac));
    }

    #[test]
    fn accepts_four_byte_sequence() {
        // U+1F600 '😀' = 0xF0 0x9F 0x98 0x80
        assert_eq!(
            decode_one(&[0xf0, 0x9f, 0x98, 0x80]),
            (Utf8State::Accept, 0x1_f600)
        );
    }

    #[test]
    fn rejects_stray_continuation_byte() {
        let mut mach = Utf8Machine::new();
        assert_eq!(mach.feed(0x80), Utf8State::Reject);
    }

    #[test]
    fn rejects_overlong_lead_bytes() {
        let mut mach = Utf8Machine::new();
        assert_eq!(mach.feed(0xc0), Utf8State::Reject);
        mach.reset();
        assert_eq!(mach.feed(0xc1), Utf8State::Reject);
    }

    #[test]
    fn rejects_overlong_three_byte_encoding() {
        // 0xE0 0x80 0x80 would re-encode U+0000 as three bytes.
        assert_eq!(
            decode_one(&[0xe0, 0x80, 0x80]),
            (Utf8State::Reject, ucs4::REPLACEMENT)
        );
    }

    #[test]
    fn rejects_overlong_four_byte_encoding() {
        assert_eq!(
            decode_one(&[0xf0, 0x80, 0x80, 0x80]),
            (Utf8State::Reject, ucs4::REPLACEMENT)
        );
    }

    #[test]
    fn rejects_utf16_surrogates() {
        // 0xED 0xA0 0x80 would decode to U+D800, a surrogate.
        assert_eq!(
            decode_one(&[0xed, 0xa0, 0x80]),
            (Utf8State::Reject, ucs4::REPLACEMENT)
        );
    }

    #[test]
    fn rejects_code_points_past_u10ffff() {
        assert_eq!(
            decode_one(&[0xf4, 0x90, 0x80, 0x80]),
            (Utf8State::Reject, ucs4::REPLACEMENT)
        );
    }

    #[test]
    fn truncated_sequence_reprocesses_next_byte_as_new_lead() {
        let mut mach = Utf8Machine::new();
        // 0xE2 starts a 3-byte sequence, but 'A' is not a continuation byte.
        assert_eq!(mach.feed(0xe2), Utf8State::Expect2);
        assert_eq!(mach.feed(b'A'), Utf8State::Accept);
        assert_eq!(mach.get(), u32::from(b'A'));
    }

    #[test]
    fn reset_clears_partial_sequence() {
        let mut mach = Utf8Machine::new();
        assert_eq!(mach.feed(0xe2), Utf8State::Expect2);
        mach.reset();
        assert_eq!(mach.feed(b'z'), Utf8State::Accept);
        assert_eq!(mach.get(), u32::from(b'z'));
    }
}
