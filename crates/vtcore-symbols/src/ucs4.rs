//! `ucs4` helpers: a `ucs4` is a raw Unicode scalar value, not yet validated
//! against the UTF-8 decoder or interned in a [`crate::SymbolTable`].

/// A Unicode scalar value, stored as the host would pass it: not
/// necessarily validated to be a real `char`.
pub type Ucs4 = u32;

/// Largest value a `ucs4` may hold (31 bits), matching the historical
/// UTF-8 code space this library's wire format was designed against.
pub const MAX: Ucs4 = 0x7fff_ffff;

/// Sentinel for "no code point decoded yet".
pub const INVALID: Ucs4 = MAX + 1;

/// Substitution character emitted for invalid UTF-8 byte sequences.
pub const REPLACEMENT: Ucs4 = 0xfffd;

/// Upper bound on the UTF-8 byte length of one encoded code point, with
/// slop for combining-mark sequences.
pub const MAXLEN: usize = 10;

/// Encode a single `ucs4` value as UTF-8 into `out`, returning the number of
/// bytes written.
///
/// Values that are not valid Unicode scalar values (surrogates, or above
/// `char::MAX`) are encoded as [`REPLACEMENT`] instead.
#[must_use]
pub fn encode_utf8(ucs4: Ucs4, out: &mut [u8; 4]) -> usize {
    let ch = char::from_u32(ucs4).unwrap_or(
        char::from_u32(REPLACEMENT).expect("REPLACEMENT is a valid scalar value"),
    );
    ch.encode_utf8(out).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_ascii_as_single_byte() {
        let mut buf = [0u8; 4];
        let len = encode_utf8(u32::from(b'A'), &mut buf);
        assert_eq!(&buf[..len], b"A");
    }

    #[test]
    fn encodes_surrogate_as_replacement() {
        let mut buf = [0u8; 4];
        let len = encode_utf8(0xd800, &mut buf);
        assert_eq!(&buf[..len], "\u{fffd}".as_bytes());
    }
}
