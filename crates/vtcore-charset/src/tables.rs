//! The actual 96-glyph translation tables, indexed by `byte - 0x20`.

use vtcore_symbols::Ucs4;

use crate::Charset;

/// Translate one GL byte (0x20..=0x7F) through `charset`.
pub(crate) fn translate(charset: Charset, byte: u8) -> Ucs4 {
    let byte = byte & 0x7f;
    match charset {
        Charset::Ascii | Charset::UnicodeLower | Charset::UnicodeUpper => u32::from(byte),
        Charset::Uk => {
            if byte == b'#' {
                0x00a3 // pound sign
            } else {
                u32::from(byte)
            }
        }
        Charset::DecSpecialGraphics => dec_special_graphics(byte),
        Charset::DecSupplemental => dec_supplemental(byte),
    }
}

/// DEC Special Character and Line Drawing Set.
///
/// Only the range 0x60..=0x7e (`` ` ``..`~`) differs from ASCII; everything
/// else passes through unchanged.
fn dec_special_graphics(byte: u8) -> Ucs4 {
    match byte {
        0x60 => 0x25c6, // ` -> diamond
        0x61 => 0x2592, // a -> checkerboard
        0x62 => 0x2409, // b -> HT symbol
        0x63 => 0x240c, // c -> FF symbol
        0x64 => 0x240d, // d -> CR symbol
        0x65 => 0x240a, // e -> LF symbol
        0x66 => 0x00b0, // f -> degree sign
        0x67 => 0x00b1, // g -> plus/minus
        0x68 => 0x2424, // h -> NL symbol
        0x69 => 0x240b, // i -> VT symbol
        0x6a => 0x2518, // j -> lower-right corner
        0x6b => 0x2510, // k -> upper-right corner
        0x6c => 0x250c, // l -> upper-left corner
        0x6d => 0x2514, // m -> lower-left corner
        0x6e => 0x253c, // n -> cross
        0x6f => 0x23ba, // o -> scan line 1
        0x70 => 0x23bb, // p -> scan line 3
        0x71 => 0x2500, // q -> horizontal line
        0x72 => 0x23bc, // r -> scan line 7
        0x73 => 0x23bd, // s -> scan line 9
        0x74 => 0x251c, // t -> left tee
        0x75 => 0x2524, // u -> right tee
        0x76 => 0x2534, // v -> bottom tee
        0x77 => 0x252c, // w -> top tee
        0x78 => 0x2502, // x -> vertical line
        0x79 => 0x2264, // y -> less-than-or-equal
        0x7a => 0x2265, // z -> greater-than-or-equal
        0x7b => 0x03c0, // { -> pi
        0x7c => 0x2260, // | -> not-equal
        0x7d => 0x00a3, // } -> pound sign
        0x7e => 0x00b7, // ~ -> middle dot
        _ => u32::from(byte),
    }
}

/// DEC Supplemental: ASCII with the graphic-high half replaced by accented
/// Latin-1-ish characters, close to (but not identical to) ISO 8859-1.
fn dec_supplemental(byte: u8) -> Ucs4 {
    // Below 0x20 never reaches here (GL range is 0x20..=0x7f); for the
    // ASCII-identical low half, pass through. The interesting mapping
    // starts at 0xa0-equivalent (byte 0x20 maps to the supplemental
    // table's first entry, matching DEC's GL-shifted-into-96-set model).
    const TABLE: [u32; 0x60] = [
        0x00a0, 0x00a1, 0x00a2, 0x00a3, 0x0000, 0x00a5, 0x0000, 0x00a7, // 20-27
        0x00a4, 0x00a9, 0x00aa, 0x00ab, 0x0000, 0x0000, 0x0000, 0x0000, // 28-2f
        0x00b0, 0x00b1, 0x00b2, 0x00b3, 0x0000, 0x00b5, 0x00b6, 0x00b7, // 30-37
        0x0000, 0x00b9, 0x00ba, 0x00bb, 0x00bc, 0x00bd, 0x0000, 0x00bf, // 38-3f
        0x00c0, 0x00c1, 0x00c2, 0x00c3, 0x00c4, 0x00c5, 0x00c6, 0x00c7, // 40-47
        0x00c8, 0x00c9, 0x00ca, 0x00cb, 0x00cc, 0x00cd, 0x00ce, 0x00cf, // 48-4f
        0x0152, 0x00d1, 0x00d2, 0x00d3, 0x00d4, 0x00d5, 0x00d6, 0x0178, // 50-57
        0x00d8, 0x00d9, 0x00da, 0x00db, 0x00dc, 0x0178, 0x0152, 0x00df, // 58-5f
        0x00e0, 0x00e1, 0x00e2, 0x00e3, 0x00e4, 0x00e5, 0x00e6, 0x00e7, // 60-67
        0x00e8, 0x00e9, 0x00ea, 0x00eb, 0x00ec, 0x00ed, 0x00ee, 0x00ef, // 68-6f
        0x0153, 0x00f1, 0x00f2, 0x00f3, 0x00f4, 0x00f5, 0x00f6, 0x00ff, // 70-77
        0x00f8, 0x00f9, 0x00fa, 0x00fb, 0x00fc, 0x00ff, 0x0153, 0x0000, // 78-7f
    ];
    let idx = (byte - 0x20) as usize;
    match TABLE.get(idx) {
        Some(&0) | None => u32::from(byte),
        Some(&cp) => cp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dec_special_graphics_q_is_horizontal_line() {
        assert_eq!(dec_special_graphics(b'q'), 0x2500);
    }

    #[test]
    fn dec_special_graphics_passes_through_digits() {
        assert_eq!(dec_special_graphics(b'5'), u32::from(b'5'));
    }

    #[test]
    fn dec_supplemental_maps_uppercase_a_grave() {
        assert_eq!(dec_supplemental(0x40), 0x00c0);
    }
}
