//! Display width of Unicode code points.
//!
//! Deliberately a free function rather than a trait object so the default
//! table can be swapped for another (e.g. a locale-specific East Asian
//! Width override) by linking a different crate that re-exports its own
//! `width` under the same name — the lookup itself never allocates.

use crate::ucs4::Ucs4;

/// Return the column width of `ucs4`: 0 for combining marks and other
/// zero-width code points, 1 for ordinary characters, 2 for wide (East
/// Asian) characters.
#[must_use]
pub fn width(ucs4: Ucs4) -> u8 {
    if ucs4 == 0 {
        return 0;
    }
    if is_zero_width(ucs4) {
        return 0;
    }
    if is_wide(ucs4) {
        return 2;
    }
    1
}

fn is_zero_width(cp: Ucs4) -> bool {
    matches!(cp,
        0x0300..=0x036f   // combining diacritical marks
        | 0x0483..=0x0489
        | 0x0591..=0x05bd
        | 0x05bf | 0x05c1 | 0x05c2 | 0x05c4 | 0x05c5 | 0x05c7
        | 0x0610..=0x061a
        | 0x064b..=0x065f
        | 0x0670
        | 0x06d6..=0x06dc
        | 0x06df..=0x06e4
        | 0x06e7 | 0x06e8
        | 0x06ea..=0x06ed
        | 0x0711
        | 0x0730..=0x074a
        | 0x07a6..=0x07b0
        | 0x0816..=0x0819
        | 0x081b..=0x0823
        | 0x0825..=0x0827
        | 0x0829..=0x082d
        | 0x0859..=0x085b
        | 0x200b..=0x200f  // zero-width space, joiners, marks
        | 0x202a..=0x202e
        | 0x2060..=0x2064
        | 0xfe00..=0xfe0f  // variation selectors
        | 0xfe20..=0xfe2f
        | 0xfeff           // BOM / zero-width no-break space
    )
}

fn is_wide(cp: Ucs4) -> bool {
    matches!(cp,
        0x1100..=0x115f    // Hangul Jamo
        | 0x2329 | 0x232a
        | 0x2e80..=0x303e  // CJK radicals, Kangxi, CJK symbols and punctuation
        | 0x3041..=0x33ff  // Hiragana .. CJK compatibility
        | 0x3400..=0x4dbf  // CJK unified ideographs extension A
        | 0x4e00..=0x9fff  // CJK unified ideographs
        | 0xa000..=0xa4cf  // Yi syllables and radicals
        | 0xac00..=0xd7a3  // Hangul syllables
        | 0xf900..=0xfaff  // CJK compatibility ideographs
        | 0xfe30..=0xfe4f  // CJK compatibility forms
        | 0xff00..=0xff60  // fullwidth forms
        | 0xffe0..=0xffe6
        | 0x1_f300..=0x1_f64f // emoji
        | 0x1_f900..=0x1_f9ff
        | 0x2_0000..=0x2_fffd // CJK extension planes
        | 0x3_0000..=0x3_fffd
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(width(u32::from(b'A')), 1);
    }

    #[test]
    fn combining_acute_is_zero_width() {
        assert_eq!(width(0x0301), 0);
    }

    #[test]
    fn cjk_ideograph_is_wide() {
        assert_eq!(width(0x4e2d), 2); // 中
    }

    #[test]
    fn hangul_syllable_is_wide() {
        assert_eq!(width(0xac00), 2);
    }

    #[test]
    fn nul_is_zero_width() {
        assert_eq!(width(0), 0);
    }
}
