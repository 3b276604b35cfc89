//! Cell attributes: colors and text decoration.

/// Foreground/background color and decoration of one cell.
///
/// Mirrors `tsm_screen_attr` field-for-field: a negative color code means
/// "use the RGB fields instead", matching libtsm's indexed-or-true-color
/// duality rather than modeling colors as a Rust enum, so a `Screen` built
/// from SGR 256-color and SGR true-color sequences round-trips through the
/// same representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    /// Indexed foreground color (0-15), or negative to use `fr/fg/fb`.
    /// Matches `tsm_screen_attr`'s `int8_t fccode`: the index range it
    /// covers is the 16-color palette, not the full 256-color extension —
    /// SGR 256-color/true-color both resolve straight to RGB instead.
    pub fccode: i8,
    /// Indexed background color (0-15), or negative to use `br/bg/bb`.
    pub bccode: i8,
    pub fr: u8,
    pub fg: u8,
    pub fb: u8,
    pub br: u8,
    pub bg: u8,
    pub bb: u8,
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
    pub protect: bool,
    pub blink: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            fccode: -1,
            bccode: -1,
            fr: 0xe5,
            fg: 0xe5,
            fb: 0xe5,
            br: 0x00,
            bg: 0x00,
            bb: 0x00,
            bold: false,
            underline: false,
            inverse: false,
            protect: false,
            blink: false,
        }
    }
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset decoration flags and colors, keeping neither foreground nor
    /// background RGB values the caller may have set.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset_indexed_colors() {
        let attr = Attributes::default();
        assert_eq!(attr.fccode, -1);
        assert_eq!(attr.bccode, -1);
        assert!(!attr.bold);
    }
}
