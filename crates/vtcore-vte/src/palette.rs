//! Built-in 16-color palettes.
//!
//! libtsm's `tsm_vte_set_palette` takes a free-form palette name and looks
//! it up in a table compiled from `src/tsm_vte_charsets.c`-adjacent data.
//! A closed enum is the idiomatic Rust shape for that same fixed set of
//! built-ins; a host that wants a custom palette sets `Attributes` RGB
//! fields directly instead (see OSC 4/10/11 handling in `Vte`).

pub(crate) type Rgb = (u8, u8, u8);

/// One of the small set of named 16-color palettes this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Linux,
    Solarized,
    SolarizedDark,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Linux
    }
}

#[rustfmt::skip]
const LINUX: [Rgb; 16] = [
    (0x00, 0x00, 0x00), (0xaa, 0x00, 0x00), (0x00, 0xaa, 0x00), (0xaa, 0x55, 0x00),
    (0x00, 0x00, 0xaa), (0xaa, 0x00, 0xaa), (0x00, 0xaa, 0xaa), (0xaa, 0xaa, 0xaa),
    (0x55, 0x55, 0x55), (0xff, 0x55, 0x55), (0x55, 0xff, 0x55), (0xff, 0xff, 0x55),
    (0x55, 0x55, 0xff), (0xff, 0x55, 0xff), (0x55, 0xff, 0xff), (0xff, 0xff, 0xff),
];

#[rustfmt::skip]
const SOLARIZED: [Rgb; 16] = [
    (0x07, 0x36, 0x42), (0xdc, 0x32, 0x2f), (0x85, 0x99, 0x00), (0xb5, 0x89, 0x00),
    (0x26, 0x8b, 0xd2), (0xd3, 0x36, 0x82), (0x2a, 0xa1, 0x98), (0xee, 0xe8, 0xd5),
    (0x00, 0x2b, 0x36), (0xcb, 0x4b, 0x16), (0x58, 0x6e, 0x75), (0x65, 0x7b, 0x83),
    (0x83, 0x94, 0x96), (0x6c, 0x71, 0xc4), (0x93, 0xa1, 0xa1), (0xfd, 0xf6, 0xe3),
];

#[rustfmt::skip]
const SOLARIZED_DARK: [Rgb; 16] = [
    (0x07, 0x36, 0x42), (0xdc, 0x32, 0x2f), (0x85, 0x99, 0x00), (0xb5, 0x89, 0x00),
    (0x26, 0x8b, 0xd2), (0xd3, 0x36, 0x82), (0x2a, 0xa1, 0x98), (0x93, 0xa1, 0xa1),
    (0x00, 0x2b, 0x36), (0xcb, 0x4b, 0x16), (0x58, 0x6e, 0x75), (0x65, 0x7b, 0x83),
    (0x83, 0x94, 0x96), (0x6c, 0x71, 0xc4), (0xee, 0xe8, 0xd5), (0xfd, 0xf6, 0xe3),
];

impl Palette {
    fn table(self) -> &'static [Rgb; 16] {
        match self {
            Palette::Linux => &LINUX,
            Palette::Solarized => &SOLARIZED,
            Palette::SolarizedDark => &SOLARIZED_DARK,
        }
    }

    /// Resolve a standard 16-color index (0-15, wrapping) to this
    /// palette's RGB triple.
    #[must_use]
    pub fn resolve(self, index: u8) -> Rgb {
        self.table()[usize::from(index & 0x0f)]
    }

    /// Resolve a full xterm 256-color index: 0-15 through this palette's
    /// own 16-color table, 16-231 as the standard 6x6x6 color cube, and
    /// 232-255 as the 24-step grayscale ramp.
    #[must_use]
    pub fn resolve_extended(self, index: u8) -> Rgb {
        match index {
            0..=15 => self.resolve(index),
            16..=231 => {
                const LEVELS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];
                let n = index - 16;
                let r = LEVELS[usize::from(n / 36)];
                let g = LEVELS[usize::from((n / 6) % 6)];
                let b = LEVELS[usize::from(n % 6)];
                (r, g, b)
            }
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                (gray, gray, gray)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_index_zero_is_black() {
        assert_eq!(Palette::Linux.resolve(0), (0x00, 0x00, 0x00));
    }

    #[test]
    fn solarized_dark_differs_from_solarized_on_base_tones() {
        assert_ne!(Palette::Solarized.resolve(7), Palette::SolarizedDark.resolve(7));
    }

    #[test]
    fn index_wraps_at_sixteen() {
        assert_eq!(Palette::Linux.resolve(0), Palette::Linux.resolve(16));
    }

    #[test]
    fn resolve_extended_defers_to_the_16_color_table_below_16() {
        assert_eq!(Palette::Linux.resolve_extended(1), Palette::Linux.resolve(1));
    }

    #[test]
    fn resolve_extended_cube_corners_are_black_and_white() {
        assert_eq!(Palette::Linux.resolve_extended(16), (0, 0, 0));
        assert_eq!(Palette::Linux.resolve_extended(231), (0xff, 0xff, 0xff));
    }

    #[test]
    fn resolve_extended_grayscale_ramp_spans_232_to_255() {
        assert_eq!(Palette::Linux.resolve_extended(232), (8, 8, 8));
        assert_eq!(Palette::Linux.resolve_extended(255), (238, 238, 238));
    }
}
