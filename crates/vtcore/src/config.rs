//! Construction-time configuration for a [`Vte`].
//!
//! `Screen::new`/`Vte::new` take explicit size parameters rather than
//! reading environment variables, matching libtsm's constructor-parameter
//! style (`tsm_screen_new`, `tsm_vte_new`). `VteOpts` groups the optional
//! tunables (scrollback limit, initial palette) a host would otherwise
//! have to set through a handful of separate calls after construction.

use vtcore_vte::{Palette, Vte};

/// Builder for a [`Vte`] plus its backing screen.
///
/// # Examples
///
/// ```
/// use vtcore::VteOpts;
///
/// let vte = VteOpts::new(80, 24)
///     .scrollback_limit(1000)
///     .build();
/// assert_eq!(vte.screen().width(), 80);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VteOpts {
    width: usize,
    height: usize,
    scrollback_limit: usize,
    palette: Palette,
}

impl VteOpts {
    /// Start a builder for a `width`x`height` screen with no scrollback
    /// and the default ([`Palette::Linux`]) 16-color palette.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, scrollback_limit: 0, palette: Palette::default() }
    }

    #[must_use]
    pub fn scrollback_limit(mut self, limit: usize) -> Self {
        self.scrollback_limit = limit;
        self
    }

    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn build(self) -> Vte {
        let mut vte = Vte::new(self.width, self.height);
        vte.screen_mut().set_max_sb(self.scrollback_limit);
        vte.set_palette(self.palette);
        vte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scrollback_limit_is_zero() {
        let mut vte = VteOpts::new(4, 2).build();
        let mut reply = Vec::new();
        for _ in 0..10 {
            vte.feed(b"x\n", &mut reply);
        }
        assert!(vte.screen().scrollback_is_empty());
    }

    #[test]
    fn nonzero_scrollback_limit_retains_scrolled_lines() {
        let mut vte = VteOpts::new(4, 2).scrollback_limit(100).build();
        let mut reply = Vec::new();
        for _ in 0..10 {
            vte.feed(b"x\n", &mut reply);
        }
        assert!(!vte.screen().scrollback_is_empty());
    }

    #[test]
    fn builder_applies_palette() {
        let vte = VteOpts::new(10, 10).palette(Palette::Solarized).build();
        assert_eq!(vte.screen().width(), 10);
    }
}
