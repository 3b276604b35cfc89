use vtcore_symbols::{Symbol, Ucs4};

use crate::attr::Attributes;

/// Callback interface for reading a screen back out to paint it.
///
/// Mirrors libtsm's `tsm_screen_prepare_cb`/`tsm_screen_draw_cb`/
/// `tsm_screen_render_cb` triple as one trait with three methods, the
/// idiomatic Rust shape for "three functions always called together in the
/// same order with the same renderer state."
pub trait ScreenDrawHandler {
    /// Called once before the first [`ScreenDrawHandler::draw_cell`] call.
    fn prepare(&mut self) {}

    /// Called once per visible cell, in row-major order starting at the
    /// top-left of the currently visible view (which may be scrolled back).
    ///
    /// `id` is the cell's symbol handle: a renderer can key a glyph cache
    /// off it instead of re-shaping `codepoints` every frame. The
    /// right-hand half of a wide cell is never dispatched here — its
    /// symbol is [`Symbol::WIDE_PLACEHOLDER`], and [`crate::Screen::draw`]
    /// skips it.
    fn draw_cell(
        &mut self,
        id: Symbol,
        codepoints: &[Ucs4],
        width: u8,
        col: usize,
        row: usize,
        attr: &Attributes,
    );

    /// Called once after the last [`ScreenDrawHandler::draw_cell`] call.
    fn render(&mut self) {}
}
