//! VTE parser: drives a `vtcore-screen::Screen` from a stream of terminal
//! output bytes, and encodes the replies (device reports, answerback) the
//! host must write back to the pty.

#![warn(clippy::pedantic)]

mod modes;
mod palette;
mod params;
mod vte;

pub use modes::VteModes;
pub use palette::Palette;
pub use vte::Vte;
