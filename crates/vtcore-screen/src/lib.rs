//! The grid model: cells, lines, scrollback, cursor and selection state,
//! and the draw-iteration interface a renderer uses to read it back out.
//!
//! This crate has no knowledge of escape sequences — it is driven entirely
//! by method calls (`write`, `newline`, `scroll_up`, ...) from
//! `vtcore-vte`'s parser, exactly as libtsm's `tsm_screen` has no knowledge
//! of `tsm_vte`'s parsing.

#![warn(clippy::pedantic)]

mod attr;
mod cell;
mod draw;
mod error;
mod line;
mod opts;
mod screen;

pub use attr::Attributes;
pub use cell::Cell;
pub use draw::ScreenDrawHandler;
pub use error::{MarginsError, ResizeError};
pub use line::Line;
pub use opts::ScreenOpts;
pub use screen::Screen;
