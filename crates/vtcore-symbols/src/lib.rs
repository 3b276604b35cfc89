//! Unicode scalar value handling, the UTF-8 decode state machine, and the
//! grapheme symbol table that backs every cell in a `vtcore-screen::Screen`.

#![warn(clippy::pedantic)]

pub mod symbol;
pub mod ucs4;
pub mod utf8;
pub mod width;

pub use symbol::{Symbol, SymbolTable};
pub use ucs4::Ucs4;
pub use utf8::{Utf8Machine, Utf8State};
